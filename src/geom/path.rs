//! Canonical path form and the path algorithms built on it.
//!
//! A [`CanonicalPath`] is a path decomposed into maximal continuous sub-paths. It is the unit
//! of staged reveal ([`CanonicalPath::reveal`]) and of point interpolation ([`AlignedPaths`]).

use kurbo::{
    BezPath, CubicBez, Line, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point, Shape as _,
};

use crate::foundation::math::clamp01;

const ARCLEN_ACCURACY: f64 = 1e-6;

/// One continuous run of segments.
#[derive(Clone, Debug, PartialEq)]
pub struct SubPath {
    pub start: Point,
    pub segments: Vec<PathSeg>,
    /// The run ends with a close. When the last point differs from `start`, `segments` already
    /// contains the closing line.
    pub closed: bool,
}

impl SubPath {
    fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    fn end(&self) -> Point {
        self.segments.last().map_or(self.start, |s| s.end())
    }

    fn emit_into(&self, out: &mut BezPath) {
        out.move_to(self.start);
        for seg in &self.segments {
            push_seg(out, *seg);
        }
        if self.closed {
            out.close_path();
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CanonicalPath {
    subpaths: Vec<SubPath>,
}

impl CanonicalPath {
    /// Decompose `path` into maximal continuous sub-paths.
    ///
    /// A `MoveTo` landing exactly on the end of the current open run does not break continuity;
    /// runs without segments are dropped.
    pub fn from_path(path: &BezPath) -> Self {
        let mut subpaths = Vec::new();
        let mut current: Option<SubPath> = None;
        let mut last_start = Point::ORIGIN;

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if let Some(cur) = current.as_ref()
                        && !cur.closed
                        && cur.end() == p
                    {
                        continue;
                    }
                    flush(&mut subpaths, current.take());
                    current = Some(SubPath::new(p));
                    last_start = p;
                }
                PathEl::LineTo(p1) => {
                    let cur = current.get_or_insert_with(|| SubPath::new(last_start));
                    let p0 = cur.end();
                    cur.segments.push(PathSeg::Line(Line::new(p0, p1)));
                }
                PathEl::QuadTo(p1, p2) => {
                    let cur = current.get_or_insert_with(|| SubPath::new(last_start));
                    let p0 = cur.end();
                    cur.segments
                        .push(PathSeg::Quad(kurbo::QuadBez::new(p0, p1, p2)));
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let cur = current.get_or_insert_with(|| SubPath::new(last_start));
                    let p0 = cur.end();
                    cur.segments.push(PathSeg::Cubic(CubicBez::new(p0, p1, p2, p3)));
                }
                PathEl::ClosePath => {
                    if let Some(mut cur) = current.take() {
                        let end = cur.end();
                        if end != cur.start {
                            cur.segments.push(PathSeg::Line(Line::new(end, cur.start)));
                        }
                        cur.closed = true;
                        last_start = cur.start;
                        flush(&mut subpaths, Some(cur));
                    }
                }
            }
        }
        flush(&mut subpaths, current);

        Self { subpaths }
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.segments.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn to_path(&self) -> BezPath {
        let mut out = BezPath::new();
        for sp in &self.subpaths {
            sp.emit_into(&mut out);
        }
        out
    }

    /// Partial drawing of this path at eased progress `lt`.
    ///
    /// The global parameter `lt * segment_count()` selects a sub-path and a fractional segment:
    /// earlier sub-paths are drawn fully, later ones are absent, and the current one is cut at
    /// the fractional point. `lt <= 0` gives an empty path, `lt >= 1` the full canonical path.
    pub fn reveal(&self, lt: f64) -> BezPath {
        let lt = clamp01(lt);
        let n = self.segment_count();
        let mut out = BezPath::new();
        if n == 0 || lt <= 0.0 {
            return out;
        }

        let mut remaining = lt * n as f64;
        for sp in &self.subpaths {
            let k = sp.segments.len() as f64;
            if remaining >= k {
                sp.emit_into(&mut out);
                remaining -= k;
                continue;
            }
            if remaining <= 0.0 {
                break;
            }
            let full = remaining.floor() as usize;
            let frac = remaining - full as f64;
            out.move_to(sp.start);
            for seg in &sp.segments[..full] {
                push_seg(&mut out, *seg);
            }
            if frac > 0.0
                && let Some(seg) = sp.segments.get(full)
            {
                push_seg(&mut out, seg.subsegment(0.0..frac));
            }
            break;
        }
        out
    }
}

fn flush(subpaths: &mut Vec<SubPath>, sp: Option<SubPath>) {
    if let Some(sp) = sp
        && !sp.segments.is_empty()
    {
        subpaths.push(sp);
    }
}

fn push_seg(out: &mut BezPath, seg: PathSeg) {
    match seg {
        PathSeg::Line(l) => out.line_to(l.p1),
        PathSeg::Quad(q) => out.quad_to(q.p1, q.p2),
        PathSeg::Cubic(c) => out.curve_to(c.p1, c.p2, c.p3),
    }
}

/// Total arc length of every segment in `path`.
pub fn path_length(path: &BezPath) -> f64 {
    path.segments().map(|s| s.arclen(ARCLEN_ACCURACY)).sum()
}

/// Number of drawable segments in `path`.
pub fn path_segment_count(path: &BezPath) -> usize {
    path.segments().count()
}

#[derive(Clone, Debug, PartialEq)]
struct CubicRun {
    start: Point,
    cubics: Vec<CubicBez>,
    closed: bool,
}

impl CubicRun {
    fn collapsed(at: Point, segments: usize) -> Self {
        Self {
            start: at,
            cubics: vec![CubicBez::new(at, at, at, at); segments.max(1)],
            closed: false,
        }
    }

    fn from_subpath(sp: &SubPath) -> Self {
        Self {
            start: sp.start,
            cubics: sp.segments.iter().map(|s| s.to_cubic()).collect(),
            closed: sp.closed,
        }
    }

    /// Split the longest cubics until the run has `target` segments.
    fn subdivide_to(&mut self, target: usize) {
        while self.cubics.len() < target {
            let Some((idx, _)) = self
                .cubics
                .iter()
                .enumerate()
                .map(|(i, c)| (i, c.arclen(1e-3)))
                .max_by(|a, b| a.1.total_cmp(&b.1))
            else {
                break;
            };
            let (l, r) = self.cubics[idx].subdivide();
            self.cubics[idx] = l;
            self.cubics.insert(idx + 1, r);
        }
    }
}

/// Two paths rewritten as cubic-only runs with identical structure, so that every control
/// point on one side has a partner on the other.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedPaths {
    from: Vec<CubicRun>,
    to: Vec<CubicRun>,
}

impl AlignedPaths {
    pub fn new(a: &BezPath, b: &BezPath) -> Self {
        let ca = CanonicalPath::from_path(a);
        let cb = CanonicalPath::from_path(b);
        let mut from: Vec<CubicRun> = ca.subpaths.iter().map(CubicRun::from_subpath).collect();
        let mut to: Vec<CubicRun> = cb.subpaths.iter().map(CubicRun::from_subpath).collect();

        let anchor_a = anchor_point(a, b);
        let anchor_b = anchor_point(b, a);
        while from.len() < to.len() {
            let n = to[from.len()].cubics.len();
            from.push(CubicRun::collapsed(anchor_a, n));
        }
        while to.len() < from.len() {
            let n = from[to.len()].cubics.len();
            to.push(CubicRun::collapsed(anchor_b, n));
        }

        for (ra, rb) in from.iter_mut().zip(to.iter_mut()) {
            let target = ra.cubics.len().max(rb.cubics.len());
            ra.subdivide_to(target);
            rb.subdivide_to(target);
        }

        Self { from, to }
    }

    /// Number of aligned sub-paths (equal on both sides).
    pub fn run_count(&self) -> usize {
        self.from.len()
    }

    /// Segment counts per run (equal on both sides).
    pub fn segment_counts(&self) -> Vec<usize> {
        self.from.iter().map(|r| r.cubics.len()).collect()
    }

    /// Interpolated path between `from` (t = 0) and `to` (t = 1).
    pub fn lerp(&self, t: f64) -> BezPath {
        let mut out = BezPath::new();
        for (ra, rb) in self.from.iter().zip(&self.to) {
            out.move_to(ra.start.lerp(rb.start, t));
            for (ca, cb) in ra.cubics.iter().zip(&rb.cubics) {
                out.curve_to(
                    ca.p1.lerp(cb.p1, t),
                    ca.p2.lerp(cb.p2, t),
                    ca.p3.lerp(cb.p3, t),
                );
            }
            if ra.closed && rb.closed {
                out.close_path();
            }
        }
        out
    }
}

/// Where padding runs of `path` collapse to: its bounding-box centre, or the start of `other`
/// when `path` is empty.
fn anchor_point(path: &BezPath, other: &BezPath) -> Point {
    if path.segments().next().is_some() {
        return path.bounding_box().center();
    }
    match other.elements().first() {
        Some(PathEl::MoveTo(p)) => *p,
        _ => Point::ORIGIN,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geom/path.rs"]
mod tests;
