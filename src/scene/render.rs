//! Renderer contract and the renderers shipped with the crate.
//!
//! The scene loop calls [`Renderer::begin_frame`], then [`Renderer::draw`] once per visible
//! object, then [`Renderer::end_frame`]. Drawing never fails; frame output errors (sink IO)
//! surface from `end_frame`.

use std::fmt::Write as _;

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::geom::object::{DrawItem, MathObject};
use crate::scene::camera::Camera;
use crate::scene::sink::{FrameRGBA, FrameSink, SinkConfig};
use crate::style::color::Color;

pub trait Renderer {
    fn begin_frame(&mut self, frame: FrameIndex, camera: &Camera) -> GeomotionResult<()>;
    fn draw(&mut self, object: &MathObject, camera: &Camera);
    fn end_frame(&mut self) -> GeomotionResult<()>;
}

/// What one frame drew, in math coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedFrame {
    pub index: FrameIndex,
    pub items: Vec<DrawItem>,
}

/// Keeps the draw items of every frame. Used by tests to compare scene states.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    frames: Vec<RecordedFrame>,
    current: Option<RecordedFrame>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, frame: FrameIndex, _camera: &Camera) -> GeomotionResult<()> {
        self.current = Some(RecordedFrame {
            index: frame,
            items: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, object: &MathObject, camera: &Camera) {
        if let Some(cur) = self.current.as_mut() {
            cur.items.extend(object.draw_items(camera));
        }
    }

    fn end_frame(&mut self) -> GeomotionResult<()> {
        let cur = self
            .current
            .take()
            .ok_or_else(|| GeomotionError::render("end_frame without begin_frame"))?;
        self.frames.push(cur);
        Ok(())
    }
}

/// Accumulates one SVG document per frame.
#[derive(Clone, Debug)]
struct SvgFrameBuilder {
    background: Color,
    doc: String,
    width: u32,
    height: u32,
}

impl SvgFrameBuilder {
    fn new(background: Color) -> Self {
        Self {
            background,
            doc: String::new(),
            width: 0,
            height: 0,
        }
    }

    fn begin(&mut self, camera: &Camera) {
        let canvas = camera.canvas();
        self.width = canvas.width;
        self.height = canvas.height;
        self.doc.clear();
        let _ = write!(
            self.doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height
        );
        let _ = write!(
            self.doc,
            r#"<rect width="{}" height="{}" fill="{}" fill-opacity="{}"/>"#,
            canvas.width,
            canvas.height,
            self.background.to_svg_hex(),
            self.background.opacity()
        );
    }

    fn draw(&mut self, object: &MathObject, camera: &Camera) {
        let to_px = camera.math_to_pixel();
        for item in object.draw_items(camera) {
            let mut path = item.path;
            path.apply_affine(to_px);
            let s = &item.style;
            let fill = if s.has_fill() {
                format!(
                    r#"fill="{}" fill-opacity="{}""#,
                    s.fill.to_svg_hex(),
                    s.fill.opacity()
                )
            } else {
                r#"fill="none""#.to_owned()
            };
            let stroke = if s.has_stroke() {
                format!(
                    r#" stroke="{}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
                    s.stroke.to_svg_hex(),
                    s.stroke.opacity(),
                    s.thickness
                )
            } else {
                String::new()
            };
            let _ = write!(self.doc, r#"<path d="{}" {fill}{stroke}/>"#, path.to_svg());
        }
    }

    fn finish(&mut self) -> String {
        self.doc.push_str("</svg>");
        std::mem::take(&mut self.doc)
    }
}

/// Produces a standalone SVG document per frame.
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    builder: SvgFrameBuilder,
    current: Option<FrameIndex>,
    documents: Vec<(FrameIndex, String)>,
}

impl SvgRenderer {
    pub fn new(background: Color) -> Self {
        Self {
            builder: SvgFrameBuilder::new(background),
            current: None,
            documents: Vec::new(),
        }
    }

    pub fn documents(&self) -> &[(FrameIndex, String)] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<(FrameIndex, String)> {
        self.documents
    }
}

impl Renderer for SvgRenderer {
    fn begin_frame(&mut self, frame: FrameIndex, camera: &Camera) -> GeomotionResult<()> {
        self.builder.begin(camera);
        self.current = Some(frame);
        Ok(())
    }

    fn draw(&mut self, object: &MathObject, camera: &Camera) {
        self.builder.draw(object, camera);
    }

    fn end_frame(&mut self) -> GeomotionResult<()> {
        let idx = self
            .current
            .take()
            .ok_or_else(|| GeomotionError::render("end_frame without begin_frame"))?;
        let doc = self.builder.finish();
        self.documents.push((idx, doc));
        Ok(())
    }
}

/// Rasterizes each frame's SVG with `resvg` and pushes premultiplied RGBA to a [`FrameSink`].
pub struct RasterRenderer<S: FrameSink> {
    builder: SvgFrameBuilder,
    sink: S,
    fps: Fps,
    started: bool,
    current: Option<FrameIndex>,
}

impl<S: FrameSink> RasterRenderer<S> {
    pub fn new(sink: S, background: Color, fps: Fps) -> Self {
        Self {
            builder: SvgFrameBuilder::new(background),
            sink,
            fps,
            started: false,
            current: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Close the sink and hand it back.
    pub fn finish(mut self) -> GeomotionResult<S> {
        if self.started {
            self.sink.end()?;
        }
        Ok(self.sink)
    }
}

impl<S: FrameSink> Renderer for RasterRenderer<S> {
    fn begin_frame(&mut self, frame: FrameIndex, camera: &Camera) -> GeomotionResult<()> {
        if !self.started {
            let canvas = camera.canvas();
            self.sink.begin(SinkConfig {
                width: canvas.width,
                height: canvas.height,
                fps: self.fps,
            })?;
            self.started = true;
        }
        self.builder.begin(camera);
        self.current = Some(frame);
        Ok(())
    }

    fn draw(&mut self, object: &MathObject, camera: &Camera) {
        self.builder.draw(object, camera);
    }

    fn end_frame(&mut self) -> GeomotionResult<()> {
        let idx = self
            .current
            .take()
            .ok_or_else(|| GeomotionError::render("end_frame without begin_frame"))?;
        let (w, h) = (self.builder.width, self.builder.height);
        let doc = self.builder.finish();
        let frame = rasterize_svg(doc.as_bytes(), w, h)?;
        self.sink.push_frame(idx, &frame)
    }
}

/// Render an SVG document into a `width` x `height` premultiplied RGBA frame.
pub fn rasterize_svg(bytes: &[u8], width: u32, height: u32) -> GeomotionResult<FrameRGBA> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| GeomotionError::render(format!("parse frame svg: {e}")))?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| GeomotionError::render("failed to allocate frame pixmap"))?;
    let size = tree.size();
    let xform = resvg::tiny_skia::Transform::from_scale(
        (width as f32) / size.width(),
        (height as f32) / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(FrameRGBA {
        width,
        height,
        data: pixmap.data().to_vec(),
        premultiplied: true,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/render.rs"]
mod tests;
