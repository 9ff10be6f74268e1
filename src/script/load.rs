use std::path::Path;

use anyhow::Context as _;
use kurbo::Vec2;

use crate::animation::animation::Animation;
use crate::construct::construction::Construction;
use crate::construct::label::LabelSpec;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::geom::object::{Axes, MathObject};
use crate::geom::shape::Shape;
use crate::graph::dependency::DependencySource as _;
use crate::scene::render::Renderer;
use crate::scene::scene::{PlayStats, Scene};
use crate::script::model::{
    ActionDef, AnimationDef, ConstructDef, Script, ShapeDef, SourceDef, Step, point, rect,
};
use crate::style::props::StylePatch;
use crate::text::compiler::GlyphCache;

pub fn parse_script(text: &str) -> GeomotionResult<Script> {
    let script: Script = serde_json::from_str(text)?;
    script.config.validate()?;
    Ok(script)
}

pub fn read_script(path: &Path) -> GeomotionResult<Script> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read scene script '{}'", path.display()))?;
    parse_script(&text)
}

/// Build the scene described by `script`: every object is allocated first, then all
/// constructions are registered as one batch, so labels may be used before they are defined.
#[tracing::instrument(level = "debug", skip_all, fields(objects = script.objects.len()))]
pub fn build_scene(script: &Script) -> GeomotionResult<Scene> {
    let mut glyphs = GlyphCache::new();
    for (text, svg) in &script.glyphs {
        glyphs
            .insert_svg(text.clone(), svg.as_bytes())
            .with_context(|| format!("import glyphs for '{text}'"))?;
    }
    let mut scene = Scene::with_compiler(script.config.clone(), Box::new(glyphs))?;

    let mut ids = Vec::with_capacity(script.objects.len());
    for def in &script.objects {
        let object = match &def.source {
            SourceDef::Construct(_) => MathObject::Group(Vec::new()),
            other => {
                let mut object = authored_object(&scene, other)?;
                apply_patch(&mut object, &def.style);
                object
            }
        };
        ids.push(scene.insert_labeled(def.label.clone(), object)?);
    }

    let mut batch = Vec::new();
    for (def, &id) in script.objects.iter().zip(&ids) {
        if let SourceDef::Construct(c) = &def.source {
            batch.push((id, resolve_construction(&scene, &def.label, c)?));
        }
    }
    scene.construct_batch(batch)?;

    for (def, &id) in script.objects.iter().zip(&ids) {
        if matches!(def.source, SourceDef::Construct(_))
            && def.style != StylePatch::default()
            && let Some(object) = scene.object_mut(id)
        {
            apply_patch(object, &def.style);
        }
    }
    scene.update();

    for (def, &id) in script.objects.iter().zip(&ids) {
        if def.visible {
            scene.add(id);
        }
    }
    tracing::debug!(graph_nodes = scene.graph().len(), "scene built");
    Ok(scene)
}

/// Labels of the derived objects in the order they are evaluated.
pub fn evaluation_order(scene: &Scene) -> Vec<String> {
    scene
        .graph()
        .order()
        .iter()
        .map(|id| scene.store().describe(*id))
        .collect()
}

/// Play every timeline step through `renderer`.
pub fn run_timeline(
    scene: &mut Scene,
    timeline: &[Step],
    renderer: &mut dyn Renderer,
) -> GeomotionResult<PlayStats> {
    let mut total = PlayStats::default();
    for step in timeline {
        let stats = match step {
            Step::Play(defs) => {
                let anims = defs
                    .iter()
                    .map(|d| animation_from_def(scene, d))
                    .collect::<GeomotionResult<Vec<_>>>()?;
                scene.play(renderer, anims)?
            }
            Step::Wait(secs) => scene.wait(renderer, *secs)?,
            Step::Add(labels) => {
                for id in find_all(scene, labels)? {
                    scene.add(id);
                }
                PlayStats::default()
            }
            Step::Remove(labels) => {
                for id in find_all(scene, labels)? {
                    scene.remove(id);
                }
                PlayStats::default()
            }
            Step::MovePoint { target, to } => {
                move_point(scene, target, *to)?;
                PlayStats::default()
            }
        };
        total.frames += stats.frames;
        total.skipped += stats.skipped;
        total.rebuilt += stats.rebuilt;
    }
    Ok(total)
}

pub fn animation_from_def(scene: &Scene, def: &AnimationDef) -> GeomotionResult<Animation> {
    let rt = def.run_time;
    let anim = match &def.action {
        ActionDef::Create { target, strategy } => {
            let id = find(scene, target)?;
            match strategy {
                Some(s) => Animation::create_with(id, *s, rt),
                None => Animation::create(id, rt),
            }
        }
        ActionDef::Transform { origin, destiny } => {
            Animation::transform(find(scene, origin)?, find(scene, destiny)?, rt)
        }
        ActionDef::Shift { targets, by } => {
            Animation::shift(find_all(scene, targets)?, Vec2::new(by[0], by[1]), rt)
        }
        ActionDef::Scale {
            targets,
            factor,
            center,
        } => Animation::scale(find_all(scene, targets)?, *factor, center.map(point), rt),
        ActionDef::Rotate {
            targets,
            degrees,
            center,
        } => Animation::rotate(
            find_all(scene, targets)?,
            degrees.to_radians(),
            center.map(point),
            rt,
        ),
        ActionDef::FadeIn { targets } => Animation::fade_in(find_all(scene, targets)?, rt),
        ActionDef::FadeOut { targets } => Animation::fade_out(find_all(scene, targets)?, rt),
        ActionDef::Wait => Animation::wait(rt),
    };
    Ok(match def.ease {
        Some(ease) => anim.with_ease(ease),
        None => anim,
    })
}

fn authored_object(scene: &Scene, source: &SourceDef) -> GeomotionResult<MathObject> {
    let styles = &scene.config().styles;
    Ok(match source {
        SourceDef::Point(p) => MathObject::Point {
            pos: point(*p),
            style: styles.point.clone(),
        },
        SourceDef::Scalar(v) => MathObject::Scalar(*v),
        SourceDef::Shape(def) => {
            let shape = match def {
                ShapeDef::Segment { a, b } => Shape::segment(point(*a), point(*b)),
                ShapeDef::Polyline { points } => {
                    Shape::polyline(&points.iter().copied().map(point).collect::<Vec<_>>())
                }
                ShapeDef::Polygon { points } => {
                    Shape::polygon(&points.iter().copied().map(point).collect::<Vec<_>>())
                }
                ShapeDef::RegularPolygon {
                    center,
                    radius,
                    sides,
                } => Shape::regular_polygon(point(*center), *radius, *sides),
                ShapeDef::Circle { center, radius } => Shape::circle(point(*center), *radius),
                ShapeDef::Rectangle { min, max } => Shape::rectangle(rect(*min, *max)),
                ShapeDef::Svg { d } => Shape::from_svg_path(d)?,
            };
            MathObject::Shape(shape.with_style(styles.shape.clone()))
        }
        SourceDef::Axes(def) => MathObject::Axes(Axes::new(
            (def.x_range[0], def.x_range[1]),
            (def.y_range[0], def.y_range[1]),
            def.tick_step,
            def.tick_size,
            &styles.shape,
        )),
        SourceDef::Construct(_) => MathObject::Group(Vec::new()),
    })
}

fn apply_patch(object: &mut MathObject, patch: &StylePatch) {
    object.map_styles(&mut |s| s.merge(patch));
}

fn resolve_construction(
    scene: &Scene,
    owner: &str,
    def: &ConstructDef,
) -> GeomotionResult<Construction> {
    let id = |label: &str| {
        scene.find(label).ok_or_else(|| {
            GeomotionError::validation(format!("'{owner}' refers to unknown label '{label}'"))
        })
    };
    Ok(match def {
        ConstructDef::MidPoint { a, b } => Construction::MidPoint {
            a: id(a)?,
            b: id(b)?,
        },
        ConstructDef::Segment { a, b } => Construction::Segment {
            a: id(a)?,
            b: id(b)?,
        },
        ConstructDef::Line { a, b } => Construction::Line {
            a: id(a)?,
            b: id(b)?,
        },
        ConstructDef::Polygon { vertices } => Construction::Polygon {
            vertices: vertices
                .iter()
                .map(|v| id(v))
                .collect::<GeomotionResult<Vec<_>>>()?,
        },
        ConstructDef::CircleCenterPoint { center, through } => Construction::CircleCenterPoint {
            center: id(center)?,
            through: id(through)?,
        },
        ConstructDef::CircleCenterRadius { center, radius } => Construction::CircleCenterRadius {
            center: id(center)?,
            radius: id(radius)?,
        },
        ConstructDef::CircleThreePoints { a, b, c } => Construction::CircleThreePoints {
            a: id(a)?,
            b: id(b)?,
            c: id(c)?,
        },
        ConstructDef::CircumCenter { a, b, c } => Construction::CircumCenter {
            a: id(a)?,
            b: id(b)?,
            c: id(c)?,
        },
        ConstructDef::EllipseFociPoint { f1, f2, through } => Construction::EllipseFociPoint {
            f1: id(f1)?,
            f2: id(f2)?,
            through: id(through)?,
        },
        ConstructDef::PerpBisector { a, b } => Construction::PerpBisector {
            a: id(a)?,
            b: id(b)?,
        },
        ConstructDef::AngleBisector { a, vertex, c } => Construction::AngleBisector {
            a: id(a)?,
            vertex: id(vertex)?,
            c: id(c)?,
        },
        ConstructDef::Intersection { first, second } => Construction::Intersection {
            first: id(first)?,
            second: id(second)?,
        },
        ConstructDef::Distance { a, b } => Construction::Distance {
            a: id(a)?,
            b: id(b)?,
        },
        ConstructDef::Arrow {
            tail,
            tip,
            head_len,
            double,
        } => Construction::ArrowBetween {
            tail: id(tail)?,
            tip: id(tip)?,
            head_len: *head_len,
            double: *double,
        },
        ConstructDef::Delimiter { a, b, placement } => Construction::Delimiter {
            a: id(a)?,
            b: id(b)?,
            placement: *placement,
        },
        ConstructDef::DelimiterTip {
            a,
            b,
            placement,
            distance,
        } => Construction::DelimiterTip {
            a: id(a)?,
            b: id(b)?,
            placement: *placement,
            distance: *distance,
        },
        ConstructDef::Label {
            template,
            args,
            anchor,
            height,
        } => Construction::Label(LabelSpec {
            template: template.clone(),
            args: args
                .iter()
                .map(|a| id(a))
                .collect::<GeomotionResult<Vec<_>>>()?,
            anchor: anchor.as_deref().map(id).transpose()?,
            height: *height,
        }),
    })
}

fn find(scene: &Scene, label: &str) -> GeomotionResult<ObjectId> {
    scene
        .find(label)
        .ok_or_else(|| GeomotionError::validation(format!("unknown label '{label}'")))
}

fn find_all(scene: &Scene, labels: &[String]) -> GeomotionResult<Vec<ObjectId>> {
    labels.iter().map(|l| find(scene, l)).collect()
}

fn move_point(scene: &mut Scene, label: &str, to: [f64; 2]) -> GeomotionResult<()> {
    let id = find(scene, label)?;
    if !scene.is_free(id) {
        return Err(GeomotionError::validation(format!(
            "'{label}' is derived and cannot be moved"
        )));
    }
    match scene.object_mut(id) {
        Some(MathObject::Point { pos, .. }) => *pos = point(to),
        Some(other) => {
            return Err(GeomotionError::validation(format!(
                "'{label}' is a {}, not a point",
                other.kind()
            )));
        }
        None => return Err(GeomotionError::validation(format!("unknown label '{label}'"))),
    }
    scene.update();
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/load.rs"]
mod tests;
