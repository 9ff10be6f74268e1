//! The scene: object arena, dependency graph, visible list and the frame loop.

use std::collections::{BTreeSet, HashMap};

use crate::animation::animation::Animation;
use crate::construct::construction::{Construction, ObjectLookup};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;
use crate::geom::object::MathObject;
use crate::graph::dependency::{DepList, DependencyGraph, DependencySource, UpdateReport, Updatable};
use crate::scene::camera::Camera;
use crate::scene::config::{CreationDefaults, DefaultStyles, SceneConfig};
use crate::scene::render::Renderer;
use crate::text::compiler::{NoTextCompiler, TextCompiler};

/// One arena slot.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub label: Option<String>,
    pub object: MathObject,
    /// How the object is derived, `None` for authored objects.
    pub construction: Option<Construction>,
    /// A free derived object keeps its state when its dependencies move.
    pub free: bool,
    /// `false` once discarded; ids are never reused.
    pub alive: bool,
}

/// Dense arena of scene objects indexed by [`ObjectId`].
#[derive(Clone, Debug, Default)]
pub struct ObjectStore {
    slots: Vec<SceneObject>,
    live: usize,
}

impl ObjectStore {
    fn push(&mut self, object: MathObject, label: Option<String>) -> ObjectId {
        let id = ObjectId::from_index(self.slots.len());
        self.live += 1;
        self.slots.push(SceneObject {
            label,
            object,
            construction: None,
            free: false,
            alive: true,
        });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.slots.get(id.index()).filter(|s| s.alive)
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.slots.get_mut(id.index()).filter(|s| s.alive)
    }

    /// Mark `id` dead and drop its contents. The slot stays so ids are never reused.
    fn kill(&mut self, id: ObjectId) -> Option<SceneObject> {
        let slot = self.get_mut(id)?;
        let dead = SceneObject {
            label: None,
            object: MathObject::Group(Vec::new()),
            construction: None,
            free: false,
            alive: false,
        };
        let old = std::mem::replace(slot, dead);
        self.live -= 1;
        Some(old)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Slots ever allocated, dead ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectLookup for ObjectStore {
    fn lookup(&self, id: ObjectId) -> Option<&MathObject> {
        self.get(id).map(|s| &s.object)
    }

    fn label_of(&self, id: ObjectId) -> Option<&str> {
        self.get(id).and_then(|s| s.label.as_deref())
    }
}

impl DependencySource for ObjectStore {
    fn dependencies_of(&self, id: ObjectId) -> DepList {
        self.get(id)
            .and_then(|s| s.construction.as_ref())
            .map(Construction::dependencies)
            .unwrap_or_default()
    }

    fn describe(&self, id: ObjectId) -> String {
        match self.label_of(id) {
            Some(label) => label.to_owned(),
            None => id.to_string(),
        }
    }
}

/// Mutable view handed to the graph during an update pass.
struct Rebuilder<'a> {
    store: &'a mut ObjectStore,
    compiler: &'a dyn TextCompiler,
    styles: &'a DefaultStyles,
}

impl Updatable for Rebuilder<'_> {
    fn is_updatable(&self, id: ObjectId) -> bool {
        self.store
            .get(id)
            .is_some_and(|s| !s.free && s.construction.is_some())
    }

    fn rebuild(&mut self, id: ObjectId) {
        let Some(construction) = self.store.get(id).and_then(|s| s.construction.as_ref()) else {
            return;
        };
        match construction.build(&*self.store, self.compiler) {
            Ok(built) => {
                let style = self.styles.for_kind(built.kind()).clone();
                if let Some(slot) = self.store.get_mut(id) {
                    if slot.object.kind() == built.kind() {
                        slot.object.replace_geometry(&built);
                    } else {
                        slot.object = built;
                        slot.object.set_style(&style);
                    }
                }
            }
            Err(e) => {
                tracing::error!(object = %self.store.describe(id), error = %e, "rebuild failed, keeping previous geometry");
            }
        }
    }
}

/// Outcome of [`Scene::play`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayStats {
    pub frames: u64,
    /// Animations that failed to initialize.
    pub skipped: usize,
    /// Rebuilds performed by the update passes of this call.
    pub rebuilt: usize,
}

pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    store: ObjectStore,
    graph: DependencyGraph,
    /// Drawn objects, back to front.
    visible: Vec<ObjectId>,
    labels: HashMap<String, ObjectId>,
    /// Objects mutated since the last update pass.
    pending: BTreeSet<ObjectId>,
    compiler: Box<dyn TextCompiler>,
    frame: FrameIndex,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("objects", &self.store.len())
            .field("visible", &self.visible)
            .field("graph_nodes", &self.graph.len())
            .field("frame", &self.frame)
            .finish()
    }
}

impl Scene {
    pub fn new(config: SceneConfig) -> GeomotionResult<Self> {
        Self::with_compiler(config, Box::new(NoTextCompiler))
    }

    pub fn with_compiler(
        config: SceneConfig,
        compiler: Box<dyn TextCompiler>,
    ) -> GeomotionResult<Self> {
        config.validate()?;
        let camera = Camera::new(config.view, config.canvas)?;
        Ok(Self {
            config,
            camera,
            store: ObjectStore::default(),
            graph: DependencyGraph::new(),
            visible: Vec::new(),
            labels: HashMap::new(),
            pending: BTreeSet::new(),
            compiler,
            frame: FrameIndex(0),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn fps(&self) -> Fps {
        self.config.fps
    }

    pub fn creation_defaults(&self) -> &CreationDefaults {
        &self.config.creation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Index of the next frame [`Scene::render_frame`] will draw.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    // ----- object registry -----

    /// Store `object` without adding it to the visible list.
    pub fn insert(&mut self, object: MathObject) -> ObjectId {
        self.store.push(object, None)
    }

    pub fn insert_labeled(
        &mut self,
        label: impl Into<String>,
        object: MathObject,
    ) -> GeomotionResult<ObjectId> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(GeomotionError::validation(format!(
                "duplicate object label '{label}'"
            )));
        }
        let id = self.store.push(object, Some(label.clone()));
        self.labels.insert(label, id);
        Ok(id)
    }

    /// Store `object` and make it visible.
    pub fn add_object(&mut self, object: MathObject) -> ObjectId {
        let id = self.insert(object);
        self.add(id);
        id
    }

    /// Make `id` visible on top of everything else. Already visible objects keep their place.
    pub fn add(&mut self, id: ObjectId) {
        if self.store.get(id).is_some() && !self.visible.contains(&id) {
            self.visible.push(id);
        }
    }

    /// Hide `id`. The object stays in the store and in the graph.
    pub fn remove(&mut self, id: ObjectId) {
        self.visible.retain(|v| *v != id);
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.visible.contains(&id)
    }

    pub fn visible(&self) -> &[ObjectId] {
        &self.visible
    }

    /// Visible objects, back to front.
    pub fn math_objects(&self) -> impl Iterator<Item = &MathObject> + '_ {
        self.visible.iter().filter_map(|id| self.store.lookup(*id))
    }

    pub fn object(&self, id: ObjectId) -> Option<&MathObject> {
        self.store.lookup(id)
    }

    /// Mutable access; the change is committed to the graph on the next [`Scene::update`].
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut MathObject> {
        let slot = self.store.get_mut(id)?;
        self.pending.insert(id);
        Some(&mut slot.object)
    }

    pub fn scene_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.store.get(id)
    }

    pub fn label(&self, id: ObjectId) -> Option<&str> {
        self.store.label_of(id)
    }

    pub fn find(&self, label: &str) -> Option<ObjectId> {
        self.labels.get(label).copied()
    }

    /// Overwrite an object outside of the change tracking. Used for animation proxies, which
    /// nothing depends on.
    pub(crate) fn overwrite(&mut self, id: ObjectId, object: MathObject) {
        if let Some(slot) = self.store.get_mut(id) {
            slot.object = object;
        }
    }

    /// Put `incoming` where `outgoing` is drawn, or on top when `outgoing` is not visible.
    pub(crate) fn swap_visible(&mut self, outgoing: ObjectId, incoming: ObjectId) {
        if outgoing == incoming {
            self.add(incoming);
            return;
        }
        if !self.contains(outgoing) {
            self.add(incoming);
            return;
        }
        self.visible.retain(|v| *v != incoming);
        if let Some(i) = self.visible.iter().position(|v| *v == outgoing) {
            self.visible[i] = incoming;
        }
    }

    /// Drop a transient object for good.
    pub(crate) fn discard(&mut self, id: ObjectId) {
        if self.graph.contains(id) {
            tracing::warn!(object = %self.store.describe(id), "refusing to discard a graph node");
            return;
        }
        self.remove(id);
        self.pending.remove(&id);
        if let Some(label) = self.store.kill(id).and_then(|old| old.label) {
            self.labels.remove(&label);
        }
    }

    // ----- constructibles -----

    /// Build a derived object from `construction`, register it in the graph and return its id.
    ///
    /// The object is not made visible.
    pub fn construct(&mut self, construction: Construction) -> GeomotionResult<ObjectId> {
        self.construct_inner(None, construction)
    }

    pub fn construct_labeled(
        &mut self,
        label: impl Into<String>,
        construction: Construction,
    ) -> GeomotionResult<ObjectId> {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(GeomotionError::validation(format!(
                "duplicate object label '{label}'"
            )));
        }
        self.construct_inner(Some(label), construction)
    }

    fn construct_inner(
        &mut self,
        label: Option<String>,
        construction: Construction,
    ) -> GeomotionResult<ObjectId> {
        for dep in construction.dependencies() {
            if self.store.get(dep).is_none() {
                return Err(GeomotionError::construction(format!(
                    "{}: unknown dependency {dep}",
                    construction.name()
                )));
            }
        }
        // Fresh dependencies may still carry mutations the graph has not seen.
        self.update();
        let mut object = construction.build(&self.store, self.compiler.as_ref())?;
        object.set_style(self.config.styles.for_kind(object.kind()));

        let id = self.store.push(object, label.clone());
        if let Some(slot) = self.store.get_mut(id) {
            slot.construction = Some(construction);
        }
        if let Err(e) = self.graph.add_node(id, &self.store) {
            self.store.kill(id);
            return Err(e);
        }
        if let Some(label) = label {
            self.labels.insert(label, id);
        }
        tracing::debug!(object = %self.store.describe(id), "constructed");
        Ok(id)
    }

    /// Attach constructions to already inserted objects and register them as one batch.
    ///
    /// Constructions may refer to each other in any order. On error (including a cycle) no
    /// construction of the batch stays attached and the graph is unchanged.
    pub fn construct_batch(&mut self, items: Vec<(ObjectId, Construction)>) -> GeomotionResult<()> {
        let mut ids = Vec::with_capacity(items.len());
        for (id, construction) in &items {
            if self.store.get(*id).is_none() {
                return Err(GeomotionError::construction(format!(
                    "{}: unknown object {id}",
                    construction.name()
                )));
            }
            if self.graph.contains(*id) {
                return Err(GeomotionError::construction(format!(
                    "object '{}' is already derived",
                    self.store.describe(*id)
                )));
            }
            for dep in construction.dependencies() {
                if self.store.get(dep).is_none() {
                    return Err(GeomotionError::construction(format!(
                        "{}: unknown dependency {dep}",
                        construction.name()
                    )));
                }
            }
            ids.push(*id);
        }

        for (id, construction) in items {
            if let Some(slot) = self.store.get_mut(id) {
                slot.construction = Some(construction);
            }
        }
        if let Err(e) = self.graph.add_nodes(&ids, &self.store) {
            for id in &ids {
                if let Some(slot) = self.store.get_mut(*id) {
                    slot.construction = None;
                }
            }
            tracing::error!(error = %e, "construction batch rejected");
            return Err(e);
        }
        for id in &ids {
            self.graph.invalidate(*id);
        }
        self.update();
        Ok(())
    }

    /// Replace how `id` is derived. A construction that would close a cycle is rejected and
    /// the previous one stays in place.
    pub fn set_construction(
        &mut self,
        id: ObjectId,
        construction: Construction,
    ) -> GeomotionResult<()> {
        let slot = self
            .store
            .get_mut(id)
            .ok_or_else(|| GeomotionError::construction(format!("unknown object {id}")))?;
        let previous = slot.construction.replace(construction);
        if let Err(e) = self.graph.rewire(id, &self.store) {
            if let Some(slot) = self.store.get_mut(id) {
                slot.construction = previous;
            }
            return Err(e);
        }
        self.graph.invalidate(id);
        self.update();
        Ok(())
    }

    /// Toggle whether a derived object follows its dependencies. Making it derived again
    /// rebuilds it on the next update.
    pub fn set_free(&mut self, id: ObjectId, free: bool) {
        if let Some(slot) = self.store.get_mut(id) {
            slot.free = free;
            if !free {
                self.graph.invalidate(id);
            }
        }
    }

    /// Authored objects are always free.
    pub fn is_free(&self, id: ObjectId) -> bool {
        self.store
            .get(id)
            .is_none_or(|s| s.free || s.construction.is_none())
    }

    pub fn is_derived(&self, id: ObjectId) -> bool {
        self.store
            .get(id)
            .is_some_and(|s| s.construction.is_some())
    }

    /// Copy of `id` under a new identity. A derived object's copy is derived from the same
    /// dependencies.
    pub fn copy_object(&mut self, id: ObjectId) -> GeomotionResult<ObjectId> {
        let slot = self
            .store
            .get(id)
            .ok_or_else(|| GeomotionError::construction(format!("unknown object {id}")))?;
        let object = slot.object.clone();
        let construction = slot.construction.clone();
        let free = slot.free;
        let copy = self.store.push(object, None);
        if let Some(c) = construction {
            if let Some(slot) = self.store.get_mut(copy) {
                slot.construction = Some(c);
                slot.free = free;
            }
            self.graph.add_node(copy, &self.store)?;
        }
        Ok(copy)
    }

    // ----- frame loop -----

    /// Commit pending mutations as one version batch, then rebuild every dirty derived object.
    pub fn update(&mut self) -> UpdateReport {
        if !self.pending.is_empty() {
            let changed = std::mem::take(&mut self.pending);
            self.graph.mark_changed(changed);
        }
        let mut rebuilder = Rebuilder {
            store: &mut self.store,
            compiler: self.compiler.as_ref(),
            styles: &self.config.styles,
        };
        self.graph.update_all(&mut rebuilder)
    }

    /// Draw the visible objects as the current frame and advance the frame counter.
    pub fn render_frame(&mut self, renderer: &mut dyn Renderer) -> GeomotionResult<()> {
        renderer.begin_frame(self.frame, &self.camera)?;
        for id in &self.visible {
            if let Some(object) = self.store.lookup(*id) {
                renderer.draw(object, &self.camera);
            }
        }
        renderer.end_frame()?;
        self.frame = self.frame.next();
        Ok(())
    }

    /// Run `animations` together until all of them finish, drawing one frame per step.
    #[tracing::instrument(level = "debug", skip_all, fields(animations = animations.len()))]
    pub fn play(
        &mut self,
        renderer: &mut dyn Renderer,
        mut animations: Vec<Animation>,
    ) -> GeomotionResult<PlayStats> {
        let mut stats = PlayStats::default();
        stats.rebuilt += self.update().rebuilt.len();
        for anim in &mut animations {
            if !anim.initialize(self) {
                stats.skipped += 1;
            }
        }
        stats.rebuilt += self.update().rebuilt.len();
        if animations.iter().all(Animation::is_finished) {
            return Ok(stats);
        }

        loop {
            let (done, rebuilt) = self.step(&mut animations);
            stats.rebuilt += rebuilt;
            self.render_frame(renderer)?;
            stats.frames += 1;
            if done {
                break;
            }
        }
        tracing::debug!(frames = stats.frames, skipped = stats.skipped, "play finished");
        Ok(stats)
    }

    /// Advance every animation by one frame and bring derived objects and proxies up to date.
    ///
    /// Returns whether all animations are finished and how many objects were rebuilt.
    pub(crate) fn step(&mut self, animations: &mut [Animation]) -> (bool, usize) {
        let mut done = true;
        for anim in animations.iter_mut() {
            done &= anim.process(self);
        }
        let rebuilt = self.update().rebuilt.len();
        for anim in animations.iter_mut() {
            anim.refresh(self);
        }
        (done, rebuilt)
    }

    /// Hold the current state for `secs`.
    pub fn wait(&mut self, renderer: &mut dyn Renderer, secs: f64) -> GeomotionResult<PlayStats> {
        self.play(renderer, vec![Animation::wait(secs)])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/scene.rs"]
mod tests;
