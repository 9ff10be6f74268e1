//! Dependency graph over scene objects.
//!
//! Nodes are [`ObjectId`] handles; edges point from a node to the nodes it is derived from. The
//! graph keeps a cached topological order (dependencies first), extended incrementally on
//! insertion, and drives version-stamped rebuild passes over it.

use std::collections::{HashMap, HashSet};

use smallvec::SmallVec;

use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::foundation::ids::ObjectId;

pub type DepList = SmallVec<[ObjectId; 4]>;

/// Read side of the graph: where node dependencies come from.
pub trait DependencySource {
    fn dependencies_of(&self, id: ObjectId) -> DepList;

    /// Human-readable name used in diagnostics.
    fn describe(&self, id: ObjectId) -> String {
        id.to_string()
    }
}

/// Write side of the graph: the storage that owns node geometry.
pub trait Updatable {
    /// `false` for free nodes, which keep their state even when dependencies move.
    fn is_updatable(&self, id: ObjectId) -> bool;

    /// Recompute the node from the current state of its dependencies.
    fn rebuild(&mut self, id: ObjectId);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport {
    /// Graph clock after the pass.
    pub clock: u64,
    /// Rebuilt nodes, in evaluation order.
    pub rebuilt: Vec<ObjectId>,
}

#[derive(Clone, Debug)]
struct NodeEntry {
    deps: DepList,
    dependents: Vec<ObjectId>,
    version: u64,
    /// Versions of `deps` observed at the last evaluation (parallel to `deps`).
    seen: SmallVec<[u64; 4]>,
    forced_dirty: bool,
}

const VISITING: u8 = 1;
const DONE: u8 = 2;

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<ObjectId, NodeEntry>,
    order: Vec<ObjectId>,
    position: HashMap<ObjectId, usize>,
    clock: u64,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Cached topological order: every node after all of its dependencies.
    pub fn order(&self) -> &[ObjectId] {
        &self.order
    }

    pub fn position(&self, id: ObjectId) -> Option<usize> {
        self.position.get(&id).copied()
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn version(&self, id: ObjectId) -> Option<u64> {
        self.nodes.get(&id).map(|n| n.version)
    }

    pub fn dependencies(&self, id: ObjectId) -> &[ObjectId] {
        self.nodes.get(&id).map(|n| n.deps.as_slice()).unwrap_or(&[])
    }

    pub fn dependents(&self, id: ObjectId) -> &[ObjectId] {
        self.nodes.get(&id).map(|n| n.dependents.as_slice()).unwrap_or(&[])
    }

    /// Every node that transitively depends on `id`, in topological order.
    pub fn transitive_dependents(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: Vec<ObjectId> = self.dependents(id).to_vec();
        while let Some(n) = stack.pop() {
            if seen.insert(n) {
                stack.extend_from_slice(self.dependents(n));
            }
        }
        let mut out: Vec<ObjectId> = seen.into_iter().collect();
        out.sort_by_key(|n| self.position(*n).unwrap_or(usize::MAX));
        out
    }

    /// `true` when a dependency changed since the node was last evaluated, or when the node was
    /// explicitly invalidated.
    pub fn is_dirty(&self, id: ObjectId) -> bool {
        let Some(entry) = self.nodes.get(&id) else {
            return false;
        };
        entry.forced_dirty || self.observed_versions(&entry.deps) != entry.seen
    }

    /// Insert `id` and, transitively, every dependency the graph does not know yet.
    ///
    /// Adding a known node is a no-op.
    pub fn add_node(&mut self, id: ObjectId, src: &impl DependencySource) -> GeomotionResult<()> {
        self.add_nodes(&[id], src)
    }

    /// Batched insertion.
    ///
    /// Collects the transitive closure of unknown nodes first, then orders only that subgraph
    /// with one post-order traversal and appends it. A cycle aborts the whole batch before
    /// anything is inserted.
    pub fn add_nodes(&mut self, ids: &[ObjectId], src: &impl DependencySource) -> GeomotionResult<()> {
        let mut edges: HashMap<ObjectId, DepList> = HashMap::new();
        let mut discovered: Vec<ObjectId> = Vec::new();
        let mut stack: Vec<ObjectId> = ids.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.contains(id) || edges.contains_key(&id) {
                continue;
            }
            let deps = src.dependencies_of(id);
            stack.extend(deps.iter().rev().copied());
            edges.insert(id, deps);
            discovered.push(id);
        }
        if discovered.is_empty() {
            return Ok(());
        }

        let sorted = post_order(&discovered, &edges)
            .map_err(|node| GeomotionError::cycle(src.describe(node)))?;

        for &id in &sorted {
            let deps = edges.remove(&id).unwrap_or_default();
            for &d in &deps {
                if let Some(dep) = self.nodes.get_mut(&d)
                    && !dep.dependents.contains(&id)
                {
                    dep.dependents.push(id);
                }
            }
            let seen = self.observed_versions(&deps);
            self.nodes.insert(
                id,
                NodeEntry {
                    deps,
                    dependents: Vec::new(),
                    version: self.clock,
                    seen,
                    forced_dirty: false,
                },
            );
            self.position.insert(id, self.order.len());
            self.order.push(id);
        }
        tracing::debug!(added = sorted.len(), total = self.order.len(), "graph nodes added");
        Ok(())
    }

    /// Re-read the dependencies of `id` after its construction changed.
    ///
    /// Unknown new dependencies are inserted first. A new dependency that already depends on
    /// `id` is rejected as a cycle and leaves the old wiring in place. The node is invalidated
    /// and the order is recomputed.
    pub fn rewire(&mut self, id: ObjectId, src: &impl DependencySource) -> GeomotionResult<()> {
        if !self.contains(id) {
            return self.add_node(id, src);
        }
        let deps = src.dependencies_of(id);
        self.add_nodes(&deps, src)?;

        let downstream: HashSet<ObjectId> = self.transitive_dependents(id).into_iter().collect();
        if deps.iter().any(|d| *d == id || downstream.contains(d)) {
            return Err(GeomotionError::cycle(src.describe(id)));
        }

        let old = self
            .nodes
            .get(&id)
            .map(|n| n.deps.clone())
            .unwrap_or_default();
        for d in &old {
            if let Some(dep) = self.nodes.get_mut(d) {
                dep.dependents.retain(|x| *x != id);
            }
        }
        for d in &deps {
            if let Some(dep) = self.nodes.get_mut(d)
                && !dep.dependents.contains(&id)
            {
                dep.dependents.push(id);
            }
        }
        let seen = self.observed_versions(&deps);
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.deps = deps;
            entry.seen = seen;
            entry.forced_dirty = true;
        }
        self.resort()
    }

    /// Force `id` to rebuild on the next pass.
    pub fn invalidate(&mut self, id: ObjectId) {
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.forced_dirty = true;
        }
    }

    /// Commit one mutation batch: advance the clock once and stamp `ids` with it.
    pub fn mark_changed(&mut self, ids: impl IntoIterator<Item = ObjectId>) -> u64 {
        self.clock += 1;
        let stamp = self.clock;
        for id in ids {
            if let Some(entry) = self.nodes.get_mut(&id) {
                entry.version = stamp;
            }
        }
        stamp
    }

    /// One pass over the topological order, rebuilding every dirty updatable node.
    ///
    /// Dependencies are evaluated before their dependents, so a rebuild never observes stale
    /// input. Rebuilt nodes share one fresh version stamp per pass.
    #[tracing::instrument(level = "debug", skip(self, target))]
    pub fn update_all(&mut self, target: &mut impl Updatable) -> UpdateReport {
        let mut rebuilt = Vec::new();
        let mut stamp: Option<u64> = None;

        for i in 0..self.order.len() {
            let id = self.order[i];
            if !self.is_dirty(id) {
                continue;
            }
            let rebuild = target.is_updatable(id);
            if rebuild {
                target.rebuild(id);
                tracing::trace!(node = %id, "rebuilt");
            }
            let version = if rebuild {
                Some(*stamp.get_or_insert_with(|| {
                    self.clock += 1;
                    self.clock
                }))
            } else {
                None
            };
            let seen = match self.nodes.get(&id) {
                Some(entry) => self.observed_versions(&entry.deps),
                None => continue,
            };
            if let Some(entry) = self.nodes.get_mut(&id) {
                entry.seen = seen;
                entry.forced_dirty = false;
                if let Some(v) = version {
                    entry.version = v;
                }
            }
            if rebuild {
                rebuilt.push(id);
            }
        }

        if !rebuilt.is_empty() {
            tracing::debug!(rebuilt = rebuilt.len(), clock = self.clock, "update pass");
        }
        UpdateReport {
            clock: self.clock,
            rebuilt,
        }
    }

    fn observed_versions(&self, deps: &[ObjectId]) -> SmallVec<[u64; 4]> {
        deps.iter()
            .map(|d| self.nodes.get(d).map_or(0, |n| n.version))
            .collect()
    }

    fn resort(&mut self) -> GeomotionResult<()> {
        let edges: HashMap<ObjectId, DepList> = self
            .nodes
            .iter()
            .map(|(id, n)| (*id, n.deps.clone()))
            .collect();
        let order = post_order(&self.order, &edges)
            .map_err(|node| GeomotionError::cycle(node.to_string()))?;
        self.position = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        self.order = order;
        Ok(())
    }
}

/// Post-order DFS over `edges`, visiting `roots` in order. Edges leaving the subgraph are
/// ignored. Returns the in-progress node that closed a cycle on failure.
fn post_order(
    roots: &[ObjectId],
    edges: &HashMap<ObjectId, DepList>,
) -> Result<Vec<ObjectId>, ObjectId> {
    let mut state: HashMap<ObjectId, u8> = HashMap::with_capacity(edges.len());
    let mut out = Vec::with_capacity(edges.len());

    for &r in roots {
        if !edges.contains_key(&r) || state.contains_key(&r) {
            continue;
        }
        // Each frame is a node and the index of its next dependency to visit.
        let mut stack: Vec<(ObjectId, usize)> = vec![(r, 0)];
        state.insert(r, VISITING);
        while let Some(top) = stack.last_mut() {
            let (v, next) = *top;
            let deps = edges.get(&v).map_or(&[][..], |d| d.as_slice());
            match deps.get(next) {
                Some(&d) => {
                    top.1 += 1;
                    if !edges.contains_key(&d) {
                        continue;
                    }
                    match state.get(&d).copied() {
                        None => {
                            state.insert(d, VISITING);
                            stack.push((d, 0));
                        }
                        Some(VISITING) => return Err(d),
                        Some(_) => {}
                    }
                }
                None => {
                    state.insert(v, DONE);
                    out.push(v);
                    stack.pop();
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/graph/dependency.rs"]
mod tests;
