//! Entity arena with deferred removal
//!
//! Bodies are keyed by id in an ordered map. Ids are allocated monotonically,
//! so id order is insertion order. Removal only records the id; the live set
//! changes in `flush`, never while bodies are being updated.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{Body, BodyId};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_id: BodyId,
    bodies: BTreeMap<BodyId, Body>,
    pending_removal: BTreeSet<BodyId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id, build the body with it and insert it.
    pub fn register(&mut self, build: impl FnOnce(BodyId) -> Body) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;
        let mut body = build(id);
        body.id = id;
        self.bodies.insert(id, body);
        id
    }

    /// Mark a body for removal at the next flush. Queuing twice is harmless,
    /// as is queuing an id that is not live.
    pub fn queue_removal(&mut self, id: BodyId) {
        if self.bodies.contains_key(&id) {
            self.pending_removal.insert(id);
        }
    }

    pub fn is_pending_removal(&self, id: BodyId) -> bool {
        self.pending_removal.contains(&id)
    }

    /// Drop every queued body. Returns how many were removed.
    pub fn flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_removal);
        pending
            .into_iter()
            .filter(|id| self.bodies.remove(id).is_some())
            .count()
    }

    /// Remove every body. The id counter keeps running so ids stay unique
    /// across game sessions.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.pending_removal.clear();
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
