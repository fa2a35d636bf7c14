use dash_engine::EntityId;

use crate::world::placement::{ObjectCategory, Placement};

/// Horizontal extent of one live world object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldObjectRecord {
    pub handle: EntityId,
    pub category: ObjectCategory,
    /// Left edge, refreshed before every sweep for objects that move
    pub x: f32,
    pub width: f32,
}

impl WorldObjectRecord {
    pub fn right_edge(&self) -> f32 {
        self.x + self.width
    }
}

/// Every world object that still needs tearing down, in spawn order.
#[derive(Debug, Default)]
pub struct SpatialObjectRegistry {
    records: Vec<WorldObjectRecord>,
}

impl SpatialObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record: WorldObjectRecord) {
        debug_assert!(
            record.width.is_finite() && record.width > 0.0,
            "registered {:?} without a usable width",
            record.handle
        );
        debug_assert!(!self.contains(record.handle), "{:?} registered twice", record.handle);
        self.records.push(record);
    }

    pub fn contains(&self, handle: EntityId) -> bool {
        self.records.iter().any(|r| r.handle == handle)
    }

    pub fn get(&self, handle: EntityId) -> Option<&WorldObjectRecord> {
        self.records.iter().find(|r| r.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorldObjectRecord> {
        self.records.iter()
    }

    pub fn count(&self, category: ObjectCategory) -> usize {
        self.records.iter().filter(|r| r.category == category).count()
    }

    /// Pull current x from placement for everything that moves. Objects
    /// placement no longer knows keep their last x.
    pub fn refresh_positions<P: Placement>(&mut self, placement: &P) {
        for record in self.records.iter_mut().filter(|r| r.category.moves()) {
            if let Some(x) = placement.position_x(record.handle) {
                record.x = x;
            }
        }
    }

    /// Release and drop every record matching `pred`. Returns what was dropped.
    pub fn evict_where<P, F>(&mut self, placement: &mut P, mut pred: F) -> Vec<WorldObjectRecord>
    where
        P: Placement,
        F: FnMut(&WorldObjectRecord) -> bool,
    {
        let (evicted, kept): (Vec<_>, Vec<_>) = self.records.drain(..).partition(|r| pred(r));
        self.records = kept;
        for record in &evicted {
            release(record, placement);
        }
        evicted
    }

    /// Release one object ahead of the sweep. Returns false if the handle
    /// was not registered, which means it was already released.
    pub fn remove<P: Placement>(&mut self, placement: &mut P, handle: EntityId) -> bool {
        match self.records.iter().position(|r| r.handle == handle) {
            Some(index) => {
                let record = self.records.remove(index);
                release(&record, placement);
                true
            }
            None => false,
        }
    }

    /// Release everything.
    pub fn release_all<P: Placement>(&mut self, placement: &mut P) -> usize {
        self.evict_where(placement, |_| true).len()
    }
}

/// Category-specific teardown. Enemies skip `detach`; destroying them is
/// enough to stop their behavior.
fn release<P: Placement>(record: &WorldObjectRecord, placement: &mut P) {
    match record.category {
        ObjectCategory::Enemy => placement.destroy(record.handle, record.category),
        category => {
            placement.detach(record.handle, category);
            placement.destroy(record.handle, category);
        }
    }
}
