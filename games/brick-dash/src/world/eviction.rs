use crate::world::placement::Placement;
use crate::world::registry::{SpatialObjectRegistry, WorldObjectRecord};

/// Sweeps larger than this are worth an info line.
const LOUD_SWEEP: usize = 10;

/// Releases objects that have fallen far enough behind the viewpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictionSweep {
    pub cleanup_buffer: f32,
}

impl EvictionSweep {
    pub fn new(cleanup_buffer: f32) -> Self {
        Self { cleanup_buffer }
    }

    /// Anything whose right edge is left of this goes.
    pub fn boundary(&self, viewpoint_x: f32) -> f32 {
        viewpoint_x - self.cleanup_buffer
    }

    pub fn is_stale(&self, record: &WorldObjectRecord, viewpoint_x: f32) -> bool {
        record.right_edge() < self.boundary(viewpoint_x)
    }

    pub fn run<P: Placement>(
        &self,
        registry: &mut SpatialObjectRegistry,
        placement: &mut P,
        viewpoint_x: f32,
    ) -> Vec<WorldObjectRecord> {
        registry.refresh_positions(placement);
        let boundary = self.boundary(viewpoint_x);
        let evicted = registry.evict_where(placement, |r| r.right_edge() < boundary);
        if evicted.len() > LOUD_SWEEP {
            log::info!(
                "Evicted {} objects behind x={:.0} ({} remain)",
                evicted.len(),
                boundary,
                registry.len()
            );
        } else if !evicted.is_empty() {
            log::debug!("Evicted {} objects behind x={:.0}", evicted.len(), boundary);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::placement::testing::{Call, MockPlacement};
    use crate::world::placement::{ObjectCategory, Placement, Spawn};
    use glam::Vec2;

    fn coin_with_right_edge(
        registry: &mut SpatialObjectRegistry,
        placement: &mut MockPlacement,
        right: f32,
    ) -> dash_engine::EntityId {
        let spawn = Spawn::coin(Vec2::new(right - 8.0, 540.0), 16.0, 0.5);
        let handle = placement.spawn(&spawn);
        registry.register(WorldObjectRecord {
            handle,
            category: ObjectCategory::Coin,
            x: spawn.pos.x,
            width: spawn.size.x,
        });
        handle
    }

    #[test]
    fn coin_far_behind_is_released() {
        let mut registry = SpatialObjectRegistry::new();
        let mut placement = MockPlacement::new();
        let coin = coin_with_right_edge(&mut registry, &mut placement, 100.0);

        let evicted = EvictionSweep::new(400.0).run(&mut registry, &mut placement, 600.0);
        assert_eq!(evicted.len(), 1);
        assert!(registry.is_empty());
        assert_eq!(
            placement.calls,
            vec![Call::Detach(coin, ObjectCategory::Coin), Call::Destroy(coin, ObjectCategory::Coin)]
        );
    }

    #[test]
    fn boundary_is_strict() {
        let mut registry = SpatialObjectRegistry::new();
        let mut placement = MockPlacement::new();
        coin_with_right_edge(&mut registry, &mut placement, 200.0);

        let evicted = EvictionSweep::new(400.0).run(&mut registry, &mut placement, 600.0);
        assert!(evicted.is_empty(), "right edge exactly on the boundary stays");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn moved_objects_are_judged_by_current_position() {
        let mut registry = SpatialObjectRegistry::new();
        let mut placement = MockPlacement::new();
        let coin = coin_with_right_edge(&mut registry, &mut placement, 2000.0);
        placement.shove(coin, 10.0);

        let evicted = EvictionSweep::new(400.0).run(&mut registry, &mut placement, 600.0);
        assert_eq!(evicted.len(), 1);
    }

    #[test]
    fn sweep_is_idempotent() {
        let mut registry = SpatialObjectRegistry::new();
        let mut placement = MockPlacement::new();
        for right in [50.0, 150.0, 250.0, 900.0, 1500.0] {
            coin_with_right_edge(&mut registry, &mut placement, right);
        }
        let sweep = EvictionSweep::new(400.0);
        let first = sweep.run(&mut registry, &mut placement, 600.0);
        let calls_after_first = placement.calls.len();
        let second = sweep.run(&mut registry, &mut placement, 600.0);

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(placement.calls.len(), calls_after_first);
        assert!(registry.iter().all(|r| !sweep.is_stale(r, 600.0)));
    }
}
