use crate::components::entity::Entity;
use crate::renderer::camera::FollowCamera;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Build the render buffer from active entities the camera can see,
/// sorted back-to-front by depth.
pub fn build_render_buffer<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    camera: &FollowCamera,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut visible: Vec<RenderInstance> = entities
        .filter(|e| e.active && e.alpha > 0.0)
        .filter(|e| camera.is_span_visible(e.pos.x, e.right()))
        .map(RenderInstance::from_entity)
        .collect();
    visible.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    for instance in visible {
        if !buffer.push(instance) {
            log::warn!("render buffer full, dropping remaining instances");
            break;
        }
    }
}
