use crate::gesture::TouchEvent;
use crate::source::SurfaceSource;

/// Forward a gesture event to the source's native input channel.
///
/// Returns `false` when the source has no input capability; that is a no-op,
/// not an error.
pub fn forward(source: &dyn SurfaceSource, event: &TouchEvent) -> bool {
    match source.touch_input() {
        Some(input) => {
            tracing::trace!(phase = ?event.phase, x = event.point.x, y = event.point.y, "inject touch");
            input.inject(event);
            true
        }
        None => false,
    }
}
