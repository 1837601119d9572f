#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{Drawable, DrawableId};

/// Topmost drawable whose bounds contain `world`.
///
/// Previews and non-interactive drawables (the locked background) are never
/// hit. `objects` is bottom-to-top.
#[must_use]
pub fn topmost(objects: &[Drawable], world: Point) -> Option<DrawableId> {
    objects
        .iter()
        .rev()
        .filter(|d| !d.preview && d.interactive)
        .find(|d| d.bounds().contains(world))
        .map(|d| d.id)
}
