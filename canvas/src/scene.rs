//! The scene handle consumed by every controller, and the in-memory store.
//!
//! The host owns the real scene graph (and its renderer); the engine only
//! talks to it through [`Scene`]. [`SceneStore`] is the reference
//! implementation used headless and in tests.
//!
//! Stacking invariant: the background, when present, is the bottommost
//! object; the title block, when present, is the topmost.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{Drawable, DrawableId};
use crate::hit;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("snapshot encode failed: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("snapshot decode failed: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    Version(u32),
}

/// Add/remove/query drawables, selection state, render requests and
/// whole-scene serialization.
pub trait Scene {
    /// Add a drawable, respecting the stacking invariant. Returns its id.
    fn add(&mut self, drawable: Drawable) -> DrawableId;

    fn remove(&mut self, id: DrawableId) -> Option<Drawable>;

    fn get(&self, id: DrawableId) -> Option<&Drawable>;

    fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable>;

    /// All drawables, bottom to top.
    fn objects(&self) -> &[Drawable];

    fn set_active(&mut self, id: Option<DrawableId>);

    fn active(&self) -> Option<DrawableId>;

    /// Turn general-purpose click/rubber-band selection on or off.
    fn set_selection_enabled(&mut self, enabled: bool);

    fn selection_enabled(&self) -> bool;

    fn request_render(&mut self);

    /// Serialize every non-preview drawable.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Encode`] if serialization fails.
    fn serialize(&self) -> Result<String, SceneError>;

    /// Replace the whole scene from a snapshot. Previews are dropped and the
    /// active selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Decode`] / [`SceneError::Version`]; the scene is
    /// left unchanged on error.
    fn restore(&mut self, snapshot: &str) -> Result<(), SceneError>;

    /// First drawable carrying `name`.
    fn find_named(&self, name: &str) -> Option<&Drawable> {
        self.objects().iter().find(|d| d.name.as_deref() == Some(name))
    }

    fn background(&self) -> Option<&Drawable> {
        self.objects().iter().find(|d| d.is_background())
    }

    /// Topmost interactive, non-preview drawable under a world point.
    fn hit_test(&self, world: Point) -> Option<DrawableId> {
        hit::topmost(self.objects(), world)
    }
}

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    objects: Vec<&'a Drawable>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    objects: Vec<Drawable>,
}

/// In-memory scene: an ordered vector, index 0 at the bottom.
#[derive(Debug)]
pub struct SceneStore {
    objects: Vec<Drawable>,
    active: Option<DrawableId>,
    selection_enabled: bool,
    render_requests: u64,
}

impl SceneStore {
    /// Create an empty store with selection enabled.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new(), active: None, selection_enabled: true, render_requests: 0 }
    }

    /// Number of drawables, previews included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// How many times a render has been requested.
    #[must_use]
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    fn index_of(&self, id: DrawableId) -> Option<usize> {
        self.objects.iter().position(|d| d.id == id)
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SceneStore {
    fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = drawable.id;
        if let Some(i) = self.index_of(id) {
            self.objects.remove(i);
        }
        if drawable.is_background() {
            self.objects.retain(|d| !d.is_background());
            self.objects.insert(0, drawable);
        } else if drawable.is_title_block() {
            self.objects.retain(|d| !d.is_title_block());
            self.objects.push(drawable);
        } else {
            match self.objects.iter().position(Drawable::is_title_block) {
                Some(i) => self.objects.insert(i, drawable),
                None => self.objects.push(drawable),
            }
        }
        id
    }

    fn remove(&mut self, id: DrawableId) -> Option<Drawable> {
        let i = self.index_of(id)?;
        if self.active == Some(id) {
            self.active = None;
        }
        Some(self.objects.remove(i))
    }

    fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.objects.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.objects.iter_mut().find(|d| d.id == id)
    }

    fn objects(&self) -> &[Drawable] {
        &self.objects
    }

    fn set_active(&mut self, id: Option<DrawableId>) {
        self.active = id.filter(|id| self.index_of(*id).is_some());
    }

    fn active(&self) -> Option<DrawableId> {
        self.active
    }

    fn set_selection_enabled(&mut self, enabled: bool) {
        self.selection_enabled = enabled;
    }

    fn selection_enabled(&self) -> bool {
        self.selection_enabled
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn serialize(&self) -> Result<String, SceneError> {
        let out = SnapshotOut {
            version: SNAPSHOT_VERSION,
            objects: self.objects.iter().filter(|d| !d.preview).collect(),
        };
        serde_json::to_string(&out).map_err(SceneError::Encode)
    }

    fn restore(&mut self, snapshot: &str) -> Result<(), SceneError> {
        let parsed: SnapshotIn = serde_json::from_str(snapshot).map_err(SceneError::Decode)?;
        if parsed.version != SNAPSHOT_VERSION {
            return Err(SceneError::Version(parsed.version));
        }
        self.objects.clear();
        self.active = None;
        for d in parsed.objects {
            self.add(d);
        }
        Ok(())
    }
}
