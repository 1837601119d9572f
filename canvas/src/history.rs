//! Snapshot-based undo/redo over the whole scene.
//!
//! `undo` holds serialized scenes oldest to newest; its top is always the
//! current state. The bottom entry is the seed (normally written right after
//! the background loads) and is never undone.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use tracing::{debug, warn};

use crate::scene::{Scene, SceneError};

/// Two stacks of immutable snapshots.
#[derive(Debug, Default)]
pub struct SceneHistory {
    undo: Vec<String>,
    redo: Vec<String>,
    /// Maximum undo entries; `None` is unbounded.
    capacity: Option<usize>,
}

impl SceneHistory {
    #[must_use]
    pub fn new(capacity: Option<usize>) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), capacity }
    }

    /// Snapshot the scene and push it as the new current state. Clears redo.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Encode`] if the scene cannot be serialized; both
    /// stacks are left untouched.
    pub fn save<S: Scene + ?Sized>(&mut self, scene: &S) -> Result<(), SceneError> {
        let snapshot = scene.serialize()?;
        self.undo.push(snapshot);
        self.redo.clear();
        if let Some(cap) = self.capacity {
            let excess = self.undo.len().saturating_sub(cap.max(1));
            if excess > 0 {
                self.undo.drain(..excess);
            }
        }
        debug!(depth = self.undo.len(), "history saved");
        Ok(())
    }

    /// Step back one snapshot. Returns `false` at the seed (nothing to undo).
    ///
    /// # Errors
    ///
    /// Returns the restore error; the stacks are rolled back so the history
    /// still matches the (unchanged) scene.
    pub fn undo<S: Scene + ?Sized>(&mut self, scene: &mut S) -> Result<bool, SceneError> {
        if self.undo.len() <= 1 {
            return Ok(false);
        }
        let Some(top) = self.undo.pop() else {
            return Ok(false);
        };
        let restored = match self.undo.last() {
            Some(previous) => scene.restore(previous),
            None => Ok(()),
        };
        if let Err(e) = restored {
            self.undo.push(top);
            return Err(e);
        }
        self.redo.push(top);
        sync_background(scene);
        debug!(depth = self.undo.len(), redo = self.redo.len(), "history undo");
        Ok(true)
    }

    /// Re-apply the most recently undone snapshot. Returns `false` when
    /// there is nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns the restore error; the snapshot stays on the redo stack.
    pub fn redo<S: Scene + ?Sized>(&mut self, scene: &mut S) -> Result<bool, SceneError> {
        let Some(next) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(e) = scene.restore(&next) {
            self.redo.push(next);
            return Err(e);
        }
        self.undo.push(next);
        sync_background(scene);
        debug!(depth = self.undo.len(), redo = self.redo.len(), "history redo");
        Ok(true)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo entries, seed included.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

/// Re-derive the background's lock and interactivity from its name tag.
///
/// A missing `locked` flag means locked. Returns `false` (and logs) when
/// the scene has no background.
pub fn sync_background<S: Scene + ?Sized>(scene: &mut S) -> bool {
    let Some(id) = scene.background().map(|d| d.id) else {
        warn!("background not found after restore");
        return false;
    };
    if let Some(bg) = scene.get_mut(id) {
        let locked = bg.locked.unwrap_or(true);
        bg.locked = Some(locked);
        bg.interactive = !locked;
    }
    true
}
