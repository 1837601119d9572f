//! Synchronous user-input callbacks the controllers block on.
//!
//! The host shows a dialog and returns the raw answer; `None` means the
//! user cancelled. Parsing and validation happen engine-side so every host
//! gets the same rules.

#[cfg(test)]
#[path = "prompt_test.rs"]
mod prompt_test;

use std::collections::VecDeque;

use crate::geometry::Rect;

/// Dialogs the engine may raise mid-gesture.
pub trait Prompts {
    /// Ask whether to extract `region` (world space) to a new sheet.
    fn confirm_crop(&mut self, region: &Rect) -> bool;

    /// Ask for the real-world length, in millimeters, of a drawn line.
    fn calibration_distance_mm(&mut self, pixel_length: f64) -> Option<String>;

    /// Ask for the room height in millimeters before volume measuring.
    fn room_height_mm(&mut self) -> Option<String>;
}

/// Which dialog was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Crop,
    CalibrationDistance,
    RoomHeight,
}

/// Prompts answered from queued replies. An empty queue answers "cancel".
///
/// Used by the headless replay driver and by tests; every question asked
/// is recorded in [`ScriptedPrompts::asked`].
#[derive(Debug, Default)]
pub struct ScriptedPrompts {
    crop: VecDeque<bool>,
    distances: VecDeque<Option<String>>,
    heights: VecDeque<Option<String>>,
    pub asked: Vec<PromptKind>,
}

impl ScriptedPrompts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer_crop(&mut self, confirm: bool) {
        self.crop.push_back(confirm);
    }

    pub fn answer_distance(&mut self, raw: Option<&str>) {
        self.distances.push_back(raw.map(str::to_owned));
    }

    pub fn answer_height(&mut self, raw: Option<&str>) {
        self.heights.push_back(raw.map(str::to_owned));
    }
}

impl Prompts for ScriptedPrompts {
    fn confirm_crop(&mut self, _region: &Rect) -> bool {
        self.asked.push(PromptKind::Crop);
        self.crop.pop_front().unwrap_or(false)
    }

    fn calibration_distance_mm(&mut self, _pixel_length: f64) -> Option<String> {
        self.asked.push(PromptKind::CalibrationDistance);
        self.distances.pop_front().flatten()
    }

    fn room_height_mm(&mut self) -> Option<String> {
        self.asked.push(PromptKind::RoomHeight);
        self.heights.pop_front().flatten()
    }
}

/// Parse a positive, finite millimeter value from user input.
#[must_use]
pub fn parse_positive_mm(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        _ => None,
    }
}
