//! The closed set of interaction modes and the placeable entities that drive
//! automatic mode changes.
//!
//! Exactly one [`Mode`] is active at a time. The rules here are pure; the
//! engine applies them and owns the actual transition (tool teardown and
//! setup, scene-wide flag changes, notifications).

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    None,
    /// Idle state: pointer selects, drags and edits existing drawables.
    #[default]
    Select,
    /// Hand tool: primary drag pans.
    Move,
    Crop,
    /// Scale calibration line.
    Measure,
    MeasureArea,
    MeasureVolume,
    MeasureDistance,
    Erase,
    PlaceSymbol,
    Draw,
}

impl Mode {
    pub const ALL: [Mode; 11] = [
        Mode::None,
        Mode::Select,
        Mode::Move,
        Mode::Crop,
        Mode::Measure,
        Mode::MeasureArea,
        Mode::MeasureVolume,
        Mode::MeasureDistance,
        Mode::Erase,
        Mode::PlaceSymbol,
        Mode::Draw,
    ];

    /// Wire name of the mode (`"measure-area"` etc.).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Select => "select",
            Self::Move => "move",
            Self::Crop => "crop",
            Self::Measure => "measure",
            Self::MeasureArea => "measure-area",
            Self::MeasureVolume => "measure-volume",
            Self::MeasureDistance => "measure-distance",
            Self::Erase => "erase",
            Self::PlaceSymbol => "place-symbol",
            Self::Draw => "draw",
        }
    }

    /// Modes that need a scale calibration before they can be entered.
    #[must_use]
    pub fn requires_scale(self) -> bool {
        matches!(self, Self::MeasureArea | Self::MeasureVolume | Self::MeasureDistance)
    }

    /// Modes that drop the current selection and turn off general selection.
    #[must_use]
    pub fn clears_selection(self) -> bool {
        matches!(
            self,
            Self::MeasureArea | Self::MeasureVolume | Self::MeasureDistance | Self::Draw | Self::Crop | Self::Erase
        )
    }

    /// Tool modes during which wheel zoom, drag pan and pinch are ignored.
    #[must_use]
    pub fn blocks_pan_zoom(self) -> bool {
        matches!(self, Self::Crop | Self::Measure | Self::Erase | Self::PlaceSymbol | Self::Draw)
    }

    /// Whether general-purpose canvas selection is on in this mode.
    #[must_use]
    pub fn allows_selection(self) -> bool {
        matches!(self, Self::Select)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown mode string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_owned()))
    }
}

/// Drawing primitive used by draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawPrimitive {
    Freehand,
    Line,
    Rectangle,
    Circle,
}

impl DrawPrimitive {
    /// Parse the external entity key; `None` for anything that is not a
    /// draw primitive.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "freehand" => Some(Self::Freehand),
            "line" => Some(Self::Line),
            "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            _ => None,
        }
    }
}

/// An externally selected entity that the user is about to place or draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum Placeable {
    /// A symbol from the external symbol factory, by type key.
    Symbol(String),
    /// A free text label.
    Text,
    /// A draw-mode primitive.
    Draw(DrawPrimitive),
}

impl Placeable {
    /// Classify an external entity key: draw primitives, `"text"`, or a symbol.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if let Some(p) = DrawPrimitive::from_key(key) {
            Self::Draw(p)
        } else if key == "text" {
            Self::Text
        } else {
            Self::Symbol(key.to_owned())
        }
    }

    /// The mode that selecting this entity switches to.
    #[must_use]
    pub fn target_mode(&self) -> Mode {
        match self {
            Self::Draw(_) => Mode::Draw,
            Self::Symbol(_) | Self::Text => Mode::PlaceSymbol,
        }
    }

    /// Key the symbol factory knows this entity by.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Symbol(k) => k,
            Self::Text => "text",
            Self::Draw(DrawPrimitive::Freehand) => "freehand",
            Self::Draw(DrawPrimitive::Line) => "line",
            Self::Draw(DrawPrimitive::Rectangle) => "rectangle",
            Self::Draw(DrawPrimitive::Circle) => "circle",
        }
    }
}
