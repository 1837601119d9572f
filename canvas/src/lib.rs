//! Interaction engine for floor-plan markup.
//!
//! This crate owns everything between raw pointer/keyboard/touch input and
//! the drawable scene: the mode state machine, the screen/world transform,
//! grid snapping, measurement geometry, and snapshot undo/redo. The host
//! owns rendering and UI chrome; it feeds events in and acts on the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Mode state machine and input routing ([`engine::Engine`]) |
//! | [`tools`] | Per-mode gesture controllers (crop, calibrate, area, distance, erase, place, draw, select) |
//! | [`pan_zoom`] | Wheel zoom, drag pan, two-finger pinch |
//! | [`camera`] | Viewport transform and coordinate conversions |
//! | [`grid`] | Grid settings and half-cell snapping |
//! | [`geometry`] | Polygon area, centroid, unit conversion, labels |
//! | [`history`] | Snapshot undo/redo |
//! | [`scene`] | Scene handle trait and in-memory store |
//! | [`doc`] | Drawable, shape and style types |
//! | [`raster`] | Background raster: flatten and extract |
//! | [`hit`] | Hit-testing against drawables |
//! | [`input`] | Input event types |
//! | [`mode`] | Modes and placeable entities |
//! | [`prompt`] | Synchronous user-input callbacks |
//! | [`color`] | Stroke color history |
//! | [`config`] | Engine configuration (env / JSON) |
//! | [`consts`] | Shared numeric constants (zoom limits, gesture thresholds, etc.) |

pub mod camera;
pub mod color;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod grid;
pub mod hit;
pub mod history;
pub mod input;
pub mod mode;
pub mod pan_zoom;
pub mod prompt;
pub mod raster;
pub mod scene;
pub mod tools;
