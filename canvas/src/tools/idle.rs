//! Modes with no tool gestures of their own (`none`, and `move`, whose drag
//! pan is handled by the engine's pan/zoom controller).

use super::{ToolCtx, ToolHandler};
use crate::input::PointerEvent;
use crate::mode::Mode;

pub struct IdleTool {
    mode: Mode,
}

impl IdleTool {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl ToolHandler for IdleTool {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn pointer_down(&mut self, _ctx: &mut ToolCtx<'_>, _ev: &PointerEvent) {}
}
