use crate::utils::{Vec2, coords::Cell};

// ----------------------------------------------
// MouseButton / MinimapEvent
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MinimapEvent {
    // `pos` is relative to the minimap component's top-left corner.
    // `inside` tells whether the press landed within the component bounds.
    MouseButtonDown { pos: Vec2, button: MouseButton, inside: bool },
    MouseButtonUp { pos: Vec2, button: MouseButton },
    MouseMotion { pos: Vec2 },
}

// ----------------------------------------------
// MinimapAction
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MinimapAction {
    // Advance the info panel's global style and focus it on `tile`.
    CycleInfoStyle { tile: Cell },

    // Center the main view on `tile`. The viewport outline will move.
    Recenter { tile: Cell },

    Ignored,
}

// ----------------------------------------------
// InputMapper
// ----------------------------------------------

#[derive(Copy, Clone, Debug)]
pub struct InputMapper {
    border: i32,
    tilesize: i32,
}

impl InputMapper {
    pub fn new(border: i32, tilesize: i32) -> Self {
        debug_assert!(tilesize > 0);
        Self { border, tilesize }
    }

    // Component-local position to world tile. No bounds checking.
    #[inline]
    pub fn click_to_tile(&self, pos: Vec2) -> Cell {
        let border = self.border as f32;
        let tilesize = self.tilesize as f32;
        let tile = ((pos - Vec2::new(border, border)) / tilesize).floor();
        Cell::new(tile.x as i32, tile.y as i32)
    }

    pub fn on_click(&self, pos: Vec2, button: MouseButton) -> MinimapAction {
        match button {
            MouseButton::Right => MinimapAction::CycleInfoStyle { tile: self.click_to_tile(pos) },
            MouseButton::Left | MouseButton::Middle => MinimapAction::Recenter { tile: self.click_to_tile(pos) },
            MouseButton::Other(_) => MinimapAction::Ignored,
        }
    }

    pub fn on_event(&self, event: &MinimapEvent) -> MinimapAction {
        match *event {
            MinimapEvent::MouseButtonDown { pos, button, inside: true } => self.on_click(pos, button),
            _ => MinimapAction::Ignored,
        }
    }
}
