use super::mode::{InfoPanelStyle, OverlayMode};
use crate::utils::coords::Cell;

// ----------------------------------------------
// Collaborator links
// ----------------------------------------------

// The minimap never looks its collaborators up; they are handed to it
// by whoever dispatches the UI event or draw call.

pub trait GameViewLink {
    fn set_map_mode(&mut self, mode: OverlayMode);
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn show(&mut self, tile: Cell);
}

pub trait InfoPanelLink {
    fn set_view(&mut self, tile: Cell, style: InfoPanelStyle);
}

pub trait SimSpeedLink {
    // 0 pauses the simulation.
    fn set_simulation_speed(&mut self, ticks_per_year: u32);
}

pub trait DialogLink {
    fn is_blocking_dialog_open(&self) -> bool;

    // Fire and forget. The minimap does not wait for the answer.
    fn request_coal_survey_prompt(&mut self);
}

pub trait MinimapHost: GameViewLink + InfoPanelLink + SimSpeedLink + DialogLink {}

impl<T> MinimapHost for T
    where T: GameViewLink + InfoPanelLink + SimSpeedLink + DialogLink
{}
