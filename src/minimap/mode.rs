use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumProperty, IntoEnumIterator};

// ----------------------------------------------
// OverlayMode
// ----------------------------------------------

// Colorization scheme applied to the whole minimap.
// Discriminants double as the index of the matching UI button.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[derive(Display, EnumCount, EnumIter, EnumProperty, IntoPrimitive, TryFromPrimitive, Serialize, Deserialize)]
pub enum OverlayMode {
    #[strum(props(Button = "MapViewNormal"))]
    Normal,

    #[strum(props(Button = "MapViewUB40"))]
    Unemployment,

    #[strum(props(Button = "MapViewPollution"))]
    Pollution,

    #[strum(props(Button = "MapViewFood"))]
    Starvation,

    #[strum(props(Button = "MapViewPower"))]
    Power,

    #[strum(props(Button = "MapViewFire"))]
    Fire,

    #[strum(props(Button = "MapViewSport"))]
    Sport,

    #[strum(props(Button = "MapViewHealth"))]
    Health,

    #[strum(props(Button = "MapViewCoal"))]
    Coal,
}

// Implemented by hand: a `#[default]` variant would turn into the
// catch-all of the TryFromPrimitive derive.
impl Default for OverlayMode {
    #[inline]
    fn default() -> Self {
        Self::Normal
    }
}

impl OverlayMode {
    #[inline]
    pub fn button_name(self) -> &'static str {
        self.get_str("Button").unwrap_or_default()
    }

    pub fn from_button_name(name: &str) -> Option<Self> {
        Self::iter().find(|mode| mode.button_name() == name)
    }
}

// ----------------------------------------------
// SimSpeed / SpeedTable
// ----------------------------------------------

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[derive(Display, EnumCount, EnumIter, EnumProperty, IntoPrimitive, TryFromPrimitive)]
pub enum SimSpeed {
    #[strum(props(Button = "SpeedPauseButton"))]
    Paused,

    #[strum(props(Button = "SpeedSlowButton"))]
    Slow,

    #[strum(props(Button = "SpeedNormalButton"))]
    Normal,

    #[strum(props(Button = "SpeedFastButton"))]
    Fast,
}

// The speed buttons start out with "slow" checked.
impl Default for SimSpeed {
    #[inline]
    fn default() -> Self {
        Self::Slow
    }
}

impl SimSpeed {
    #[inline]
    pub fn button_name(self) -> &'static str {
        self.get_str("Button").unwrap_or_default()
    }

    pub fn from_button_name(name: &str) -> Option<Self> {
        Self::iter().find(|speed| speed.button_name() == name)
    }
}

// Simulation ticks per simulated year for each running speed.
// Lower is faster; a paused simulation gets 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub slow: u32,
    pub normal: u32,
    pub fast: u32,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self { slow: 180, normal: 120, fast: 60 }
    }
}

impl SpeedTable {
    #[inline]
    pub fn ticks_per_year(&self, speed: SimSpeed) -> u32 {
        match speed {
            SimSpeed::Paused => 0,
            SimSpeed::Slow   => self.slow,
            SimSpeed::Normal => self.normal,
            SimSpeed::Fast   => self.fast,
        }
    }
}

// ----------------------------------------------
// InfoPanelStyle
// ----------------------------------------------

// Global statistics page shown by the info panel. Cycled by
// right-clicking the minimap, independently of the overlay mode.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumCount, EnumIter, TryFromPrimitive)]
pub enum InfoPanelStyle {
    Finance,
    OtherCosts,
    Housing,
}

impl Default for InfoPanelStyle {
    #[inline]
    fn default() -> Self {
        Self::Finance
    }
}

impl InfoPanelStyle {
    #[must_use]
    pub fn next(self) -> Self {
        let next_index = (self as u8 + 1) % (Self::COUNT as u8);
        Self::try_from(next_index).unwrap_or_default()
    }
}

// ----------------------------------------------
// ModeController
// ----------------------------------------------

// Outcome of an overlay selection, for the caller to act upon.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OverlayTransition {
    pub from: OverlayMode,
    pub to: OverlayMode,
    pub request_coal_survey_prompt: bool,
}

// Display state driven by the minimap's selection buttons. Every overlay
// selection (even re-selecting the active mode) requires a full repaint.
#[derive(Clone, Debug)]
pub struct ModeController {
    overlay: OverlayMode,
    speed: SimSpeed,
    info_style: InfoPanelStyle,
    speeds: SpeedTable,
}

impl ModeController {
    pub fn new(speeds: SpeedTable) -> Self {
        Self {
            overlay: OverlayMode::default(),
            speed: SimSpeed::default(),
            info_style: InfoPanelStyle::default(),
            speeds,
        }
    }

    #[inline]
    pub fn overlay(&self) -> OverlayMode {
        self.overlay
    }

    #[inline]
    pub fn speed(&self) -> SimSpeed {
        self.speed
    }

    #[inline]
    pub fn info_style(&self) -> InfoPanelStyle {
        self.info_style
    }

    pub fn select_overlay(&mut self,
                          mode: OverlayMode,
                          coal_survey_done: bool,
                          blocking_prompt_open: bool) -> OverlayTransition {
        let transition = OverlayTransition {
            from: self.overlay,
            to: mode,
            request_coal_survey_prompt: mode == OverlayMode::Coal && !coal_survey_done && !blocking_prompt_open,
        };
        self.overlay = mode;
        transition
    }

    // Returns the tick duration to hand to the simulation.
    pub fn select_speed(&mut self, speed: SimSpeed) -> u32 {
        self.speed = speed;
        self.speeds.ticks_per_year(speed)
    }

    pub fn cycle_info_style(&mut self) -> InfoPanelStyle {
        self.info_style = self.info_style.next();
        self.info_style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_button_names() {
        assert_eq!(OverlayMode::COUNT, 9);
        assert_eq!(OverlayMode::from_button_name("MapViewFood"), Some(OverlayMode::Starvation));
        assert_eq!(OverlayMode::from_button_name("MapViewSport"), Some(OverlayMode::Sport));
        assert_eq!(OverlayMode::from_button_name("MapViewNope"), None);
        for mode in OverlayMode::iter() {
            assert_eq!(OverlayMode::from_button_name(mode.button_name()), Some(mode));
        }
    }

    #[test]
    fn test_overlay_raw_index() {
        assert_eq!(OverlayMode::try_from(0u8).unwrap(), OverlayMode::Normal);
        assert_eq!(OverlayMode::try_from(8u8).unwrap(), OverlayMode::Coal);
        assert!(OverlayMode::try_from(9u8).is_err());
        assert_eq!(u8::from(OverlayMode::Pollution), 2);
    }

    #[test]
    fn test_initial_state() {
        let modes = ModeController::new(SpeedTable::default());
        assert_eq!(modes.overlay(), OverlayMode::Normal);
        assert_eq!(modes.speed(), SimSpeed::Slow);
        assert_eq!(modes.info_style(), InfoPanelStyle::Finance);
    }

    #[test]
    fn test_coal_survey_prompt_request() {
        let mut modes = ModeController::new(SpeedTable::default());

        let transition = modes.select_overlay(OverlayMode::Coal, false, false);
        assert!(transition.request_coal_survey_prompt);
        assert_eq!(transition.from, OverlayMode::Normal);
        assert_eq!(modes.overlay(), OverlayMode::Coal);

        // Survey already done, or another prompt is in the way:
        assert!(!modes.select_overlay(OverlayMode::Coal, true, false).request_coal_survey_prompt);
        assert!(!modes.select_overlay(OverlayMode::Coal, false, true).request_coal_survey_prompt);

        // Only the coal overlay asks.
        assert!(!modes.select_overlay(OverlayMode::Power, false, false).request_coal_survey_prompt);
    }

    #[test]
    fn test_speed_selection() {
        let speeds = SpeedTable { slow: 30, normal: 20, fast: 10 };
        let mut modes = ModeController::new(speeds);
        assert_eq!(modes.select_speed(SimSpeed::Paused), 0);
        assert_eq!(modes.select_speed(SimSpeed::Fast), 10);
        assert_eq!(modes.speed(), SimSpeed::Fast);
        assert_eq!(SimSpeed::from_button_name("SpeedNormalButton"), Some(SimSpeed::Normal));
    }

    #[test]
    fn test_info_style_cycles_and_wraps() {
        let mut modes = ModeController::new(SpeedTable::default());
        assert_eq!(modes.cycle_info_style(), InfoPanelStyle::OtherCosts);
        assert_eq!(modes.cycle_info_style(), InfoPanelStyle::Housing);
        assert_eq!(modes.cycle_info_style(), InfoPanelStyle::Finance);
    }
}
