use bytemuck::{Pod, Zeroable};

use super::mode::OverlayMode;
use crate::{
    log,
    utils::{self, coords::Cell},
    world::{CoverageFlags, PowerTier, TileGroup, WorldView},
};

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Pollution level mapped to a fully red overlay.
pub const POLLUTION_CEILING: f32 = 600.0;

// Job balance / starvation band limits.
pub const UNEMPLOYMENT_SEVERE: i32 = -20;
pub const UNEMPLOYMENT_MILD:   i32 = 10;
pub const STARVATION_SEVERE:   i32 = 20;
pub const STARVATION_MILD:     i32 = 100;

// ----------------------------------------------
// MinimapColor
// ----------------------------------------------

// RGBA8 pixel, laid out the way textures expect it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct MinimapColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl MinimapColor {
    pub const BLACK:     Self = Self::rgb(0,   0,   0);
    pub const WHITE:     Self = Self::rgb(255, 255, 255);
    pub const RED:       Self = Self::rgb(255, 0,   0);
    pub const DIM_RED:   Self = Self::rgb(127, 0,   0);
    pub const GREEN:     Self = Self::rgb(0,   255, 0);
    pub const DIM_GREEN: Self = Self::rgb(0,   127, 0);

    // Returned for mode values that have no color rules.
    pub const SENTINEL:  Self = Self::rgb(255, 0,   255);

    // Viewport outline drawn over the minimap.
    pub const OUTLINE:   Self = Self::new(255, 255, 255, 128);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    // Decodes a group color code: three 5-bit intensities gated by
    // the red (bit 5), green (bit 6) and blue (bit 7) presence bits.
    #[inline]
    pub const fn from_color_code(code: u8) -> Self {
        let intensity = 8 * (code & 31);
        Self::rgb(
            if code & 32  != 0 { intensity } else { 0 },
            if code & 64  != 0 { intensity } else { 0 },
            if code & 128 != 0 { intensity } else { 0 },
        )
    }

    #[inline]
    pub const fn brightness(self) -> u8 {
        ((self.r as u16 + self.g as u16 + self.b as u16) / 3) as u8
    }

    #[inline]
    #[must_use]
    pub const fn greyscale(self) -> Self {
        let b = self.brightness();
        Self::rgb(b, b, b)
    }

    // Scales each channel by `brightness / 255`.
    #[inline]
    #[must_use]
    pub const fn scaled_by(self, brightness: u8) -> Self {
        const fn scale(channel: u8, brightness: u8) -> u8 {
            ((channel as u16 * brightness as u16) / 255) as u8
        }
        Self::new(scale(self.r, brightness),
                  scale(self.g, brightness),
                  scale(self.b, brightness),
                  self.a)
    }

    // Source-over blend of `self` on top of `dst`. Result is opaque
    // if `dst` is.
    #[inline]
    #[must_use]
    pub fn blend_over(self, dst: Self) -> Self {
        let src_a = self.a as u32;
        let dst_a = 255 - src_a;
        let mix = |s: u8, d: u8| ((s as u32 * src_a + d as u32 * dst_a + 127) / 255) as u8;
        Self::new(mix(self.r, dst.r),
                  mix(self.g, dst.g),
                  mix(self.b, dst.b),
                  dst.a.max(self.a))
    }
}

impl Default for MinimapColor {
    #[inline]
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::fmt::Display for MinimapColor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

// ----------------------------------------------
// TileSample
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PowerLevel {
    #[default]
    Unpowered,
    Partial,
    Full,
}

// Simulation attributes of one tile, as read for coloring.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileAttributes {
    pub group: TileGroup,
    pub pollution: i32,
    pub coverage: CoverageFlags,
    pub coal_reserve: i32,
    pub job_balance: i32,
    pub last_fed: i32,
    pub power: PowerLevel,
}

impl TileAttributes {
    pub fn read<W: WorldView + ?Sized>(world: &W, cell: Cell) -> Self {
        let power = {
            if world.has_power(cell, PowerTier::Full) {
                PowerLevel::Full
            } else if world.has_power(cell, PowerTier::Partial) {
                PowerLevel::Partial
            } else {
                PowerLevel::Unpowered
            }
        };

        Self {
            group: world.group(cell),
            pollution: world.pollution(cell),
            coverage: world.coverage(cell),
            coal_reserve: world.coal_reserve(cell),
            job_balance: world.job_balance(cell),
            last_fed: world.last_fed(cell),
            power,
        }
    }
}

// A tile plus the origin tile of the structure it belongs to.
// Structures report their state through their origin, so for
// standalone tiles both are the same.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileSample {
    pub tile: TileAttributes,
    pub origin: TileAttributes,
}

impl TileSample {
    pub fn read<W: WorldView + ?Sized>(world: &W, cell: Cell) -> Self {
        let tile = TileAttributes::read(world, cell);
        let origin = match world.anchor(cell) {
            Some(anchor) => TileAttributes::read(world, anchor),
            None => tile,
        };
        Self { tile, origin }
    }

    #[inline]
    pub fn standalone(tile: TileAttributes) -> Self {
        Self { tile, origin: tile }
    }
}

// Process-wide simulation values some overlays depend on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimGlobals {
    pub coal_survey_done: bool,
    pub total_time: i32,
    pub coal_reserve_capacity: i32,
}

impl SimGlobals {
    pub fn read<W: WorldView + ?Sized>(world: &W) -> Self {
        Self {
            coal_survey_done: world.coal_survey_done(),
            total_time: world.total_time(),
            coal_reserve_capacity: world.coal_reserve_capacity(),
        }
    }
}

// ----------------------------------------------
// ColorModel
// ----------------------------------------------

pub struct ColorModel;

impl ColorModel {
    pub fn classify(mode: OverlayMode, sample: &TileSample, globals: &SimGlobals) -> MinimapColor {
        match mode {
            OverlayMode::Normal       => normal_color(sample),
            OverlayMode::Pollution    => pollution_color(sample),
            OverlayMode::Fire         => coverage_color(sample, CoverageFlags::Fire),
            OverlayMode::Sport        => coverage_color(sample, CoverageFlags::Sport),
            OverlayMode::Health       => coverage_color(sample, CoverageFlags::Health),
            OverlayMode::Unemployment => unemployment_color(sample),
            OverlayMode::Coal         => coal_color(sample, globals),
            OverlayMode::Starvation   => starvation_color(sample, globals),
            OverlayMode::Power        => power_color(sample),
        }
    }

    // Same as `classify()` for a raw mode index. Indices with no matching
    // mode are a logic error upstream; they paint the sentinel color so
    // the defect shows on screen.
    pub fn classify_raw(mode_index: u8, sample: &TileSample, globals: &SimGlobals) -> MinimapColor {
        match OverlayMode::try_from(mode_index) {
            Ok(mode) => Self::classify(mode, sample, globals),
            Err(_) => {
                log::error!(log::MINIMAP, "Undefined minimap display mode: {mode_index}");
                MinimapColor::SENTINEL
            }
        }
    }
}

#[inline]
fn normal_color(sample: &TileSample) -> MinimapColor {
    MinimapColor::from_color_code(sample.origin.group.color_code)
}

// Red rises and green falls with pollution, shaded by the terrain underneath.
fn pollution_color(sample: &TileSample) -> MinimapColor {
    let v = utils::normalize_value(sample.tile.pollution as f32, 0.0, POLLUTION_CEILING).clamp(0.0, 1.0);
    let color = MinimapColor::rgb((255.0 * v) as u8, (255.0 * (1.0 - v)) as u8, 0);
    color.scaled_by(normal_color(sample).brightness())
}

fn coverage_color(sample: &TileSample, service: CoverageFlags) -> MinimapColor {
    let normal = normal_color(sample);
    if sample.origin.coverage.contains(service) {
        MinimapColor::GREEN.scaled_by(normal.brightness())
    } else {
        normal.greyscale()
    }
}

fn unemployment_color(sample: &TileSample) -> MinimapColor {
    if !sample.origin.group.is_residence {
        return normal_color(sample).greyscale();
    }

    let job_balance = sample.origin.job_balance;
    if job_balance < UNEMPLOYMENT_SEVERE {
        MinimapColor::RED
    } else if job_balance < UNEMPLOYMENT_MILD {
        MinimapColor::DIM_RED
    } else {
        MinimapColor::GREEN
    }
}

fn coal_color(sample: &TileSample, globals: &SimGlobals) -> MinimapColor {
    if !globals.coal_survey_done {
        return MinimapColor::BLACK;
    }

    let reserve = sample.tile.coal_reserve;
    if reserve == 0 {
        normal_color(sample).greyscale()
    } else if reserve >= globals.coal_reserve_capacity / 2 {
        MinimapColor::GREEN
    } else {
        MinimapColor::RED
    }
}

fn starvation_color(sample: &TileSample, globals: &SimGlobals) -> MinimapColor {
    if !sample.origin.group.is_residence {
        return normal_color(sample).greyscale();
    }

    let time_since_fed = globals.total_time.saturating_sub(sample.origin.last_fed);
    if time_since_fed < STARVATION_SEVERE {
        MinimapColor::RED
    } else if time_since_fed < STARVATION_MILD {
        MinimapColor::DIM_RED
    } else {
        MinimapColor::GREEN
    }
}

fn power_color(sample: &TileSample) -> MinimapColor {
    let color = match sample.origin.power {
        PowerLevel::Full      => MinimapColor::GREEN,
        PowerLevel::Partial   => MinimapColor::DIM_GREEN,
        PowerLevel::Unpowered => MinimapColor::WHITE,
    };
    color.scaled_by(normal_color(sample).brightness())
}
