use serde::{Deserialize, Serialize};

use crate::{
    bitflags_with_display,
    utils::{Size, coords::Cell},
};

pub mod grid;
pub use grid::{TileData, TileGrid};

// ----------------------------------------------
// Constants
// ----------------------------------------------

// Amount of coal a fully stocked tile holds.
pub const COAL_RESERVE_SIZE: i32 = 1000;

// ----------------------------------------------
// TileType
// ----------------------------------------------

// Simulation type code of a tile. The minimap only compares these
// for equality; their meaning belongs to the simulation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileType(pub u16);

impl TileType {
    // Non-origin cell covered by a multi-tile structure.
    pub const USED: Self = Self(1);

    // Never produced by a world; used by caches to mean "nothing seen yet".
    pub const INVALID: Self = Self(u16::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ----------------------------------------------
// TileGroup
// ----------------------------------------------

// Category a tile type belongs to (residential, industry, water, etc).
//
// `color_code` packs the minimap color: the low 5 bits are an intensity
// and bits 5, 6, 7 enable the red, green and blue channels respectively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGroup {
    pub id: u16,
    pub size: i32,
    pub color_code: u8,
    pub is_residence: bool,
}

impl TileGroup {
    // Group reported by cells covered by (but not anchoring) a structure.
    pub const USED: Self = Self { id: 1, size: 1, color_code: 0, is_residence: false };

    #[inline]
    pub const fn new(id: u16, size: i32, color_code: u8) -> Self {
        Self { id, size, color_code, is_residence: false }
    }

    #[inline]
    pub const fn residence(id: u16, size: i32, color_code: u8) -> Self {
        Self { id, size, color_code, is_residence: true }
    }
}

// ----------------------------------------------
// CoverageFlags
// ----------------------------------------------

bitflags_with_display! {
    // Services reaching a tile from nearby buildings.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CoverageFlags: u8 {
        const Fire   = 1 << 0;
        const Sport  = 1 << 1; // Also keeps pests away.
        const Health = 1 << 2;
    }
}

// ----------------------------------------------
// PowerTier
// ----------------------------------------------

// Demand level a power query is made against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerTier {
    Full,
    Partial,
}

// ----------------------------------------------
// WorldView
// ----------------------------------------------

// Read-only access to the simulation's world grid.
//
// The minimap never mutates the world. It is only queried from within a
// draw call, at a point where the simulation is not stepping, and every
// queried cell is inside `size()`.
pub trait WorldView {
    fn size(&self) -> Size;

    fn tile_type(&self, cell: Cell) -> TileType;
    fn group(&self, cell: Cell) -> TileGroup;

    // Origin cell of the structure covering `cell`, when `cell` is
    // part of a multi-tile structure but not its origin.
    fn anchor(&self, cell: Cell) -> Option<Cell>;

    fn pollution(&self, cell: Cell) -> i32;
    fn coverage(&self, cell: Cell) -> CoverageFlags;
    fn coal_reserve(&self, cell: Cell) -> i32;

    // Residential job balance; negative means unemployment.
    fn job_balance(&self, cell: Cell) -> i32;

    // Simulation time at which a residence was last fed.
    fn last_fed(&self, cell: Cell) -> i32;

    fn has_power(&self, cell: Cell, tier: PowerTier) -> bool;

    // Process-wide simulation state.
    fn coal_survey_done(&self) -> bool;
    fn total_time(&self) -> i32;

    fn coal_reserve_capacity(&self) -> i32 {
        COAL_RESERVE_SIZE
    }
}
