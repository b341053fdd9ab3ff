use super::{CoverageFlags, PowerTier, TileGroup, TileType, WorldView};
use crate::utils::{Size, coords::{Cell, CellRange}};

// ----------------------------------------------
// TileData
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileData {
    pub tile_type: TileType,
    pub group: TileGroup,
    pub anchor: Option<Cell>,
    pub pollution: i32,
    pub coverage: CoverageFlags,
    pub coal_reserve: i32,
    pub job_balance: i32,
    pub last_fed: i32,
    pub full_power: bool,
    pub partial_power: bool,
}

impl TileData {
    pub const fn new(tile_type: TileType, group: TileGroup) -> Self {
        Self {
            tile_type,
            group,
            anchor: None,
            pollution: 0,
            coverage: CoverageFlags::empty(),
            coal_reserve: 0,
            job_balance: 0,
            last_fed: 0,
            full_power: false,
            partial_power: false,
        }
    }
}

// ----------------------------------------------
// TileGrid
// ----------------------------------------------

// Plain in-memory world grid. Stands in for the simulation in headless
// tools and tests.
pub struct TileGrid {
    size: Size,
    tiles: Vec<TileData>,
    coal_survey_done: bool,
    total_time: i32,
}

impl TileGrid {
    pub fn new(size: Size, fill_with: TileData) -> Self {
        debug_assert!(size.is_valid(), "Invalid world size {size}!");
        Self {
            size,
            tiles: vec![fill_with; size.area()],
            coal_survey_done: false,
            total_time: 0,
        }
    }

    #[inline]
    pub fn tile(&self, cell: Cell) -> &TileData {
        &self.tiles[cell.to_index(self.size)]
    }

    #[inline]
    pub fn tile_mut(&mut self, cell: Cell) -> &mut TileData {
        &mut self.tiles[cell.to_index(self.size)]
    }

    #[inline]
    pub fn set_coal_survey_done(&mut self, done: bool) {
        self.coal_survey_done = done;
    }

    #[inline]
    pub fn set_total_time(&mut self, time: i32) {
        self.total_time = time;
    }

    // Places a `group.size` x `group.size` structure with its origin at
    // `origin`. Every other covered cell becomes a USED tile pointing back
    // at the origin. Cells past the grid edge are skipped.
    pub fn place_structure(&mut self, origin: Cell, tile_type: TileType, group: TileGroup) {
        let end = Cell::new(origin.x + group.size - 1, origin.y + group.size - 1);

        for cell in &CellRange::new(origin, end) {
            if !cell.is_within(self.size) {
                continue;
            }

            let tile = self.tile_mut(cell);
            if cell == origin {
                tile.tile_type = tile_type;
                tile.group = group;
                tile.anchor = None;
            } else {
                tile.tile_type = TileType::USED;
                tile.group = TileGroup::USED;
                tile.anchor = Some(origin);
            }
        }
    }
}

impl WorldView for TileGrid {
    #[inline]
    fn size(&self) -> Size {
        self.size
    }

    #[inline]
    fn tile_type(&self, cell: Cell) -> TileType {
        self.tile(cell).tile_type
    }

    #[inline]
    fn group(&self, cell: Cell) -> TileGroup {
        self.tile(cell).group
    }

    #[inline]
    fn anchor(&self, cell: Cell) -> Option<Cell> {
        self.tile(cell).anchor
    }

    #[inline]
    fn pollution(&self, cell: Cell) -> i32 {
        self.tile(cell).pollution
    }

    #[inline]
    fn coverage(&self, cell: Cell) -> CoverageFlags {
        self.tile(cell).coverage
    }

    #[inline]
    fn coal_reserve(&self, cell: Cell) -> i32 {
        self.tile(cell).coal_reserve
    }

    #[inline]
    fn job_balance(&self, cell: Cell) -> i32 {
        self.tile(cell).job_balance
    }

    #[inline]
    fn last_fed(&self, cell: Cell) -> i32 {
        self.tile(cell).last_fed
    }

    #[inline]
    fn has_power(&self, cell: Cell, tier: PowerTier) -> bool {
        let tile = self.tile(cell);
        match tier {
            PowerTier::Full    => tile.full_power,
            PowerTier::Partial => tile.partial_power,
        }
    }

    #[inline]
    fn coal_survey_done(&self) -> bool {
        self.coal_survey_done
    }

    #[inline]
    fn total_time(&self) -> i32 {
        self.total_time
    }
}
