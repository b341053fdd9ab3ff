use crate::{
    utils::{Size, coords::Cell},
    world::TileType,
};

// ----------------------------------------------
// DirtyTileTracker
// ----------------------------------------------

// Last tile type painted for every visible cell. A cell whose current
// type matches its cached entry still has valid pixels in the buffer.
pub struct DirtyTileTracker {
    size: Size,
    types: Vec<TileType>,
}

impl DirtyTileTracker {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            types: vec![TileType::INVALID; size.area()],
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    // Forget everything painted so far. Every cell reads as dirty afterwards.
    #[inline]
    pub fn invalidate(&mut self) {
        self.types.fill(TileType::INVALID);
    }

    #[inline]
    pub fn cached_type(&self, cell: Cell) -> TileType {
        self.types[self.index(cell)]
    }

    #[inline]
    pub fn is_dirty(&self, cell: Cell, current: TileType, full_refresh: bool) -> bool {
        full_refresh || self.cached_type(cell) != current
    }

    #[inline]
    pub fn record(&mut self, cell: Cell, current: TileType) {
        let index = self.index(cell);
        self.types[index] = current;
    }

    pub fn memory_usage_estimate(&self) -> usize {
        self.types.capacity() * std::mem::size_of::<TileType>()
    }

    #[inline]
    fn index(&self, cell: Cell) -> usize {
        debug_assert!(cell.is_within(self.size), "Cell {cell} outside of tracked range {}!", self.size);
        cell.to_index(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_all_dirty() {
        let tracker = DirtyTileTracker::new(Size::new(4, 3));
        assert_eq!(tracker.cached_type(Cell::new(3, 2)), TileType::INVALID);
        assert!(tracker.is_dirty(Cell::new(0, 0), TileType(7), false));
    }

    #[test]
    fn test_record_and_invalidate() {
        let mut tracker = DirtyTileTracker::new(Size::new(4, 3));
        let cell = Cell::new(2, 1);

        tracker.record(cell, TileType(7));
        assert!(!tracker.is_dirty(cell, TileType(7), false));
        assert!(tracker.is_dirty(cell, TileType(8), false));
        assert!(tracker.is_dirty(cell, TileType(7), true));

        // Neighbors are unaffected.
        assert!(tracker.is_dirty(Cell::new(1, 1), TileType(7), false));

        tracker.invalidate();
        assert!(tracker.is_dirty(cell, TileType(7), false));
    }
}
