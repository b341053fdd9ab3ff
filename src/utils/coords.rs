use std::iter::FusedIterator;

use super::{Size, Vec2};

// ----------------------------------------------
// Cell
// ----------------------------------------------

// X,Y position in the world grid of tiles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }

    #[inline]
    pub fn is_within(&self, size: Size) -> bool {
        self.is_valid() && self.x < size.width && self.y < size.height
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    // Row-major index into a grid of `size`. Caller guarantees `is_within(size)`.
    #[inline]
    pub fn to_index(self, size: Size) -> usize {
        debug_assert!(self.is_within(size), "Cell {self} out of bounds for grid {size}!");
        (self.x + (self.y * size.width)) as usize
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

// ----------------------------------------------
// CellRange
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    // Inclusive range, e.g.: [start..=end]
    pub start: Cell,
    pub end: Cell,
}

impl CellRange {
    #[inline]
    pub const fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    // All cells of a grid with the given dimensions.
    // Yields nothing if the size is empty.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self {
            start: Cell::zero(),
            end: Cell::new(size.width - 1, size.height - 1),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start.is_valid() && self.end.is_valid() &&
        self.start.x <= self.end.x && self.start.y <= self.end.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.end.x - self.start.x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.end.y - self.start.y + 1
    }

    #[inline]
    pub fn iter(&self) -> CellRangeIter {
        CellRangeIter::new(*self)
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}; {},{}]",
               self.start.x,
               self.start.y,
               self.end.x,
               self.end.y)
    }
}

// ----------------------------------------------
// CellRangeIter
// ----------------------------------------------

// Row-major iteration: x varies fastest.
#[derive(Copy, Clone)]
pub struct CellRangeIter {
    range:  CellRange,
    curr_y: i32,
    curr_x: i32,
    done:   bool,
}

impl CellRangeIter {
    #[inline]
    pub fn new(range: CellRange) -> Self {
        Self {
            range,
            curr_y: range.start.y,
            curr_x: range.start.x,
            done: !range.is_valid(),
        }
    }
}

impl Iterator for CellRangeIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = Cell::new(self.curr_x, self.curr_y);

        if self.curr_x < self.range.end.x {
            self.curr_x += 1;
        } else if self.curr_y < self.range.end.y {
            self.curr_y += 1;
            self.curr_x = self.range.start.x;
        } else {
            self.done = true;
        }

        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for CellRangeIter {
    #[inline]
    fn len(&self) -> usize {
        if self.done {
            return 0;
        }
        let width = self.range.width() as usize;
        let total = width * self.range.height() as usize;
        let yielded = ((self.curr_y - self.range.start.y) as usize * width)
                    + (self.curr_x - self.range.start.x) as usize;
        total - yielded
    }
}

// Guarantees next() always stays None after exhaustion.
impl FusedIterator for CellRangeIter {}

// Support for-each style iteration.
impl IntoIterator for &CellRange {
    type Item = Cell;
    type IntoIter = CellRangeIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_range_iter_row_major() {
        let range = CellRange::new(Cell::new(1, 1), Cell::new(2, 2));
        let cells: Vec<Cell> = range.iter().collect();
        assert_eq!(cells, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(1, 2), Cell::new(2, 2)]);
    }

    #[test]
    fn test_cell_range_iter_len() {
        let range = CellRange::from_size(Size::new(3, 4));
        let mut iter = range.iter();
        assert_eq!(iter.len(), 12);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 10);
        assert_eq!(iter.count(), 10);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        assert_eq!(CellRange::from_size(Size::new(0, 5)).iter().count(), 0);
        assert_eq!(CellRange::from_size(Size::zero()).iter().len(), 0);
    }
}
