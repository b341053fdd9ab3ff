use super::{
    cache::DirtyTileTracker,
    color::{ColorModel, MinimapColor, SimGlobals, TileSample},
    mode::OverlayMode,
};
use crate::{
    engine::config::MinimapConfig,
    log,
    utils::{Rect, Size, Vec2, coords::{Cell, CellRange}},
    world::WorldView,
};

// ----------------------------------------------
// PixelRect
// ----------------------------------------------

// Integer rectangle in minimap pixel space. `width`/`height` may be
// zero or negative for an empty rect.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    // Footprint of an `extent` x `extent` block of tiles with its top-left at `cell`.
    #[inline]
    pub fn tile_footprint(cell: Cell, extent: i32, tilesize: i32) -> Self {
        Self::new(cell.x * tilesize, cell.y * tilesize, extent * tilesize, extent * tilesize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn area(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width as usize) * (self.height as usize)
    }

    // Intersection with the `[0, size)` pixel grid.
    #[must_use]
    pub fn clipped(&self, size: Size) -> Self {
        let min_x = self.x.max(0);
        let min_y = self.y.max(0);
        let max_x = (self.x + self.width).min(size.width);
        let max_y = (self.y + self.height).min(size.height);
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    #[inline]
    pub fn to_rect(self) -> Rect {
        Rect::from_pos_and_size(Vec2::new(self.x as f32, self.y as f32),
                                Vec2::new(self.width as f32, self.height as f32))
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(P:[{},{}], S:[{},{}])", self.x, self.y, self.width, self.height)
    }
}

// A rectangle filled since the buffer was last presented, replayed by
// presenters that composite rectangles instead of uploading the whole buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DamageRect {
    pub rect: PixelRect,
    pub color: MinimapColor,
}

// ----------------------------------------------
// PixelBuffer
// ----------------------------------------------

// RGBA8 minimap image, allocated once for the configured extent.
pub struct PixelBuffer {
    size: Size,
    pixels: Vec<MinimapColor>,
}

impl PixelBuffer {
    pub fn new(size: Size, fill_color: MinimapColor) -> Self {
        Self {
            size,
            pixels: vec![fill_color; size.area()],
        }
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn pixels(&self) -> &[MinimapColor] {
        &self.pixels
    }

    // Raw RGBA bytes, ready for a texture upload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> MinimapColor {
        self.pixels[Cell::new(x, y).to_index(self.size)]
    }

    #[inline]
    pub fn fill(&mut self, color: MinimapColor) {
        self.pixels.fill(color);
    }

    // Fills `rect` clipped to the buffer. Returns the number of pixels written.
    pub fn fill_rect(&mut self, rect: PixelRect, color: MinimapColor) -> usize {
        let rect = rect.clipped(self.size);
        if rect.is_empty() {
            return 0;
        }

        let stride = self.size.width as usize;
        let row_len = rect.width as usize;

        for y in rect.y..(rect.y + rect.height) {
            let row_start = (y as usize) * stride + (rect.x as usize);
            self.pixels[row_start..row_start + row_len].fill(color);
        }

        rect.area()
    }

    pub fn memory_usage_estimate(&self) -> usize {
        self.pixels.capacity() * std::mem::size_of::<MinimapColor>()
    }
}

// ----------------------------------------------
// RepaintStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RepaintStats {
    pub tiles_visited: usize,
    pub tiles_repainted: usize,
    pub pixels_written: usize,
    pub full_refresh: bool,
}

impl RepaintStats {
    #[inline]
    pub fn has_changes(&self) -> bool {
        self.pixels_written != 0
    }
}

impl std::fmt::Display for RepaintStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "visited: {}, repainted: {}, pixels: {}, full refresh: {}",
               self.tiles_visited, self.tiles_repainted, self.pixels_written, self.full_refresh)
    }
}

// ----------------------------------------------
// MinimapRenderer
// ----------------------------------------------

// Owns the pixel buffer and the dirty tile tracker. Each repaint pass only
// touches tiles whose type changed since they were last painted, unless a
// full refresh is pending. Damage from several passes accumulates until
// `mark_presented`, so a buffer repainted without being drawn still reaches
// the screen on the next presentation.
pub struct MinimapRenderer {
    tilesize: i32,
    buffer: PixelBuffer,
    tracker: DirtyTileTracker,
    damage: Vec<DamageRect>,
    world_size: Size,
    full_refresh: bool,
    unpresented_full_refresh: bool,
}

impl MinimapRenderer {
    pub fn new(config: &MinimapConfig) -> Self {
        Self {
            tilesize: config.tilesize(),
            buffer: PixelBuffer::new(config.pixel_size(), MinimapColor::default()),
            tracker: DirtyTileTracker::new(config.tile_capacity()),
            damage: Vec::new(),
            world_size: Size::zero(),
            full_refresh: true,
            unpresented_full_refresh: false,
        }
    }

    #[inline]
    pub fn tilesize(&self) -> i32 {
        self.tilesize
    }

    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    // Rectangles filled since the last presentation, in paint order.
    #[inline]
    pub fn damage(&self) -> &[DamageRect] {
        &self.damage
    }

    #[inline]
    pub fn request_full_refresh(&mut self) {
        self.full_refresh = true;
    }

    #[inline]
    pub fn is_full_refresh_pending(&self) -> bool {
        self.full_refresh
    }

    // A full refresh was painted but not presented yet.
    #[inline]
    pub fn is_full_present_pending(&self) -> bool {
        self.unpresented_full_refresh
    }

    #[inline]
    pub fn is_present_pending(&self) -> bool {
        self.unpresented_full_refresh || !self.damage.is_empty()
    }

    // Called by the owner once a presenter has consumed `damage()`.
    pub fn mark_presented(&mut self) {
        self.damage.clear();
        self.unpresented_full_refresh = false;
    }

    // Drops all cached tile state and blanks the buffer, so pixels outside
    // a smaller world don't keep stale colors. The next pass repaints everything.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.buffer.fill(MinimapColor::default());
        self.damage.clear();
        self.full_refresh = true;
    }

    // Tiles drawn for `world_size`: the world clipped to what the buffer can show.
    #[inline]
    pub fn visible_range(&self, world_size: Size) -> CellRange {
        CellRange::from_size(world_size.min(self.tracker.size()))
    }

    pub fn repaint<W>(&mut self, world: &W, mode: OverlayMode) -> RepaintStats
        where W: WorldView + ?Sized
    {
        self.repaint_with(world, mode, false)
    }

    // Repaint pass. A pending full refresh is always honored, so
    // `force_full_refresh` can only add work.
    pub fn repaint_with<W>(&mut self, world: &W, mode: OverlayMode, force_full_refresh: bool) -> RepaintStats
        where W: WorldView + ?Sized
    {
        let world_size = world.size();
        if world_size != self.world_size {
            log::verbose!(log::MINIMAP, "World size changed from {} to {}. Invalidating minimap.",
                          self.world_size, world_size);
            self.world_size = world_size;
            self.reset();
        }

        let full_refresh = force_full_refresh || self.full_refresh;
        let globals = SimGlobals::read(world);

        let mut stats = RepaintStats { full_refresh, ..Default::default() };
        if full_refresh {
            // Every visible footprint is about to be damaged again.
            self.damage.clear();
            self.unpresented_full_refresh = true;
        }

        for cell in &self.visible_range(world_size) {
            stats.tiles_visited += 1;

            let tile_type = world.tile_type(cell);
            if !self.tracker.is_dirty(cell, tile_type, full_refresh) {
                continue;
            }

            let extent = world.group(cell).size.max(1);
            let footprint = PixelRect::tile_footprint(cell, extent, self.tilesize);

            let sample = TileSample::read(world, cell);
            let color = ColorModel::classify(mode, &sample, &globals);

            let written = self.buffer.fill_rect(footprint, color);
            if written != 0 {
                self.damage.push(DamageRect { rect: footprint.clipped(self.buffer.size()), color });
            }

            self.tracker.record(cell, tile_type);
            stats.tiles_repainted += 1;
            stats.pixels_written += written;
        }

        if full_refresh {
            log::verbose!(log::MINIMAP, "Full minimap repaint ({mode}): {stats}");
        }

        self.full_refresh = false;
        stats
    }

    pub fn memory_usage_estimate(&self) -> usize {
        self.buffer.memory_usage_estimate()
            + self.tracker.memory_usage_estimate()
            + self.damage.capacity() * std::mem::size_of::<DamageRect>()
    }
}
