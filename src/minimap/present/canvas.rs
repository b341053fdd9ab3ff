use std::{fs, fmt::Debug, path::Path};
use slab::Slab;

use super::{MinimapPainter, TextureCache, TextureHandle};
use crate::{
    log,
    minimap::color::MinimapColor,
    utils::{Rect, Size, Vec2, coords::Cell},
};

// ----------------------------------------------
// CanvasTexture
// ----------------------------------------------

struct CanvasTexture {
    debug_name: String,
    size: Size,
    pixels: Vec<MinimapColor>,
}

// ----------------------------------------------
// Canvas
// ----------------------------------------------

// In-memory RGBA surface. Used for headless rendering, debugging and tests.
// Contents are retained between frames.
pub struct Canvas {
    size: Size,
    pixels: Vec<MinimapColor>,
    textures: Slab<CanvasTexture>,
    texture_uploads: usize,
}

impl Canvas {
    pub fn new(size: Size, clear_color: MinimapColor) -> Self {
        debug_assert!(size.is_valid());
        Self {
            size,
            pixels: vec![clear_color; size.area()],
            textures: Slab::new(),
            texture_uploads: 0,
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

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> MinimapColor {
        self.pixels[Cell::new(x, y).to_index(self.size)]
    }

    #[inline]
    pub fn clear(&mut self, color: MinimapColor) {
        self.pixels.fill(color);
    }

    #[inline]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // Number of `update_texture()` calls so far.
    #[inline]
    pub fn texture_uploads(&self) -> usize {
        self.texture_uploads
    }

    pub fn texture_name(&self, handle: TextureHandle) -> Option<&str> {
        self.texture(handle).map(|texture| texture.debug_name.as_str())
    }

    pub fn save_png<P>(&self, path: P) -> bool
        where P: AsRef<Path> + Debug
    {
        let bytes: &[u8] = bytemuck::cast_slice(&self.pixels);
        let image = match image::RgbaImage::from_raw(self.size.width as u32,
                                                     self.size.height as u32,
                                                     bytes.to_vec()) {
            Some(image) => image,
            None => {
                log::error!(log::MINIMAP, "Canvas pixels don't match its size {}.", self.size);
                return false;
            }
        };

        let mut file = match fs::File::create(&path) {
            Ok(file) => file,
            Err(err) => {
                log::error!(log::MINIMAP, "Failed to create file {path:?}: {err:?}");
                return false;
            }
        };

        if let Err(err) = image.write_to(&mut file, image::ImageFormat::Png) {
            log::error!(log::MINIMAP, "Failed to write image file {path:?}: {err:?}");
            return false;
        }

        true
    }

    #[inline]
    fn texture(&self, handle: TextureHandle) -> Option<&CanvasTexture> {
        match handle {
            TextureHandle::Index(index) => self.textures.get(index as usize),
            TextureHandle::Invalid => None,
        }
    }

    #[inline]
    fn blend_pixel(&mut self, x: i32, y: i32, color: MinimapColor) {
        if x < 0 || y < 0 || x >= self.size.width || y >= self.size.height {
            return;
        }
        let index = Cell::new(x, y).to_index(self.size);
        self.pixels[index] = if color.a == 255 { color } else { color.blend_over(self.pixels[index]) };
    }

    // Pixel span covered by a float rect, clipped to the canvas.
    fn pixel_span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let min_x = (rect.min.x.round() as i32).max(0);
        let min_y = (rect.min.y.round() as i32).max(0);
        let max_x = (rect.max.x.round() as i32).min(self.size.width);
        let max_y = (rect.max.y.round() as i32).min(self.size.height);
        (min_x, min_y, max_x, max_y)
    }
}

impl TextureCache for Canvas {
    fn new_uninitialized_texture(&mut self, debug_name: &str, size: Size) -> TextureHandle {
        debug_assert!(size.is_valid());
        let index = self.textures.insert(CanvasTexture {
            debug_name: debug_name.into(),
            size,
            pixels: vec![MinimapColor::default(); size.area()],
        });
        TextureHandle::Index(index as u32)
    }

    fn update_texture(&mut self, handle: TextureHandle, size: Size, pixels: &[u8]) {
        let texture = match handle {
            TextureHandle::Index(index) => self.textures.get_mut(index as usize),
            TextureHandle::Invalid => None,
        };

        let Some(texture) = texture else {
            log::error!(log::MINIMAP, "Invalid texture handle: {handle:?}");
            return;
        };

        debug_assert!(size == texture.size, "Texture size mismatch: {size} vs {}", texture.size);

        match bytemuck::try_cast_slice::<u8, MinimapColor>(pixels) {
            Ok(colors) if colors.len() == texture.pixels.len() => {
                texture.pixels.copy_from_slice(colors);
                self.texture_uploads += 1;
            }
            _ => {
                log::error!(log::MINIMAP, "Texture '{}' update with {} bytes doesn't match its size {}.",
                            texture.debug_name, pixels.len(), texture.size);
            }
        }
    }

    fn release_texture(&mut self, handle: &mut TextureHandle) {
        if let TextureHandle::Index(index) = handle {
            self.textures.try_remove(*index as usize);
        }
        *handle = TextureHandle::invalid();
    }
}

impl MinimapPainter for Canvas {
    fn texture_cache_mut(&mut self) -> &mut dyn TextureCache {
        self
    }

    // Nearest-neighbor stretch of the texture over `rect`.
    fn draw_texture(&mut self, handle: TextureHandle, rect: Rect) {
        let Some(texture) = self.texture(handle) else {
            log::error!(log::MINIMAP, "Invalid texture handle: {handle:?}");
            return;
        };

        if !rect.is_valid() {
            return;
        }

        let (min_x, min_y, max_x, max_y) = self.pixel_span(rect);
        let tex_size = texture.size;
        let scale_x = tex_size.width as f32 / rect.width();
        let scale_y = tex_size.height as f32 / rect.height();

        let mut texels = Vec::with_capacity(((max_x - min_x).max(0) * (max_y - min_y).max(0)) as usize);
        for y in min_y..max_y {
            let v = (((y as f32 + 0.5 - rect.min.y) * scale_y) as i32).clamp(0, tex_size.height - 1);
            for x in min_x..max_x {
                let u = (((x as f32 + 0.5 - rect.min.x) * scale_x) as i32).clamp(0, tex_size.width - 1);
                texels.push(texture.pixels[Cell::new(u, v).to_index(tex_size)]);
            }
        }

        let mut texels = texels.into_iter();
        for y in min_y..max_y {
            for x in min_x..max_x {
                if let Some(texel) = texels.next() {
                    self.blend_pixel(x, y, texel);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: MinimapColor) {
        let (min_x, min_y, max_x, max_y) = self.pixel_span(rect);
        for y in min_y..max_y {
            for x in min_x..max_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    // Bresenham over the integer pixel grid.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: MinimapColor, clip: Option<&[Rect]>) {
        let (mut x, mut y) = (from.x.floor() as i32, from.y.floor() as i32);
        let (end_x, end_y) = (to.x.floor() as i32, to.y.floor() as i32);

        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        let step_x = if x < end_x { 1 } else { -1 };
        let step_y = if y < end_y { 1 } else { -1 };
        let mut err = dx + dy;

        while x != end_x || y != end_y {
            let visible = match clip {
                Some(rects) => {
                    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    rects.iter().any(|rect| rect.contains_point(center))
                }
                None => true,
            };

            if visible {
                self.blend_pixel(x, y, color);
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }
}
