use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::{
    color::MinimapColor,
    renderer::{DamageRect, PixelBuffer},
    viewport::ViewportPolygon,
};
use crate::utils::{Rect, Size, Vec2};

pub mod canvas;
pub use canvas::Canvas;

// ----------------------------------------------
// TextureHandle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureHandle {
    #[default]
    Invalid,
    Index(u32), // Index into the TextureCache's textures.
}

impl TextureHandle {
    #[inline]
    pub const fn invalid() -> Self {
        TextureHandle::Invalid
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, TextureHandle::Invalid)
    }
}

// ----------------------------------------------
// TextureCache / MinimapPainter
// ----------------------------------------------

pub trait TextureCache {
    fn new_uninitialized_texture(&mut self, debug_name: &str, size: Size) -> TextureHandle;

    // `pixels` are tightly packed RGBA8 rows covering the whole texture.
    fn update_texture(&mut self, handle: TextureHandle, size: Size, pixels: &[u8]);

    // Sets `handle` to invalid.
    fn release_texture(&mut self, handle: &mut TextureHandle);
}

// Output surface the minimap is composited onto, in component-local pixels.
pub trait MinimapPainter {
    fn texture_cache_mut(&mut self) -> &mut dyn TextureCache;

    fn draw_texture(&mut self, handle: TextureHandle, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: MinimapColor);

    // Alpha-blended line. The end point itself is not drawn, so closed
    // polylines touch every corner once. With `clip`, only pixels inside
    // any of the rects are drawn.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: MinimapColor, clip: Option<&[Rect]>);

    fn draw_polygon(&mut self, points: &[Vec2], color: MinimapColor, clip: Option<&[Rect]>) {
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.draw_line(from, to, color, clip);
        }
    }
}

// ----------------------------------------------
// PresentBackend
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentBackend {
    // Upload the pixel buffer to a texture and blit it.
    #[default]
    TextureBlit,

    // Composite the repainted footprints straight onto a retained surface.
    RectFill,
}

impl PresentBackend {
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "texture"   => Some(Self::TextureBlit),
            "rect_fill" => Some(Self::RectFill),
            _ => None,
        }
    }
}

// ----------------------------------------------
// MinimapFrame
// ----------------------------------------------

// Everything a presenter needs for one frame.
pub struct MinimapFrame<'a> {
    pub pixels: &'a PixelBuffer,
    pub damage: &'a [DamageRect],
    pub outline: &'a ViewportPolygon,
    pub full_refresh: bool,
}

impl MinimapFrame<'_> {
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_and_size(Vec2::zero(), self.pixels.size().to_vec2())
    }
}

// ----------------------------------------------
// Presenter
// ----------------------------------------------

#[enum_dispatch]
pub trait Present {
    fn present(&mut self, frame: &MinimapFrame, painter: &mut dyn MinimapPainter);

    fn release(&mut self, _tex_cache: &mut dyn TextureCache) {
    }
}

#[enum_dispatch(Present)]
pub enum Presenter {
    TextureBlitPresenter,
    RectFillPresenter,
}

impl Presenter {
    pub fn new(backend: PresentBackend) -> Self {
        match backend {
            PresentBackend::TextureBlit => TextureBlitPresenter::default().into(),
            PresentBackend::RectFill    => RectFillPresenter.into(),
        }
    }
}

// ----------------------------------------------
// TextureBlitPresenter
// ----------------------------------------------

// The whole frame is redrawn from the texture every time. The texture is
// only re-uploaded when the buffer changed.
#[derive(Default)]
pub struct TextureBlitPresenter {
    handle: TextureHandle,
    size: Size,
}

impl TextureBlitPresenter {
    fn update_texture(&mut self, frame: &MinimapFrame, tex_cache: &mut dyn TextureCache) {
        let size = frame.pixels.size();
        let needs_upload = !self.handle.is_valid() || !frame.damage.is_empty() || frame.full_refresh;
        if !needs_upload || !size.is_valid() {
            return;
        }

        if self.handle.is_valid() && self.size != size {
            tex_cache.release_texture(&mut self.handle);
        }

        if !self.handle.is_valid() {
            self.handle = tex_cache.new_uninitialized_texture("minimap", size);
            self.size = size;
        }

        tex_cache.update_texture(self.handle, size, frame.pixels.as_bytes());
    }
}

impl Present for TextureBlitPresenter {
    fn present(&mut self, frame: &MinimapFrame, painter: &mut dyn MinimapPainter) {
        self.update_texture(frame, painter.texture_cache_mut());

        if self.handle.is_valid() {
            painter.draw_texture(self.handle, frame.bounds());
        }

        painter.draw_polygon(&frame.outline.points, MinimapColor::OUTLINE, None);
    }

    fn release(&mut self, tex_cache: &mut dyn TextureCache) {
        tex_cache.release_texture(&mut self.handle);
        self.size = Size::zero();
    }
}

// ----------------------------------------------
// RectFillPresenter
// ----------------------------------------------

// Replays only the footprints repainted since the last frame onto a surface that
// keeps its contents between frames. The outline is blended again only
// where those footprints erased it; the rest of it is still on the
// surface from an earlier frame. Moving the outline always comes with a
// full refresh, which redraws it everywhere.
pub struct RectFillPresenter;

impl Present for RectFillPresenter {
    fn present(&mut self, frame: &MinimapFrame, painter: &mut dyn MinimapPainter) {
        if frame.damage.is_empty() && !frame.full_refresh {
            return;
        }

        if frame.full_refresh {
            // Pixels outside the world never get a footprint.
            painter.fill_rect(frame.bounds(), MinimapColor::default());
        }

        for damage in frame.damage {
            painter.fill_rect(damage.rect.to_rect(), damage.color);
        }

        if frame.full_refresh {
            painter.draw_polygon(&frame.outline.points, MinimapColor::OUTLINE, None);
        } else {
            let clip: Vec<Rect> = frame.damage.iter().map(|damage| damage.rect.to_rect()).collect();
            painter.draw_polygon(&frame.outline.points, MinimapColor::OUTLINE, Some(&clip));
        }
    }
}
