use crate::utils::Vec2;

// ----------------------------------------------
// ViewportPolygon
// ----------------------------------------------

// Outline of the main view's visible area, in minimap pixels.
// Points are in the order they were given (upper-left, upper-right,
// lower-right, lower-left), forming a closed quad.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ViewportPolygon {
    pub points: [Vec2; 4],
}

impl ViewportPolygon {
    // World tile units to minimap pixel units.
    pub fn compute(world_corners: &[Vec2; 4], tilesize: i32) -> Self {
        let scale = tilesize as f32;
        Self {
            points: world_corners.map(|corner| corner * scale),
        }
    }
}

// ----------------------------------------------
// ViewportOverlay
// ----------------------------------------------

pub struct ViewportOverlay {
    tilesize: i32,
    world_corners: [Vec2; 4],
    polygon: ViewportPolygon,
}

impl ViewportOverlay {
    pub fn new(tilesize: i32) -> Self {
        debug_assert!(tilesize > 0);
        Self {
            tilesize,
            world_corners: [Vec2::zero(); 4],
            polygon: ViewportPolygon::default(),
        }
    }

    // Called whenever the main view scrolls or zooms. The caller is
    // responsible for scheduling a full refresh.
    pub fn set_game_view_corners(&mut self, world_corners: [Vec2; 4]) -> &ViewportPolygon {
        self.world_corners = world_corners;
        self.polygon = ViewportPolygon::compute(&world_corners, self.tilesize);
        &self.polygon
    }

    #[inline]
    pub fn world_corners(&self) -> &[Vec2; 4] {
        &self.world_corners
    }

    #[inline]
    pub fn polygon(&self) -> &ViewportPolygon {
        &self.polygon
    }
}
