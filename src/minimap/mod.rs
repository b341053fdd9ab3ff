use crate::{
    engine::config::{ConfigError, MinimapConfig},
    log,
    utils::Vec2,
    world::WorldView,
};

pub mod cache;
pub mod color;
pub mod input;
pub mod links;
pub mod mode;
pub mod present;
pub mod renderer;
pub mod viewport;


use input::{InputMapper, MinimapAction, MinimapEvent};
use links::MinimapHost;
use mode::{InfoPanelStyle, ModeController, OverlayMode, SimSpeed};
use present::{MinimapFrame, MinimapPainter, Present, Presenter, TextureCache};
use renderer::{MinimapRenderer, PixelBuffer, RepaintStats};
use viewport::{ViewportOverlay, ViewportPolygon};

// ----------------------------------------------
// Minimap
// ----------------------------------------------

// The minimap UI component. Collaborators (main view, info panel, speed
// control, dialogs) are passed in by the caller for every operation that
// needs them.
pub struct Minimap {
    config: MinimapConfig,
    modes: ModeController,
    renderer: MinimapRenderer,
    viewport: ViewportOverlay,
    input: InputMapper,
    presenter: Presenter,
}

impl Minimap {
    pub fn new(config: MinimapConfig) -> Self {
        Self {
            modes: ModeController::new(config.speeds()),
            renderer: MinimapRenderer::new(&config),
            viewport: ViewportOverlay::new(config.tilesize()),
            input: InputMapper::new(config.border(), config.tilesize()),
            presenter: Presenter::new(config.backend()),
            config,
        }
    }

    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ConfigError>
        where I: IntoIterator<Item = (&'a str, &'a str)>
    {
        Ok(Self::new(MinimapConfig::from_attributes(attributes)?))
    }

    #[inline]
    pub fn config(&self) -> &MinimapConfig {
        &self.config
    }

    #[inline]
    pub fn overlay(&self) -> OverlayMode {
        self.modes.overlay()
    }

    #[inline]
    pub fn speed(&self) -> SimSpeed {
        self.modes.speed()
    }

    #[inline]
    pub fn info_style(&self) -> InfoPanelStyle {
        self.modes.info_style()
    }

    #[inline]
    pub fn viewport_polygon(&self) -> &ViewportPolygon {
        self.viewport.polygon()
    }

    #[inline]
    pub fn pixels(&self) -> &PixelBuffer {
        self.renderer.buffer()
    }

    #[inline]
    pub fn is_full_refresh_pending(&self) -> bool {
        self.renderer.is_full_refresh_pending()
    }

    // Repainted pixels not yet handed to a presenter.
    #[inline]
    pub fn is_present_pending(&self) -> bool {
        self.renderer.is_present_pending()
    }

    // ----------------------
    // Mode & speed selection:
    // ----------------------

    pub fn select_overlay<W>(&mut self, mode: OverlayMode, world: &W, host: &mut impl MinimapHost)
        where W: WorldView + ?Sized
    {
        let transition = self.modes.select_overlay(mode,
                                                   world.coal_survey_done(),
                                                   host.is_blocking_dialog_open());

        if transition.from != transition.to {
            log::info!(log::MINIMAP, "Overlay mode changed: {} -> {}", transition.from, transition.to);
        }

        host.set_map_mode(mode);
        self.renderer.request_full_refresh();

        if transition.request_coal_survey_prompt {
            log::info!(log::MINIMAP, "Coal survey not done yet. Requesting survey prompt.");
            host.request_coal_survey_prompt();
        }
    }

    // Returns false if `button_name` is not an overlay button.
    pub fn select_overlay_by_button<W>(&mut self, button_name: &str, world: &W, host: &mut impl MinimapHost) -> bool
        where W: WorldView + ?Sized
    {
        match OverlayMode::from_button_name(button_name) {
            Some(mode) => {
                self.select_overlay(mode, world, host);
                true
            }
            None => {
                log::error!(log::MINIMAP, "Unknown overlay button '{button_name}'.");
                false
            }
        }
    }

    pub fn select_speed(&mut self, speed: SimSpeed, host: &mut impl MinimapHost) {
        let ticks_per_year = self.modes.select_speed(speed);
        log::info!(log::MINIMAP, "Simulation speed: {speed} ({ticks_per_year} ticks per year)");
        host.set_simulation_speed(ticks_per_year);
    }

    // Returns false if `button_name` is not a speed button.
    pub fn select_speed_by_button(&mut self, button_name: &str, host: &mut impl MinimapHost) -> bool {
        match SimSpeed::from_button_name(button_name) {
            Some(speed) => {
                self.select_speed(speed, host);
                true
            }
            None => {
                log::error!(log::MINIMAP, "Unknown speed button '{button_name}'.");
                false
            }
        }
    }

    #[inline]
    pub fn zoom_in(&self, host: &mut impl MinimapHost) {
        host.zoom_in();
    }

    #[inline]
    pub fn zoom_out(&self, host: &mut impl MinimapHost) {
        host.zoom_out();
    }

    // ----------------------
    // Viewport & input:
    // ----------------------

    // Corners of the main view's visible area in world tiles:
    // upper-left, upper-right, lower-right, lower-left.
    pub fn set_game_view_corners(&mut self, upper_left: Vec2, upper_right: Vec2, lower_right: Vec2, lower_left: Vec2) {
        self.viewport.set_game_view_corners([upper_left, upper_right, lower_right, lower_left]);
        self.renderer.request_full_refresh();
    }

    pub fn handle_event(&mut self, event: &MinimapEvent, host: &mut impl MinimapHost) -> MinimapAction {
        let action = self.input.on_event(event);

        match action {
            MinimapAction::CycleInfoStyle { tile } => {
                host.set_view(tile, self.modes.info_style());
                self.modes.cycle_info_style();
            }
            MinimapAction::Recenter { tile } => {
                host.show(tile);
                self.renderer.request_full_refresh();
            }
            MinimapAction::Ignored => {}
        }

        action
    }

    // ----------------------
    // Rendering:
    // ----------------------

    // Brings the pixel buffer up to date with `world` without presenting it.
    // What changed is kept until the next `draw`.
    pub fn repaint<W>(&mut self, world: &W) -> RepaintStats
        where W: WorldView + ?Sized
    {
        self.renderer.repaint(world, self.modes.overlay())
    }

    // Repaints and presents the minimap with the configured backend.
    pub fn draw<W>(&mut self, world: &W, painter: &mut dyn MinimapPainter) -> RepaintStats
        where W: WorldView + ?Sized
    {
        let stats = self.repaint(world);

        let frame = MinimapFrame {
            pixels: self.renderer.buffer(),
            damage: self.renderer.damage(),
            outline: self.viewport.polygon(),
            full_refresh: self.renderer.is_full_present_pending(),
        };

        self.presenter.present(&frame, painter);
        self.renderer.mark_presented();
        stats
    }

    // Forgets all painted tiles. Used when a new world is loaded.
    pub fn reset(&mut self) {
        self.renderer.reset();
    }

    // Frees presenter resources. The texture is recreated on the next draw.
    pub fn release_texture(&mut self, tex_cache: &mut dyn TextureCache) {
        self.presenter.release(tex_cache);
    }

    #[inline]
    pub fn memory_usage_estimate(&self) -> usize {
        self.renderer.memory_usage_estimate()
    }
}
