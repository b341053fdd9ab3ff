use std::path::Path;
use serde::{Serialize, Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    log,
    minimap::{mode::SpeedTable, present::PresentBackend},
    utils::Size,
};

// ----------------------------------------------
// ConfigError
// ----------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required attribute '{0}'.")]
    MissingAttribute(&'static str),

    #[error("Couldn't parse {attribute} attribute ({value}).")]
    InvalidValue { attribute: &'static str, value: String },

    #[error("Width or Height invalid ({width}x{height}).")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("Tile size must be a positive number of pixels (got {0}).")]
    InvalidTileSize(i32),

    #[error("Border must not be negative (got {0}).")]
    InvalidBorder(i32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub trait Configs {
    fn post_load(&mut self) {
    }

    // Saves current configs to a JSON file.
    fn save_file(&self, config_json_path: &Path) -> Result<(), ConfigError>
        where Self: Sized + Serialize
    {
        debug_assert!(!config_json_path.as_os_str().is_empty());

        if let Some(parent_dir) = config_json_path.parent() {
            // Ignore errors since this fails if any element of the path already exists.
            let _ = std::fs::create_dir_all(parent_dir);
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_json_path, json)?;
        Ok(())
    }

    fn try_load_file<T>(config_json_path: &Path) -> Result<T, ConfigError>
        where T: Configs + Sized + DeserializeOwned
    {
        let json = std::fs::read_to_string(config_json_path)?;
        let mut configs: T = serde_json::from_str(&json)?;
        configs.post_load();
        Ok(configs)
    }

    // Either succeeds loading the config file or returns a default config.
    fn load_file<T>(config_json_path: &Path) -> T
        where T: Configs + Sized + Default + DeserializeOwned
    {
        match Self::try_load_file::<T>(config_json_path) {
            Ok(configs) => configs,
            Err(err) => {
                log::error!(log::CONFIG, "Failed to load config file from path {config_json_path:?}: {err}");
                T::default()
            }
        }
    }
}

// ----------------------------------------------
// MinimapConfig
// ----------------------------------------------

pub const DEFAULT_TILE_SIZE: i32 = 2;

// Validated minimap settings. Immutable once constructed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MinimapConfig {
    width: f32,
    height: f32,
    border: i32,
    tilesize: i32,
    backend: PresentBackend,
    speeds: SpeedTable,
}

impl MinimapConfig {
    pub fn new(width: f32, height: f32, border: i32, tilesize: i32) -> Result<Self, ConfigError> {
        Self::with_options(width, height, border, tilesize, PresentBackend::default(), SpeedTable::default())
    }

    pub fn with_options(width: f32,
                        height: f32,
                        border: i32,
                        tilesize: i32,
                        backend: PresentBackend,
                        speeds: SpeedTable) -> Result<Self, ConfigError> {
        // Written so that NaN fails too.
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        if tilesize <= 0 {
            return Err(ConfigError::InvalidTileSize(tilesize));
        }
        if border < 0 {
            return Err(ConfigError::InvalidBorder(border));
        }
        Ok(Self { width, height, border, tilesize, backend, speeds })
    }

    // Builds the config from the component's layout attributes (name/value
    // pairs as they appear in the GUI description). Unknown attributes are
    // skipped so newer layouts keep loading.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ConfigError>
        where I: IntoIterator<Item = (&'a str, &'a str)>
    {
        let mut width = None;
        let mut height = None;
        let mut border = 0;
        let mut tilesize = DEFAULT_TILE_SIZE;
        let mut backend = PresentBackend::default();

        for (name, value) in attributes {
            match name {
                "width"    => width    = Some(parse_attribute::<f32>("width", value)?),
                "height"   => height   = Some(parse_attribute::<f32>("height", value)?),
                "border"   => border   = parse_attribute::<i32>("border", value)?,
                "tilesize" => tilesize = parse_attribute::<i32>("tilesize", value)?,
                "backend"  => {
                    backend = PresentBackend::from_attribute(value.trim())
                        .ok_or_else(|| ConfigError::InvalidValue { attribute: "backend", value: value.into() })?;
                }
                unknown => {
                    log::warn!(log::CONFIG, "Unknown attribute '{unknown}' skipped.");
                }
            }
        }

        let width  = width.ok_or(ConfigError::MissingAttribute("width"))?;
        let height = height.ok_or(ConfigError::MissingAttribute("height"))?;

        Self::with_options(width, height, border, tilesize, backend, SpeedTable::default())
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn border(&self) -> i32 {
        self.border
    }

    #[inline]
    pub fn tilesize(&self) -> i32 {
        self.tilesize
    }

    #[inline]
    pub fn backend(&self) -> PresentBackend {
        self.backend
    }

    #[inline]
    pub fn speeds(&self) -> SpeedTable {
        self.speeds
    }

    // Pixel buffer dimensions. Fractional sizes are truncated.
    #[inline]
    pub fn pixel_size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }

    // Maximum number of tiles the minimap can show along each axis.
    // A partially visible last row/column still counts.
    #[inline]
    pub fn tile_capacity(&self) -> Size {
        let tilesize = self.tilesize as f32;
        Size::new((self.width / tilesize).ceil() as i32, (self.height / tilesize).ceil() as i32)
    }
}

fn parse_attribute<T: std::str::FromStr>(attribute: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { attribute, value: value.into() })
}

// ----------------------------------------------
// MinimapConfigs
// ----------------------------------------------

// On-disk form of the minimap settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from MinimapConfigs::default().
pub struct MinimapConfigs {
    pub width: f32,
    pub height: f32,
    pub border: i32,
    pub tilesize: i32,
    pub backend: PresentBackend,
    pub speeds: SpeedTable,
    pub log_level: log::Level,
    pub log_source_location: bool,
    pub log_tty_colors: bool,
}

impl Default for MinimapConfigs {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 200.0,
            border: 0,
            tilesize: DEFAULT_TILE_SIZE,
            backend: PresentBackend::default(),
            speeds: SpeedTable::default(),
            log_level: log::Level::Info,
            log_source_location: false,
            log_tty_colors: true,
        }
    }
}

impl Configs for MinimapConfigs {
    fn post_load(&mut self) {
        log::set_level(self.log_level);
        log::enable_source_location(self.log_source_location);
        log::enable_tty_colors(self.log_tty_colors);
    }
}

impl MinimapConfigs {
    pub fn to_config(&self) -> Result<MinimapConfig, ConfigError> {
        MinimapConfig::with_options(self.width,
                                    self.height,
                                    self.border,
                                    self.tilesize,
                                    self.backend,
                                    self.speeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_parse() {
        let config = MinimapConfig::from_attributes([
            ("width", "200"),
            ("height", " 150.5 "),
            ("border", "3"),
            ("tilesize", "4"),
        ]).unwrap();

        assert_eq!(config.width(), 200.0);
        assert_eq!(config.height(), 150.5);
        assert_eq!(config.border(), 3);
        assert_eq!(config.tilesize(), 4);
        assert_eq!(config.pixel_size(), Size::new(200, 150));
        assert_eq!(config.tile_capacity(), Size::new(50, 38));
    }

    #[test]
    fn test_attribute_defaults_and_unknown() {
        let config = MinimapConfig::from_attributes([
            ("width", "100"),
            ("height", "80"),
            ("style", "fancy"),
        ]).unwrap();

        assert_eq!(config.border(), 0);
        assert_eq!(config.tilesize(), DEFAULT_TILE_SIZE);
        assert_eq!(config.backend(), PresentBackend::TextureBlit);
    }

    #[test]
    fn test_attribute_errors() {
        let err = MinimapConfig::from_attributes([("width", "abc"), ("height", "10")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { attribute: "width", .. }));
        assert_eq!(err.to_string(), "Couldn't parse width attribute (abc).");

        let err = MinimapConfig::from_attributes([("height", "10")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute("width")));

        let err = MinimapConfig::from_attributes([("width", "0"), ("height", "10")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimensions { .. }));

        let err = MinimapConfig::from_attributes([("width", "10"), ("height", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDimensions { .. }));

        let err = MinimapConfig::from_attributes([("width", "10"), ("height", "10"), ("tilesize", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTileSize(0)));

        let err = MinimapConfig::from_attributes([("width", "10"), ("height", "10"), ("border", "2.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { attribute: "border", .. }));

        let err = MinimapConfig::from_attributes([("width", "10"), ("height", "10"), ("backend", "vulkan")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { attribute: "backend", .. }));
    }

    #[test]
    fn test_configs_json_round_trip() {
        let dir = std::env::temp_dir().join(format!("minimap_configs_{}", std::process::id()));
        let path = dir.join("minimap.json");

        let mut configs = MinimapConfigs::default();
        configs.width = 320.0;
        configs.tilesize = 3;
        configs.backend = PresentBackend::RectFill;
        configs.log_level = log::Level::Verbose;

        configs.save_file(&path).unwrap();
        let loaded = MinimapConfigs::try_load_file::<MinimapConfigs>(&path).unwrap();
        assert_eq!(loaded, configs);

        let config = loaded.to_config().unwrap();
        assert_eq!(config.pixel_size(), Size::new(320, 200));
        assert_eq!(config.backend(), PresentBackend::RectFill);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_configs_partial_json_uses_defaults() {
        let configs: MinimapConfigs = serde_json::from_str(r#"{ "tilesize": 5 }"#).unwrap();
        assert_eq!(configs.tilesize, 5);
        assert_eq!(configs.width, MinimapConfigs::default().width);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("minimap_configs_does_not_exist.json");
        let configs = MinimapConfigs::load_file::<MinimapConfigs>(&path);
        assert_eq!(configs, MinimapConfigs::default());
    }
}
