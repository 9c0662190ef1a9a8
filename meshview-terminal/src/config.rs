//! Viewer configuration.
//!
//! Read from a TOML file with one table per concern. Every key is optional;
//! anything left out keeps its default.
//!
//! ```toml
//! [window]
//! width = 120
//! height = 40
//!
//! [smoothing]
//! samples = 4
//!
//! [mesh]
//! scale = 1.0
//!
//! [mesh_color]
//! red = 0.85
//! green = 0.55
//! blue = 0.25
//! alpha = 1.0
//!
//! [grid]
//! enabled = true
//!
//! [grid_color]
//! red = 0.3
//! green = 0.8
//! blue = 1.0
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::ShellError;

/// Upper bound on anti-aliasing samples per cell
pub const MAX_SAMPLES: u32 = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Requested viewport size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    /// Coverage samples per cell; 1 disables anti-aliasing
    pub samples: u32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { samples: 4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Uniform scale applied to the model before rotation
    pub scale: f32,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Draw the wireframe overlay on top of the solid mesh
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Colour with straight alpha, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            red: 0.85,
            green: 0.55,
            blue: 0.25,
            alpha: 1.0,
        }
    }
}

/// Opaque colour, components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for Rgb {
    fn default() -> Self {
        Self {
            red: 0.3,
            green: 0.8,
            blue: 1.0,
        }
    }
}

/// Everything the render shell can be told from outside
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub smoothing: SmoothingConfig,
    pub mesh: MeshConfig,
    pub mesh_color: Rgba,
    pub grid: GridConfig,
    pub grid_color: Rgb,
}

impl ViewerConfig {
    /// Load the configuration at `path`.
    ///
    /// A missing file is not an error: the defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ShellError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ShellError::Config {
                    path: path.to_path_buf(),
                    source: ConfigError::Invalid(e.to_string()),
                })
            }
        };

        let config = Self::from_toml(&text).map_err(|source| ShellError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.smoothing.samples == 0 || self.smoothing.samples > MAX_SAMPLES {
            return Err(ConfigError::Invalid(format!(
                "smoothing.samples must be between 1 and {MAX_SAMPLES}, got {}",
                self.smoothing.samples
            )));
        }
        if !(self.mesh.scale.is_finite() && self.mesh.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "mesh.scale must be positive, got {}",
                self.mesh.scale
            )));
        }

        let Rgba {
            red,
            green,
            blue,
            alpha,
        } = self.mesh_color;
        check_unit("mesh_color", &[red, green, blue, alpha])?;

        let Rgb { red, green, blue } = self.grid_color;
        check_unit("grid_color", &[red, green, blue])?;

        Ok(())
    }
}

fn check_unit(section: &str, components: &[f32]) -> Result<(), ConfigError> {
    if components.iter().all(|c| (0.0..=1.0).contains(c)) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{section} components must be within [0, 1], got {components:?}"
        )))
    }
}
