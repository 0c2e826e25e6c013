use std::path::{Path, PathBuf};

use glam::Vec3;
use orbitview_render::DrawStrategy;
use orbitview_scene::{InstanceParams, InstanceTable};
use serde::{Deserialize, Serialize};

use crate::clock::Pacing;

/// Errors from loading a [`DemoConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Demo configuration. Every field has a default, so a YAML file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub instances: InstanceConfig,
    pub object: ObjectConfig,
    pub assets: AssetPaths,
    pub pacing: Pacing,
    /// Linear RGBA the framebuffer is cleared to each frame.
    pub clear_color: [f32; 4],
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            instances: InstanceConfig::default(),
            object: ObjectConfig::default(),
            assets: AssetPaths::default(),
            pacing: Pacing::Measured,
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "OrbitView".to_string(),
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub radius: f32,
    /// Radians per second in automatic mode; also scales manual input.
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub count: usize,
    /// Fixed seed for a reproducible field; a time-based seed when absent.
    pub seed: Option<u64>,
    pub strategy: DrawStrategy,
    pub params: InstanceParams,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            seed: None,
            strategy: DrawStrategy::Instanced,
            params: InstanceParams::default(),
        }
    }
}

impl InstanceConfig {
    /// The configured seed, or a wall-clock seed that is logged so the run
    /// can be reproduced.
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = InstanceTable::time_seed();
                tracing::info!(seed, "no instance seed configured, using time-based seed");
                seed
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// World units per second.
    pub move_speed: f32,
    /// Uniform mesh-space scale correction.
    pub scale: f32,
    pub rotation_axis: Vec3,
    pub rotation_degrees: f32,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            scale: 0.001,
            rotation_axis: Vec3::Y,
            rotation_degrees: 90.0,
        }
    }
}

/// Startup asset inputs, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub instance_mesh: PathBuf,
    pub instance_texture: PathBuf,
    pub object_mesh: PathBuf,
    pub object_texture: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            instance_mesh: "resources/models/crate.obj".into(),
            instance_texture: "resources/textures/checker.png".into(),
            object_mesh: "resources/models/probe.obj".into(),
            object_texture: "resources/textures/steel.png".into(),
            vertex_shader: "resources/shaders/scene.vert.wgsl".into(),
            fragment_shader: "resources/shaders/scene.frag.wgsl".into(),
        }
    }
}

impl DemoConfig {
    /// Read a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes to unit, not an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Check value ranges serde cannot express. Instance scale must be a
    /// positive, non-inverted range and the offset extent non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let params = &self.instances.params;
        if !params.offset_extent.is_finite() || params.offset_extent < 0.0 {
            return Err(format!(
                "instances.params.offset_extent must be finite and >= 0, got {}",
                params.offset_extent
            ));
        }
        if params.scale_min.is_nan() || params.scale_min <= 0.0 {
            return Err(format!(
                "instances.params.scale_min must be > 0, got {}",
                params.scale_min
            ));
        }
        if !params.scale_max.is_finite() || params.scale_min > params.scale_max {
            return Err(format!(
                "instances.params.scale_min ({}) must not exceed scale_max ({})",
                params.scale_min, params.scale_max
            ));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
