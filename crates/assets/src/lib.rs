//! Asset inputs read once at startup: meshes, textures and shader sources.
//!
//! Everything here produces plain CPU-side data. Uploading to the GPU is the
//! render backend's job; nothing in this crate is touched after startup.

mod obj;
mod shader;
mod texture;

use std::path::{Path, PathBuf};

pub use obj::{MeshData, MeshVertex};
pub use shader::{ShaderPair, ShaderSource, ShaderStage};
pub use texture::TextureData;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{0} contains no triangles")]
    EmptyMesh(PathBuf),
    #[error("invalid WGSL in {path}: {message}")]
    ShaderParse { path: PathBuf, message: String },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

fn read_to_string(path: &Path) -> Result<String, AssetError> {
    std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A mesh paired with the texture it is drawn with.
#[derive(Debug, Clone)]
pub struct ModelData {
    pub mesh: MeshData,
    pub texture: TextureData,
}

impl ModelData {
    /// Load a mesh and its texture.
    ///
    /// A mesh failure is an error. A texture failure is logged and replaced
    /// by a 1×1 white texture so the model still renders.
    pub fn load(mesh_path: impl AsRef<Path>, texture_path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let mesh = MeshData::load_obj(mesh_path)?;
        let texture_path = texture_path.as_ref();
        let texture = TextureData::load(texture_path).unwrap_or_else(|e| {
            tracing::warn!("texture failed to load, using white: {e}");
            TextureData::white()
        });
        Ok(Self { mesh, texture })
    }
}

pub fn crate_info() -> &'static str {
    "orbitview-assets v0.1.0"
}
