use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::{AssetError, read_to_string};

/// Pipeline stage a shader source is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// WGSL source text read from disk, with the uniform names it declares.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub stage: ShaderStage,
    pub source: String,
    uniforms: BTreeSet<String>,
}

impl ShaderSource {
    pub fn load(path: impl AsRef<Path>, stage: ShaderStage) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let source = read_to_string(path)?;
        Self::from_source(path, stage, source)
    }

    /// Parse `source` as WGSL and record its uniform declarations. Source that
    /// does not parse is an error.
    pub fn from_source(
        path: impl Into<PathBuf>,
        stage: ShaderStage,
        source: String,
    ) -> Result<Self, AssetError> {
        let path = path.into();
        let module = naga::front::wgsl::parse_str(&source).map_err(|e| AssetError::ShaderParse {
            path: path.clone(),
            message: e.emit_to_string(&source),
        })?;
        let uniforms = declared_uniforms(&module);
        Ok(Self {
            path,
            stage,
            source,
            uniforms,
        })
    }

    /// Names of module-scope `var<uniform>` declarations.
    pub fn uniforms(&self) -> &BTreeSet<String> {
        &self.uniforms
    }
}

/// Vertex and fragment sources that are compiled together into one program.
#[derive(Debug, Clone)]
pub struct ShaderPair {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderPair {
    pub fn load(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Result<Self, AssetError> {
        let pair = Self {
            vertex: ShaderSource::load(vertex, ShaderStage::Vertex)?,
            fragment: ShaderSource::load(fragment, ShaderStage::Fragment)?,
        };
        tracing::info!(
            vertex = %pair.vertex.path.display(),
            fragment = %pair.fragment.path.display(),
            uniforms = ?pair.uniforms(),
            "loaded shader pair"
        );
        Ok(pair)
    }

    /// Uniforms declared by either stage.
    pub fn uniforms(&self) -> BTreeSet<String> {
        self.vertex
            .uniforms
            .union(&self.fragment.uniforms)
            .cloned()
            .collect()
    }
}

/// Names of the module's global variables in the uniform address space.
fn declared_uniforms(module: &naga::Module) -> BTreeSet<String> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| var.space == naga::AddressSpace::Uniform)
        .filter_map(|(_, var)| var.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX: &str = r#"
@group(0) @binding(0) var<uniform> view_proj: mat4x4<f32>;
@group(0) @binding(1)
var<uniform>   mvp : mat4x4<f32>;
// var<uniform> commented_out: mat4x4<f32>;
/* @group(0) @binding(2)
   var<uniform> block_commented: mat4x4<f32>; */
"#;

    #[test]
    fn finds_uniform_declarations() {
        let src = ShaderSource::from_source("vs.wgsl", ShaderStage::Vertex, VERTEX.to_string()).unwrap();
        let names: Vec<&str> = src.uniforms().iter().map(String::as_str).collect();
        assert_eq!(names, vec!["mvp", "view_proj"]);
    }

    #[test]
    fn pair_merges_uniforms() {
        let pair = ShaderPair {
            vertex: ShaderSource::from_source("vs.wgsl", ShaderStage::Vertex, VERTEX.to_string()).unwrap(),
            fragment: ShaderSource::from_source(
                "fs.wgsl",
                ShaderStage::Fragment,
                "@group(1) @binding(2) var<uniform> tint: vec4<f32>;".to_string(),
            )
            .unwrap(),
        };
        let uniforms = pair.uniforms();
        assert!(uniforms.contains("tint"));
        assert!(uniforms.contains("mvp"));
        assert_eq!(uniforms.len(), 3);
    }

    #[test]
    fn load_pair_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("scene.vert.wgsl");
        let fs = dir.path().join("scene.frag.wgsl");
        std::fs::write(&vs, VERTEX).unwrap();
        std::fs::write(&fs, "@fragment fn fs_main() {}").unwrap();

        let pair = ShaderPair::load(&vs, &fs).unwrap();
        assert_eq!(pair.vertex.stage, ShaderStage::Vertex);
        assert_eq!(pair.fragment.stage, ShaderStage::Fragment);
        assert!(pair.fragment.uniforms().is_empty());
    }

    #[test]
    fn block_commented_uniform_is_not_declared() {
        let source = r#"
/* @group(0) @binding(1) var<uniform> mvp: mat4x4<f32>; */
@group(0) @binding(0) var<uniform> view_proj: mat4x4<f32>;
"#;
        let src =
            ShaderSource::from_source("vs.wgsl", ShaderStage::Vertex, source.to_string()).unwrap();
        assert!(!src.uniforms().contains("mvp"));
        assert!(src.uniforms().contains("view_proj"));
    }

    #[test]
    fn storage_and_textures_are_not_uniforms() {
        let source = r#"
@group(0) @binding(0) var<storage, read> data: array<f32>;
@group(0) @binding(1) var tex: texture_2d<f32>;
var<private> scratch: f32;
"#;
        let src =
            ShaderSource::from_source("fs.wgsl", ShaderStage::Fragment, source.to_string()).unwrap();
        assert!(src.uniforms().is_empty());
    }

    #[test]
    fn invalid_wgsl_is_parse_error() {
        let err = ShaderSource::from_source(
            "broken.wgsl",
            ShaderStage::Vertex,
            "var<uniform> mvp mat4x4<f32>".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, AssetError::ShaderParse { .. }));
        assert!(err.to_string().contains("broken.wgsl"));
    }

    #[test]
    fn bundled_scene_shaders_declare_both_matrices() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources/shaders");
        let pair = ShaderPair::load(root.join("scene.vert.wgsl"), root.join("scene.frag.wgsl")).unwrap();
        let uniforms = pair.uniforms();
        assert!(uniforms.contains("view_proj"));
        assert!(uniforms.contains("mvp"));
        assert_eq!(uniforms.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ShaderPair::load("/nonexistent/a.wgsl", "/nonexistent/b.wgsl").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
