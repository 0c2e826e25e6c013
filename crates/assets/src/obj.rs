use std::path::Path;

use crate::{AssetError, read_to_string};

/// Interleaved vertex: position then texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

impl MeshData {
    /// Load a Wavefront OBJ file.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let source = read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let mesh = Self::parse_obj(&name, &source).map_err(|source| AssetError::Obj {
            path: path.to_path_buf(),
            source,
        })?;
        if mesh.indices.is_empty() {
            return Err(AssetError::EmptyMesh(path.to_path_buf()));
        }
        tracing::info!(
            path = %path.display(),
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "loaded mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text with `tobj`, triangulated and single-indexed. Every
    /// object in the file is merged into one mesh. Texture V is flipped so
    /// row 0 is the top of the image. Materials are not loaded.
    pub fn parse_obj(name: &str, source: &str) -> Result<Self, tobj::LoadError> {
        let (models, _materials) = tobj::load_obj_buf(
            &mut source.as_bytes(),
            &load_options(),
            |_: &Path| Err(tobj::LoadError::OpenFileFailed),
        )?;

        let mut mesh = MeshData {
            name: name.to_string(),
            ..Default::default()
        };
        for model in &models {
            let base = mesh.vertices.len() as u32;
            let m = &model.mesh;
            let count = m.positions.len() / 3;
            let has_uv = m.texcoords.len() / 2 == count;
            mesh.vertices.extend((0..count).map(|i| MeshVertex {
                position: [m.positions[3 * i], m.positions[3 * i + 1], m.positions[3 * i + 2]],
                uv: if has_uv {
                    [m.texcoords[2 * i], 1.0 - m.texcoords[2 * i + 1]]
                } else {
                    [0.0, 0.0]
                },
            }));
            mesh.indices.extend(m.indices.iter().map(|i| base + i));
        }
        Ok(mesh)
    }

    /// Axis-aligned bounds of the vertex positions, or `None` when empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(v.position[axis]);
                hi[axis] = hi[axis].max(v.position[axis]);
            }
            (lo, hi)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const QUAD: &str = "\
# a unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn parses_and_triangulates_quad() {
        let mesh = MeshData::parse_obj("quad", QUAD).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        // V is flipped to a top-left origin.
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(mesh.vertices[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn shares_vertices_between_faces() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\nf 1 2 3\nf 2 4 3\n";
        let mesh = MeshData::parse_obj("two", src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = MeshData::parse_obj("rel", src).unwrap();
        let positions: Vec<[f32; 3]> = mesh
            .indices
            .iter()
            .map(|&i| mesh.vertices[i as usize].position)
            .collect();
        assert_eq!(positions, vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    }

    #[test]
    fn normal_only_corners_get_zero_uv() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh = MeshData::parse_obj("n", src).unwrap();
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0, 0.0]));
    }

    #[test]
    fn objects_are_merged_with_offset_indices() {
        let src = "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
                   o b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n";
        let mesh = MeshData::parse_obj("two", src).unwrap();
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 6);
        let last = mesh.indices[5] as usize;
        assert_eq!(mesh.vertices[last].position[2], 1.0);
    }

    #[test]
    fn bad_index_is_an_error() {
        let src = "v 0 0 0\nv 1 0 0\n\nf 1 2 7\n";
        assert!(MeshData::parse_obj("bad", src).is_err());
    }

    #[test]
    fn load_rejects_mesh_without_faces() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "v 0 0 0").unwrap();
        let err = MeshData::load_obj(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::EmptyMesh(_)));
    }

    #[test]
    fn load_wraps_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "v 0 zero 0").unwrap();
        let err = MeshData::load_obj(file.path()).unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn bundled_models_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../resources/models");
        for name in ["crate.obj", "probe.obj"] {
            let mesh = MeshData::load_obj(root.join(name)).unwrap();
            assert!(!mesh.indices.is_empty());
            assert_eq!(mesh.indices.len() % 3, 0);
        }
    }

    #[test]
    fn bounds() {
        let mesh = MeshData::parse_obj("quad", QUAD).unwrap();
        assert_eq!(mesh.bounds(), Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0])));
        assert_eq!(MeshData::default().bounds(), None);
    }
}
