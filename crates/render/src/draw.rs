use glam::Mat4;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Shader program a draw is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Program {
    /// Textured scene meshes (instanced field and moving object).
    Scene,
    /// Screen-space UI quad.
    Overlay,
}

/// Backend-assigned identifier for an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// A named matrix uniform to set before the draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformWrite {
    pub name: &'static str,
    pub value: Mat4,
}

/// How many copies of the mesh a draw produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instances {
    /// One copy, transformed by the draw's uniform alone.
    Single,
    /// `count` copies using the uploaded per-instance model matrices as
    /// vertex attributes that advance once per instance.
    Attributes { count: u32 },
}

/// One draw submission.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: Program,
    pub mesh: MeshHandle,
    /// `None` when the uniform is absent from the program; the backend keeps
    /// whatever value the uniform slot already holds.
    pub uniform: Option<UniformWrite>,
    pub instances: Instances,
}

/// Anything that accepts draw calls.
pub trait DrawTarget {
    /// Whether `program` declares a uniform named `name`.
    fn has_uniform(&self, program: Program, name: &str) -> bool;

    /// Submit one draw.
    fn draw(&mut self, call: DrawCall);
}

/// Uniform names declared by each program.
#[derive(Debug, Clone, Default)]
pub struct UniformTable {
    programs: BTreeMap<Program, BTreeSet<String>>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `names` for `program`, replacing any earlier declaration.
    pub fn with<I, S>(mut self, program: Program, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs
            .insert(program, names.into_iter().map(Into::into).collect());
        self
    }

    pub fn contains(&self, program: Program, name: &str) -> bool {
        self.programs
            .get(&program)
            .is_some_and(|names| names.contains(name))
    }
}

/// Recording draw target: collects a frame's draws for a backend to replay,
/// and doubles as a text renderer for headless runs.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    uniforms: UniformTable,
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new(uniforms: UniformTable) -> Self {
        Self {
            uniforms,
            calls: Vec::new(),
        }
    }

    /// Drop recorded calls, keeping the uniform table.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Total mesh copies drawn across all calls.
    pub fn instance_count(&self) -> u64 {
        self.calls
            .iter()
            .map(|c| match c.instances {
                Instances::Single => 1,
                Instances::Attributes { count } => count as u64,
            })
            .sum()
    }
}

impl DrawTarget for DrawList {
    fn has_uniform(&self, program: Program, name: &str) -> bool {
        self.uniforms.contains(program, name)
    }

    fn draw(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

impl fmt::Display for DrawList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Draw list: {} calls, {} instances ===",
            self.len(),
            self.instance_count()
        )?;
        for call in &self.calls {
            let uniform = call
                .uniform
                .map(|u| u.name)
                .unwrap_or("<unchanged>");
            let instances = match call.instances {
                Instances::Single => "single".to_string(),
                Instances::Attributes { count } => format!("x{count}"),
            };
            writeln!(
                f,
                "  {:?} mesh={} uniform={} {}",
                call.program, call.mesh.0, uniform, instances
            )?;
        }
        Ok(())
    }
}
