use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orbitview_assets::{MeshData, ShaderPair};
use orbitview_driver::{AppState, DemoConfig, FrameClock, FrameDriver, SceneMeshes};
use orbitview_input::{Key, KeyState};
use orbitview_render::{
    DrawList, DrawStrategy, MVP_UNIFORM, MeshHandle, Program, UniformTable, VIEW_PROJ_UNIFORM,
};
use orbitview_scene::InstanceTable;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orbitview-cli", about = "Headless tools for the orbitview demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate an instance table and print each instance
    Instances {
        /// Number of instances
        #[arg(short, long, default_value = "10")]
        count: usize,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Parse an OBJ file and print its size and bounds
    Mesh {
        path: PathBuf,
    },
    /// Run the frame driver headlessly with a fixed delta
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Fixed delta time in seconds
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Switch the camera to automatic mode on the first frame
        #[arg(long)]
        auto: bool,
        /// Instance seed; overrides the config
        #[arg(short, long)]
        seed: Option<u64>,
        /// Keys held for the whole run, e.g. `--hold left,shift,w`
        #[arg(long, value_delimiter = ',')]
        hold: Vec<String>,
        /// Submit one draw per instance instead of one instanced draw
        #[arg(long)]
        per_instance: bool,
    },
}

const MESHES: SceneMeshes = SceneMeshes {
    instanced: MeshHandle(0),
    object: MeshHandle(1),
    overlay: MeshHandle(2),
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("orbitview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", orbitview_common::crate_info());
            println!("input: {}", orbitview_input::crate_info());
            println!("scene: {}", orbitview_scene::crate_info());
            println!("render: {}", orbitview_render::crate_info());
            println!("assets: {}", orbitview_assets::crate_info());
            println!("driver: {}", orbitview_driver::crate_info());
        }
        Commands::Instances { count, seed, json } => {
            let config = DemoConfig::load_or_default(cli.config.as_deref())?;
            let table = InstanceTable::generate(count, seed, &config.instances.params);
            if json {
                println!("{}", serde_json::to_string_pretty(table.samples())?);
            } else {
                println!("Instance table: count={count}, seed={seed}");
                for (i, s) in table.samples().iter().enumerate() {
                    println!(
                        "  #{i:<4} offset=({:>7.3}, {:>7.3}, {:>7.3}) angle={:>7.2} deg scale={:.5}",
                        s.offset.x, s.offset.y, s.offset.z, s.angle_degrees, s.scale
                    );
                }
            }
        }
        Commands::Mesh { path } => {
            let mesh = MeshData::load_obj(&path)
                .with_context(|| format!("failed to load mesh {}", path.display()))?;
            println!("Mesh: {}", mesh.name);
            println!("  vertices:  {}", mesh.vertices.len());
            println!("  triangles: {}", mesh.indices.len() / 3);
            if let Some((lo, hi)) = mesh.bounds() {
                println!("  bounds:    {lo:?} .. {hi:?}");
            }
        }
        Commands::Simulate {
            frames,
            dt,
            auto,
            seed,
            hold,
            per_instance,
        } => {
            let mut config = DemoConfig::load_or_default(cli.config.as_deref())?;
            if seed.is_some() {
                config.instances.seed = seed;
            }
            if per_instance {
                config.instances.strategy = DrawStrategy::PerInstanceUniform;
            }

            let mut held = KeyState::new();
            for name in &hold {
                let key = Key::from_name(name)
                    .with_context(|| format!("unknown key name '{name}'"))?;
                held.press(key);
            }

            let uniforms = scene_uniforms(&config);
            let mut driver =
                FrameDriver::new(AppState::from_config(&config), FrameClock::fixed(dt));
            let mut draws = DrawList::new(uniforms);

            for frame in 0..frames {
                let mut keys = held.clone();
                if auto && frame == 0 {
                    keys.press(Key::Space);
                }
                draws.clear();
                driver.tick(&keys, MESHES, &mut draws);
            }

            let camera = &driver.app().camera;
            let position = camera.position();
            let object = driver.app().object.position();
            println!("Simulated {} frames at dt={dt}", driver.frames());
            println!(
                "Camera: mode={} angle={:.4} radius={:.3} position=({:.3}, {:.3}, {:.3})",
                if camera.is_automatic() { "automatic" } else { "manual" },
                camera.angle(),
                camera.radius(),
                position.x,
                position.y,
                position.z
            );
            println!(
                "Object: position=({:.3}, {:.3}, {:.3})",
                object.x, object.y, object.z
            );
            print!("{draws}");
        }
    }

    Ok(())
}

/// Uniform table from the configured shader pair, so missing uniforms are
/// reported the same way the desktop backend would. Falls back to the
/// standard names when the shaders cannot be read.
fn scene_uniforms(config: &DemoConfig) -> UniformTable {
    let scene = match ShaderPair::load(&config.assets.vertex_shader, &config.assets.fragment_shader)
    {
        Ok(pair) => pair.uniforms().into_iter().collect::<Vec<_>>(),
        Err(e) => {
            tracing::warn!("using default uniform names: {e}");
            vec![VIEW_PROJ_UNIFORM.to_string(), MVP_UNIFORM.to_string()]
        }
    };
    UniformTable::new()
        .with(Program::Scene, scene)
        .with(Program::Overlay, [MVP_UNIFORM])
}
