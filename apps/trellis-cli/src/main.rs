use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use trellis_assets::AssetStore;
use trellis_common::EntityId;
use trellis_ecs::{CameraComponent, OrbitSettings};
use trellis_input::{InputEvent, Modifiers, orbit};
use trellis_kernel::World;
use trellis_render::{DebugTextRenderer, RenderView, Renderer};
use trellis_tools::WorldInspector;

#[derive(Parser)]
#[command(name = "trellis", about = "CLI tool for trellis scene graphs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Build a small scene with an orbit camera, drag it, and print the result
    Demo {
        /// Horizontal drag distance in pixels
        #[arg(short, long, default_value = "200")]
        drag: f32,
    },
    /// Import a .gltf file and print its node hierarchy
    Tree {
        path: PathBuf,
        /// Also print local and world placement of every node
        #[arg(short, long)]
        detail: bool,
    },
    /// Prepare one frame of a .gltf scene (or the demo scene) and print it
    Frame {
        path: Option<PathBuf>,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("trellis v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", trellis_common::crate_info());
            println!("ecs: {}", trellis_ecs::crate_info());
            println!("kernel: {}", trellis_kernel::crate_info());
            println!("input: {}", trellis_input::crate_info());
            println!("render: {}", trellis_render::crate_info());
            println!("assets: {}", trellis_assets::crate_info());
            println!("tools: {}", trellis_tools::crate_info());
        }
        Commands::Demo { drag } => {
            let mut store = AssetStore::new();
            let (mut world, camera) = demo_scene(&mut store)?;
            println!("{}", WorldInspector::summary(&world));
            print!("{}", WorldInspector::format_hierarchy(&world));

            let before = world
                .scene_graph(camera)
                .map(|g| g.position())
                .context("camera missing")?;
            for event in [
                InputEvent::PointerDown { x: 0.0, y: 0.0 },
                InputEvent::PointerMove {
                    x: drag,
                    y: 0.0,
                    modifiers: Modifiers::NONE,
                },
                InputEvent::PointerUp,
            ] {
                trellis_input::dispatch(&mut world, &event)?;
            }
            let after = world
                .scene_graph(camera)
                .map(|g| g.position())
                .context("camera missing")?;
            println!(
                "Orbit drag {drag}px: camera ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
                before.x, before.y, before.z, after.x, after.y, after.z
            );

            if let Some(info) = WorldInspector::inspect_entity(&world, camera) {
                println!("{info}");
            }
            print!("{}", DebugTextRenderer::new().render(&world, &RenderView::default())?);
        }
        Commands::Tree { path, detail } => {
            let mut world = World::new();
            let mut store = AssetStore::new();
            let report = trellis_assets::import_gltf(&path, &mut world, &mut store)
                .with_context(|| format!("importing {}", path.display()))?;
            println!(
                "{}: nodes={} roots={} meshes={}",
                path.display(),
                report.nodes.len(),
                report.roots.len(),
                report.meshes.len()
            );
            print!("{}", WorldInspector::format_hierarchy(&world));
            if detail {
                for id in &report.nodes {
                    if let Some(info) = WorldInspector::inspect_entity(&world, *id) {
                        println!("{info}");
                    }
                }
            }
        }
        Commands::Frame { path, width, height } => {
            let mut store = AssetStore::new();
            let world = match path {
                Some(path) => {
                    let mut world = World::new();
                    trellis_assets::import_gltf(&path, &mut world, &mut store)
                        .with_context(|| format!("importing {}", path.display()))?;
                    world
                }
                None => demo_scene(&mut store)?.0,
            };
            let view = RenderView {
                width,
                height,
                ..RenderView::default()
            };
            print!("{}", DebugTextRenderer::new().render(&world, &view)?);
        }
    }

    Ok(())
}

/// A table with two cubes on it, framed by an orbit camera.
fn demo_scene(store: &mut AssetStore) -> anyhow::Result<(World, EntityId)> {
    let mut world = World::new();
    let cube = store.register_default_cube();
    let mesh = store.mesh_component(cube).context("cube not registered")?;

    let table = world.create_named("Table");
    world.attach_mesh(table, mesh)?;
    if let Some(mut graph) = world.scene_graph_mut(table) {
        graph.set_scale(Vec3::new(4.0, 0.2, 2.0))?;
    }

    for (name, x) in [("LeftCube", -1.0), ("RightCube", 1.0)] {
        let child = world.create_named(name);
        world.attach_mesh(child, mesh)?;
        world.add_child(table, child)?;
        if let Some(mut graph) = world.scene_graph_mut(child) {
            graph.set_position(Vec3::new(x, 0.6, 0.0))?;
            graph.set_scale(Vec3::splat(0.5))?;
        }
    }

    let camera = world.create_named("Main");
    world.attach_camera(camera, CameraComponent::default())?;
    orbit::attach(&mut world, camera, OrbitSettings::default())?;
    orbit::set_target(&mut world, camera, &[table])?;

    Ok((world, camera))
}
