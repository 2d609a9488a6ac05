//! Visceral
//!
//! Command-line host for the procedural anatomy viewer. Synthesizes the
//! scene, drives the per-frame modulators and rasterizes surface maps,
//! reporting what a rendering host would receive.
//!
//! # Usage
//!
//! ```bash
//! # Synthesize every mesh and report counts and bounds
//! visceral inspect
//!
//! # One organ only
//! visceral inspect --organ leftKidney
//!
//! # Drive two seconds of frames with the heart selected
//! visceral animate --select heart --seconds 2
//!
//! # Rasterize the maps for an organ
//! visceral textures --organ liver --size 256
//!
//! # Load a JSON viewer configuration
//! visceral --config viewer.json inspect
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use visceral_core::{OrganId, OrganSystem, ViewState};
use visceral_mesh::{organ_geometry, Mesh};
use visceral_viz::{
    MaterialState, MaterialTextures, SceneAnimator, SceneGeometry, SceneMaterials, TextureCache,
    ViewerConfig,
};

/// Visceral anatomy viewer host
#[derive(Parser, Debug)]
#[command(name = "visceral")]
#[command(author, version, about = "Procedural anatomy geometry and material synthesis", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Viewer configuration (JSON); defaults apply to missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize meshes and report counts, bounds and timing (default)
    Inspect {
        /// Only this organ (e.g. heart, leftLung)
        #[arg(short, long)]
        organ: Option<OrganId>,
    },

    /// Drive the frame modulators for a scripted view state
    Animate {
        /// Selected organ
        #[arg(short, long)]
        select: Option<OrganId>,

        /// Hovered organ
        #[arg(long)]
        hover: Option<OrganId>,

        /// Enable x-ray mode
        #[arg(long)]
        xray: bool,

        /// Hide an anatomical system (repeatable)
        #[arg(long)]
        hide: Vec<OrganSystem>,

        /// Simulated duration in seconds
        #[arg(long, default_value = "2.0")]
        seconds: f32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: u32,
    },

    /// Rasterize color, normal and roughness maps for an organ
    Textures {
        /// Organ whose base color is used
        #[arg(short, long, default_value = "heart")]
        organ: OrganId,

        /// Override the configured map size (square)
        #[arg(long)]
        size: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Visceral v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        None => inspect(&config, None),
        Some(Commands::Inspect { organ }) => inspect(&config, organ),
        Some(Commands::Animate {
            select,
            hover,
            xray,
            hide,
            seconds,
            fps,
        }) => {
            let mut view = ViewState::default().with_xray(xray);
            view.select(select);
            view.hover(hover);
            for system in hide {
                view.visible_systems.remove(system);
            }
            animate(&config, &view, seconds, fps)
        }
        Some(Commands::Textures { organ, size }) => {
            let mut config = config;
            if let Some(size) = size {
                config.texture = config.texture.with_size(size, size);
            }
            textures(&config, organ)
        }
    }
}

/// Read the viewer configuration, or use the defaults.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ViewerConfig> {
    let Some(path) = path else {
        return Ok(ViewerConfig::default());
    };

    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn report_mesh(name: &str, mesh: &Mesh) {
    let size = mesh.bounds().map(|b| b.size()).unwrap_or_default();
    let valid = if mesh.validate().is_ok() { "ok" } else { "INVALID" };
    info!(
        "  {:<18} {:>7} verts {:>7} tris  size {:.3} x {:.3} x {:.3}  {}",
        name,
        mesh.vertex_count(),
        mesh.triangle_count(),
        size.x,
        size.y,
        size.z,
        valid
    );
}

/// Synthesize and report geometry
fn inspect(config: &ViewerConfig, organ: Option<OrganId>) -> anyhow::Result<()> {
    if let Some(id) = organ {
        let descriptor = id.descriptor();
        info!("{} ({})", descriptor.name, descriptor.system.display_name());
        report_mesh(id.as_str(), &organ_geometry(id));
        return Ok(());
    }

    let scene = SceneGeometry::synthesize(config);

    info!("Organs:");
    for (id, mesh) in &scene.organs {
        report_mesh(id.as_str(), mesh);
    }

    info!("Skeleton:");
    let rib_vertices: usize = scene.ribs.iter().map(Mesh::vertex_count).sum();
    info!("  {:<18} {:>7} verts in {} meshes", "ribs", rib_vertices, scene.ribs.len());
    report_mesh("spine", &scene.spine);

    info!("Body:");
    report_mesh("shell", &scene.body_shell);

    info!(
        "Total: {} meshes, {} vertices, {} triangles",
        scene.mesh_count(),
        scene.vertex_count(),
        scene.triangle_count()
    );

    let materials = SceneMaterials::build(&config.capabilities);
    let physical = materials.organs.iter().filter(|(_, m)| m.is_physical()).count();
    info!(
        "Materials: {}/{} organs physical, body shell {}",
        physical,
        materials.organs.len(),
        if materials.body_shell.is_physical() { "physical" } else { "standard" }
    );

    Ok(())
}

fn report_state(name: &str, state: &MaterialState) {
    info!(
        "  {:<18} opacity {:.3}  emissive {:.3}  scale ({:.3}, {:.3}, {:.3})  z {:.3}{}",
        name,
        state.opacity,
        state.emissive_intensity,
        state.scale.x,
        state.scale.y,
        state.scale.z,
        state.position_z,
        if state.visible { "" } else { "  hidden" }
    );
}

/// Run the frame modulators and report the final material scalars
fn animate(config: &ViewerConfig, view: &ViewState, seconds: f32, fps: u32) -> anyhow::Result<()> {
    anyhow::ensure!(fps > 0, "fps must be positive");
    anyhow::ensure!(seconds.is_finite() && seconds >= 0.0, "seconds must be a non-negative number");

    let frames = (seconds * fps as f32).round() as u64;
    let mut animator = SceneAnimator::new(config.modulator);

    info!(
        "Driving {} frames at {} fps (selected: {}, x-ray: {})",
        frames,
        fps,
        view.selected.map_or("none", OrganId::as_str),
        view.xray
    );

    for frame in 1..=frames {
        animator.update(view, frame as f32 / fps as f32);
    }

    info!("Organs:");
    for (id, state) in animator.organs() {
        report_state(id.as_str(), state);
    }
    report_state("skeleton", animator.skeleton());
    report_state("body shell", animator.body_shell());

    Ok(())
}

/// Rasterize and report surface maps
fn textures(config: &ViewerConfig, organ: OrganId) -> anyhow::Result<()> {
    let descriptor = organ.descriptor();
    let mut cache = TextureCache::new(&config.capabilities);

    info!(
        "{} maps at {}x{} (base {})",
        descriptor.name, config.texture.width, config.texture.height, descriptor.color
    );

    let maps = MaterialTextures::acquire(&mut cache, descriptor.color, &config.texture);
    for handle in [&maps.color, &maps.normal, &maps.roughness] {
        let map = handle.map();
        let [r, g, b, a] = map.channel_means();
        info!(
            "  {:<10} {:>9} px  mean rgba ({:.1}, {:.1}, {:.1}, {:.1}){}",
            handle.key().kind.as_str(),
            map.pixel_count(),
            r,
            g,
            b,
            a,
            if map.is_placeholder() { "  placeholder" } else { "" }
        );
    }

    maps.release(&mut cache);
    anyhow::ensure!(cache.is_empty(), "texture leases outstanding after release");
    Ok(())
}
