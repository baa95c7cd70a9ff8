//! Grumpy CLI - generate the keyboard case from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grumpy_core::case::{CaseBuilder, Part};
use grumpy_core::export::MeshExport;
use grumpy_core::layout::{self, Column, HandFrame};
use grumpy_core::mesh::{MeshConfig, SdfToMesh};
use grumpy_core::params::{CaseParams, ROW_COUNT};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "grumpy")]
#[command(about = "Parametric split keyboard case generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mesh the case, or one printable part of it
    Generate {
        /// Output file, .stl or .obj
        #[arg(short, long)]
        output: PathBuf,

        /// Parameter file (TOML), defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// full, bottom, plate or top
        #[arg(short, long, default_value = "full")]
        part: Part,

        /// Grid cell size in millimetres
        #[arg(long, default_value = "0.25")]
        cell_size: f32,
    },

    /// Print the switch positions
    Layout {
        /// Parameter file (TOML), defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the default parameters as TOML
    Params {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for `layout` and `params`
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            config,
            part,
            cell_size,
        } => run_generate(&output, config.as_deref(), part, cell_size),
        Commands::Layout { config, json } => run_layout(config.as_deref(), json),
        Commands::Params { output } => run_params(output.as_deref()),
    }
}

fn load_params(config: Option<&Path>) -> Result<CaseParams> {
    match config {
        Some(path) => CaseParams::load(path)
            .with_context(|| format!("failed to load parameters from {}", path.display())),
        None => Ok(CaseParams::default()),
    }
}

fn run_generate(output: &Path, config: Option<&Path>, part: Part, cell_size: f32) -> Result<()> {
    let params = load_params(config)?;
    if let Some(finest) = coarse_for(&params, cell_size) {
        tracing::warn!(
            cell_size,
            finest_chamfer = finest,
            "cell size is too coarse to show the smallest chamfers"
        );
    }
    let builder = CaseBuilder::new(params).context("invalid case parameters")?;
    let solid = builder.build(part);

    tracing::info!(%part, cell_size, "meshing");
    let mesh = solid
        .to_mesh(&MeshConfig::default().with_cell_size(cell_size))
        .with_context(|| format!("failed to mesh the {part} part"))?;

    let stats = mesh.stats();
    tracing::info!(
        triangles = stats.triangles,
        volume_mm3 = stats.volume,
        open_edges = stats.open_edges,
        "mesh ready"
    );
    if !stats.is_closed() {
        tracing::warn!(open_edges = stats.open_edges, "mesh is not watertight");
    }

    mesh.export(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Wrote {} ({} triangles, {:.1} x {:.1} x {:.1} mm)",
        output.display(),
        stats.triangles,
        stats.bounds.size().x,
        stats.bounds.size().y,
        stats.bounds.size().z,
    );
    Ok(())
}

/// The smallest chamfer when `cell_size` cannot resolve it
fn coarse_for(p: &CaseParams, cell_size: f32) -> Option<f32> {
    p.finest_chamfer().filter(|&finest| cell_size >= finest)
}

#[derive(Debug, Serialize)]
struct KeyReport {
    row: Option<u32>,
    /// Hand frame
    local: [f32; 2],
    /// Right half in world XY
    world: [f32; 2],
}

#[derive(Debug, Serialize)]
struct LayoutReport {
    hand_angle_deg: f32,
    keys: Vec<KeyReport>,
    columns: Vec<Column>,
}

fn layout_report(p: &CaseParams) -> LayoutReport {
    let frame = HandFrame::new(p);
    let key = |row, local: glam::Vec2| KeyReport {
        row,
        local: local.to_array(),
        world: frame.to_world(local).to_array(),
    };

    let mut keys: Vec<KeyReport> = (0..ROW_COUNT)
        .flat_map(|row| {
            layout::row_positions(p, row)
                .into_iter()
                .map(move |local| (row, local))
        })
        .map(|(row, local)| key(Some(row), local))
        .collect();
    keys.extend(
        layout::thumb_key_positions(p)
            .into_iter()
            .map(|local| key(None, local)),
    );

    LayoutReport {
        hand_angle_deg: p.hand_angle_deg,
        keys,
        columns: layout::columns(p),
    }
}

fn run_layout(config: Option<&Path>, json: bool) -> Result<()> {
    let params = load_params(config)?;
    params.validate().context("invalid case parameters")?;
    let report = layout_report(&params);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:<6} {:>9} {:>9} {:>9} {:>9}", "row", "local x", "local y", "world x", "world y");
    for k in &report.keys {
        let row = k.row.map_or_else(|| "thumb".to_string(), |r| r.to_string());
        println!(
            "{:<6} {:>9.3} {:>9.3} {:>9.3} {:>9.3}",
            row, k.local[0], k.local[1], k.world[0], k.world[1]
        );
    }
    println!();
    println!("{:<6} {:>9} {:>9} {:>9}", "column", "x", "y min", "y max");
    for (i, c) in report.columns.iter().enumerate() {
        println!("{:<6} {:>9.3} {:>9.3} {:>9.3}", i, c.x, c.y_min, c.y_max);
    }
    Ok(())
}

fn run_params(output: Option<&Path>) -> Result<()> {
    let text = CaseParams::default().to_toml_string()?;
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote default parameters");
        }
        None => print!("{text}"),
    }
    Ok(())
}
