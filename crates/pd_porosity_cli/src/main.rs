use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pd_porosity::prelude::*;
use pd_porosity_cli::{
    init_tracing, load_file_config, progress_line, FileConfig, ParamOverrides,
};
use tracing::warn;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SearchArg {
    Exhaustive,
    CellGrid,
}

impl From<SearchArg> for BondSearch {
    fn from(value: SearchArg) -> Self {
        match value {
            SearchArg::Exhaustive => BondSearch::Exhaustive,
            SearchArg::CellGrid => BondSearch::CellGrid,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pd-porosity",
    version,
    about = "Generate a porosity pre-damage field on a 2D peridynamic lattice and write it as VTK"
)]
struct Opts {
    /// Domain length in x
    #[arg(long)]
    lx: Option<f64>,

    /// Domain length in y
    #[arg(long)]
    ly: Option<f64>,

    /// Lattice spacing
    #[arg(long)]
    dx: Option<f64>,

    /// Target porosity ratio in [0, 1]
    #[arg(long)]
    phi: Option<f64>,

    /// Horizon factor (delta = m * dx)
    #[arg(long)]
    m: Option<f64>,

    /// RON run configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base seed for bond breaking (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Neighbor search strategy
    #[arg(long, value_enum)]
    search: Option<SearchArg>,

    /// Run on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Output path (default: porosity_Lx<Lx>_phi<phi%>.vtk)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Program to launch with the written file, e.g. a VTK viewer
    #[arg(long)]
    open_with: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let opts = Opts::parse();

    let file = match &opts.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    let overrides = ParamOverrides {
        lx: opts.lx,
        ly: opts.ly,
        dx: opts.dx,
        phi: opts.phi,
        m: opts.m,
        seed: opts.seed,
        search: opts.search.map(Into::into),
        sequential: opts.sequential,
    };
    let config = file.resolve(&overrides)?;

    let mut progress = FnSink::new(|event| {
        if let Some(line) = progress_line(&event) {
            println!("{line}");
        }
    });
    let result = run_with_events(&config, &mut progress).context("pre-damage run aborted")?;

    let out = opts
        .out
        .unwrap_or_else(|| PathBuf::from(output_file_name(&config.params)));
    export_to_path(&VtkPolyDataExporter::default(), &result, &out)
        .with_context(|| format!("write {}", out.display()))?;

    let summary = result.summary();
    println!(
        "Grid: Nx = {}, Ny = {}, N = {}",
        result.lattice.nx, result.lattice.ny, summary.particle_count
    );
    println!("Total bonds (before damage): {}", summary.total_bonds);
    println!("Broken bonds (after damage): {}", summary.broken_bonds);
    println!(
        "Realized global porosity (bond-based) ~ {:.6}",
        summary.realized_porosity
    );
    println!("Seed: {}", summary.seed);
    println!("VTK file written to: {}", out.display());

    if let Some(program) = opts.open_with {
        match Command::new(&program).arg(&out).spawn() {
            Ok(_) => println!("Opening {} with {}...", out.display(), program),
            Err(e) => warn!("Could not launch '{}': {}.", program, e),
        }
    }

    Ok(())
}
