//! Field summary tool for UPP GRIB2 output.
//!
//! Opens a GRIB2 file plus a graphics specs file and prints everything a
//! plot of one (variable, level) pair would be built from: times, units,
//! contour levels, colors, corners, and value statistics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grib_decoder::GribFile;
use upp_common::time::title_format;
use upp_data::{default_specs_path, UppData, VarSpec};

#[derive(Parser, Debug)]
#[command(name = "upp-cli")]
#[command(about = "Summarize a UPP GRIB2 field and its graphics definition")]
struct Args {
    /// GRIB2 file to read
    #[arg(long)]
    grib_file: PathBuf,

    /// Graphics specs file (defaults to the shipped specs)
    #[arg(long)]
    specs: Option<PathBuf>,

    /// Variable short name as keyed in the specs file
    #[arg(short, long)]
    field: String,

    /// Level key, e.g. 500mb, 2m, sfc
    #[arg(short, long)]
    level: String,

    /// Also extract the u/v wind pair at the requested level
    #[arg(long)]
    wind: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let specs_path = args.specs.unwrap_or_else(default_specs_path);
    let specs = VarSpec::load(&specs_path)
        .with_context(|| format!("loading specs from {}", specs_path.display()))?;
    let file = GribFile::open(&args.grib_file)
        .with_context(|| format!("opening {}", args.grib_file.display()))?;
    info!(fields = file.field_names().len(), "decoded GRIB file");

    let data = UppData::new(&file, &specs, &args.field, &args.level)?;

    println!("{} at {}", args.field, args.level);
    println!("  analysis:  {}", title_format(data.anl_dt()));
    println!("  valid:     {} (f{:03})", title_format(data.valid_dt()), data.fhr());
    println!("  units:     {}", data.units());
    println!("  ticks:     {}", data.ticks());

    let clevs = data.clevs()?;
    println!("  clevs:     {} levels {:?} ...", clevs.len(), preview(&clevs));
    println!("  colors:    {} ({})", data.colors()?.len(), data.cmap());

    let [ll_lat, ur_lat, ll_lon, ur_lon] = data.corners();
    println!("  corners:   lat {ll_lat:.3}..{ur_lat:.3} lon {ll_lon:.3}..{ur_lon:.3}");

    let values = data.values()?;
    let (nj, ni) = data.grid_dims();
    let (min, max, mean) = stats(values);
    println!("  grid:      {nj} x {ni} ({} points)", values.len());
    println!("  values:    min {min:.3}  max {max:.3}  mean {mean:.3}");

    if args.wind {
        let (u, v) = data.wind(&args.level)?;
        let (umin, umax, _) = stats(&u);
        let (vmin, vmax, _) = stats(&v);
        println!("  wind u:    min {umin:.3}  max {umax:.3}");
        println!("  wind v:    min {vmin:.3}  max {vmax:.3}");
    }

    Ok(())
}

fn preview(clevs: &[f64]) -> &[f64] {
    &clevs[..clevs.len().min(5)]
}

fn stats(values: &[f32]) -> (f32, f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0_f64;
    let mut count = 0usize;
    for v in values {
        if v.is_finite() {
            min = min.min(*v);
            max = max.max(*v);
            sum += *v as f64;
            count += 1;
        }
    }
    if count == 0 {
        return (f32::NAN, f32::NAN, f32::NAN);
    }
    (min, max, (sum / count as f64) as f32)
}
