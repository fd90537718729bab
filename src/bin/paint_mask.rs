//! Paint a mask volume from a JSON job description
//!
//! Writes the mask's scalar buffer as raw native-endian bytes.
//!
//! Usage:
//!     paint_mask [OPTIONS] <JOB_JSON> <OUTPUT_RAW>
//!
//! Options:
//!     -r, --radius <R>        Override the job's brush radius
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use voxpaint::core::logging;
use voxpaint::paint::PaintJob;

fn print_help() {
    eprintln!("paint_mask - Stamp brush spheres into a mask volume");
    eprintln!();
    eprintln!("Usage: paint_mask [OPTIONS] <JOB_JSON> <OUTPUT_RAW>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -r, --radius <R>        Override the job's brush radius");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example job:");
    eprintln!(r#"    {{"geometry": {{"dimensions": [64, 64, 64], "spacing": [0.5, 0.5, 1.0]}},"#);
    eprintln!(r#"     "scalar_type": "uint8", "brush": {{"radius": 2.0, "color": [1]}},"#);
    eprintln!(r#"     "space": "world", "points": [[10.0, 12.5, 30.0]]}}"#);
}

#[derive(Debug)]
struct Args {
    job: PathBuf,
    output: PathBuf,
    radius: Option<f64>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut radius: Option<f64> = None;
    let mut paths: Vec<PathBuf> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-r" | "--radius" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --radius".to_string());
                }
                radius = Some(args[i].parse().map_err(|_| format!("Invalid radius: {}", args[i]))?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => paths.push(PathBuf::from(path)),
        }
        i += 1;
    }

    let mut paths = paths.into_iter();
    let job = paths.next().ok_or("Missing job file")?;
    let output = paths.next().ok_or("Missing output file")?;
    if paths.next().is_some() {
        return Err("Too many arguments".to_string());
    }

    Ok(Args { job, output, radius })
}

fn run(args: &Args) -> voxpaint::core::Result<()> {
    let mut job = PaintJob::load(&args.job)?;
    if let Some(radius) = args.radius {
        job.brush.radius = radius;
    }

    log::info!(
        "Painting {} {:?} points into {} {:?} mask",
        job.points.len(),
        job.space,
        job.geometry.dimensions,
        job.scalar_type
    );

    let start = Instant::now();
    let mask = job.run()?;
    let bytes = mask.scalars().map(|s| s.as_bytes()).unwrap_or_default();
    std::fs::write(&args.output, bytes)?;

    log::info!(
        "Wrote {} bytes to {} in {:.2}ms",
        bytes.len(),
        args.output.display(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
