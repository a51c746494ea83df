//! Branch shaping demo
//!
//! Builds a three-branch limb, registers a flattened ring half way up the
//! skin, runs the assignment pass and prints the resulting cross-sections.
//!
//! Usage:
//!     shape_branch [OPTIONS]
//!
//! Options:
//!     -c, --config <FILE>     Shaping config JSON (default: built-in defaults)
//!     -p, --position <POS>    Branch-local position to sample (default: 0.5)
//!     -s, --sides <N>         Force a side count instead of the girth-based one
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use branch_shaper::core::types::Vec3;

use branch_shaper::assembly::{SegmentCollector, assign_shapers};
use branch_shaper::config::ShapingConfig;
use branch_shaper::shaping::{ResolutionParams, Ring, Section, SectionTable, ShaperKind, side_count};
use branch_shaper::skeleton::{Branch, BranchCurve, BranchId, GirthProfile, Skeleton, Skin};

fn print_help() {
    eprintln!("shape_branch - Branch shaping demo");
    eprintln!();
    eprintln!("Usage: shape_branch [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -c, --config <FILE>     Shaping config JSON (default: built-in defaults)");
    eprintln!("    -p, --position <POS>    Branch-local position to sample (default: 0.5)");
    eprintln!("    -s, --sides <N>         Force a side count instead of the girth-based one");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    shape_branch -p 0.25");
    eprintln!("    shape_branch --config ./shaping.json --sides 8");
}

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    position: f32,
    sides: Option<usize>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut config: Option<PathBuf> = None;
    let mut position: f32 = 0.5;
    let mut sides: Option<usize> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config = Some(PathBuf::from(&args[i]));
            }
            "-p" | "--position" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --position".to_string());
                }
                position = args[i].parse().map_err(|_| format!("Invalid position: {}", args[i]))?;
                if !(0.0..=1.0).contains(&position) {
                    return Err(format!("Position must be in [0, 1], got {}", position));
                }
            }
            "-s" | "--sides" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --sides".to_string());
                }
                let n: usize = args[i].parse().map_err(|_| format!("Invalid sides: {}", args[i]))?;
                if n < 3 {
                    return Err(format!("Sides must be at least 3, got {}", n));
                }
                sides = Some(n);
            }
            arg => {
                return Err(format!("Unknown option: {}", arg));
            }
        }
        i += 1;
    }

    Ok(Args { config, position, sides })
}

/// Three gently bending branches, thinning towards the tip
fn build_limb() -> Result<(Skeleton, Vec<BranchId>), branch_shaper::core::Error> {
    let mut skeleton = Skeleton::new();
    let girths = [(0.12, 0.08), (0.08, 0.05), (0.05, 0.02)];

    let mut base = Vec3::ZERO;
    let mut ids = Vec::new();
    for (i, &(from, to)) in girths.iter().enumerate() {
        let lean = Vec3::new(0.15 * i as f32, 1.0, 0.0).normalize();
        let points = vec![Vec3::ZERO, lean * 0.6, lean * 1.2 + Vec3::X * 0.05];
        let tip = *points.last().unwrap_or(&Vec3::ZERO);

        let sections = SectionTable::new()
            .with_section(Section::new(0.0, 1.2)?.with_scales(1.1, 1.0, 1.0, 0.9))?;
        let branch = Branch::new(BranchCurve::new(points)?, GirthProfile::new(from, to))
            .with_origin(base)
            .with_shaper(ShaperKind::Default(sections));

        ids.push(skeleton.add_branch(branch));
        base += tip;
    }

    for pair in ids.windows(2) {
        skeleton.link(pair[0], pair[1])?;
    }

    Ok((skeleton, ids))
}

fn main() {
    branch_shaper::core::logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    let config = match &args.config {
        Some(path) => match ShapingConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ShapingConfig::default(),
    };

    let (mut skeleton, ids) = match build_limb() {
        Ok(limb) => limb,
        Err(e) => {
            eprintln!("Error building limb: {}", e);
            std::process::exit(1);
        }
    };

    println!("Branch Shaping Demo");
    println!("===================");
    println!("Branches: {}", skeleton.len());
    println!("Sides: {}..={}", config.min_sides, config.max_sides);
    println!("Sample position: {}", args.position);
    println!();

    // One skin over the whole limb, a flattened ring in the middle
    let skin = Skin::new(0, ids[0]).with_range(0.0, 1.0);
    let mut collector = SegmentCollector::new();
    collector.register(skin.id, 0, 0.5, 0.0, 1.0, Ring::ellipse(9, 0.09, 0.04));

    let start = Instant::now();
    let report = match assign_shapers(&mut skeleton, &skin, &collector, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error assigning shapers: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Assigned {} branches ({} rings, {} stitches, {} default markers) in {:.2}ms",
        report.branches,
        report.rings_inserted,
        report.stitches,
        report.default_markers,
        start.elapsed().as_secs_f64() * 1000.0
    );
    println!();

    let (min_girth, max_girth) = skeleton
        .iter()
        .map(|branch| branch.girth.average())
        .fold((f32::MAX, f32::MIN), |(lo, hi), g| (lo.min(g), hi.max(g)));
    let params = ResolutionParams::from_config(&config, min_girth, max_girth);

    for branch in skeleton.iter() {
        let sides = args.sides.unwrap_or_else(|| {
            side_count(&branch.shaper, branch, args.position, &params, branch.girth.average())
        });
        let section = branch.cross_section(args.position, sides, true);

        println!("Branch {:?}: {} sides at {}", branch.id, section.sides(), section.position);
        for (point, normal) in section.points.iter().zip(&section.normals) {
            println!(
                "  p=({:>7.3}, {:>7.3}, {:>7.3})  n=({:>6.3}, {:>6.3}, {:>6.3})",
                point.x, point.y, point.z, normal.x, normal.y, normal.z
            );
        }
    }
}
