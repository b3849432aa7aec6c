// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: generate the ground of a home model and dump it as JSON
//!
//! Usage:
//!   ground3d-dump <home.json> [--out <file>] [--mesh]

use ground3d_core::HomeModel;
use ground3d_processing::{GroundExport, GroundScene, ProcessingConfig, Result};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process;
use std::sync::Arc;

struct Options {
    input: String,
    output: Option<String>,
    with_mesh: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,ground3d=debug".into()))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Some(options) => options,
        None => {
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn parse_options(args: &[String]) -> Option<Options> {
    let mut options = Options {
        input: args[1].clone(),
        output: None,
        with_mesh: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                i += 1;
                options.output = Some(args.get(i)?.clone());
            }
            "--mesh" => options.with_mesh = true,
            other => {
                eprintln!("Unknown option: {}", other);
                return None;
            }
        }
        i += 1;
    }
    Some(options)
}

fn run(options: &Options) -> Result<()> {
    let config = ProcessingConfig::try_from_env()?;
    let home: HomeModel = serde_json::from_str(&fs::read_to_string(&options.input)?)?;
    if let Err(e) = home.validate() {
        tracing::warn!(error = %e, "Model has entries the generator will skip");
    }

    let scene = GroundScene::new(config, None)?;
    scene.request_rebuild(Arc::new(home))?;
    let snapshot = scene.snapshot();
    let export = GroundExport::from_snapshot(&snapshot, options.with_mesh);

    eprintln!("Ground of {}", options.input);
    for level in &export.elevations {
        eprintln!(
            "  elevation {:>10.1}: {:>3} face(s), {:>14.1} cm2",
            level.elevation, level.faces, level.area
        );
    }
    eprintln!("  skirts: {}", export.skirts.len());
    if let Some(mesh) = &export.mesh {
        eprintln!("  mesh: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
    }

    match &options.output {
        Some(path) => {
            export.to_writer(BufWriter::new(File::create(path)?))?;
            eprintln!("Wrote {}", path);
        }
        None => export.to_writer(io::stdout().lock())?,
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: ground3d-dump <home.json> [--out <file>] [--mesh]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --out <file>  Write JSON to <file> instead of stdout");
    eprintln!("  --mesh            Include the triangulated mesh");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  GROUND_DETAIL_MARGIN, GROUND_DEFAULT_TEXTURE_SIZE,");
    eprintln!("  GROUND_WAIT_FOR_TEXTURE, GROUND_TEXTURE_TIMEOUT_MS, RUST_LOG");
}
