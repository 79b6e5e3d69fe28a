//! CLI tool for vsheet - lays out a scene and outputs the frame as JSON
//!
//! Usage:
//!   vsheet_cli <scene.json>              # Output JSON to stdout
//!   vsheet_cli <scene.json> -o out.json  # Output JSON to file
//!   vsheet_cli --demo 200x50             # Lay out the generated demo dataset
//!
//! Log level comes from `VSHEET_LOG` (error, warn, info, debug, trace).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::env;
use std::fs;
use std::io::{self, Write};
use vsheet::demo::{demo_columns, generate_rows};
use vsheet::{Grid, Scene};

fn init_logging() {
    let level = env::var("VSHEET_LOG")
        .ok()
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_time_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn demo_grid(size: &str) -> Result<Grid, String> {
    let (rows, cols) = size
        .split_once('x')
        .and_then(|(r, c)| Some((r.parse::<usize>().ok()?, c.parse::<usize>().ok()?)))
        .ok_or_else(|| format!("expected ROWSxCOLS, got {size:?}"))?;
    let mut grid = Grid::default();
    grid.batch(|g| {
        g.set_column_list(demo_columns(cols))?;
        g.set_records(generate_rows(rows, cols));
        g.on_viewport_resize(1280.0, 720.0);
        Ok::<_, vsheet::VsheetError>(())
    })
    .map_err(|e| e.to_string())?;
    Ok(grid)
}

fn main() {
    init_logging();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: vsheet_cli <scene.json> [-o output.json] | --demo ROWSxCOLS");
        std::process::exit(1);
    }

    let built = if args[1] == "--demo" {
        match args.get(2) {
            Some(size) => demo_grid(size),
            None => Err("--demo needs ROWSxCOLS".to_string()),
        }
    } else {
        Scene::from_path(&args[1])
            .and_then(Scene::into_grid)
            .map_err(|e| format!("Error loading {}: {e}", args[1]))
    };
    let mut grid = match built {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let output_path = args
        .iter()
        .position(|a| a == "-o")
        .and_then(|i| args.get(i + 1));

    let json = match serde_json::to_string_pretty(grid.frame()) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {} ({} cells)", path, grid.frame().cell_count());
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
