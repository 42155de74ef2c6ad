//! Catacomb dump
//!
//! Generates a dungeon from a seed and prints its ASCII map, or a JSON
//! summary with `--json`. Meant for eyeballing the generator and replaying
//! seeds reported by the game.

use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{LevelFilter, Log, Metadata, Record, info};
use serde::Serialize;

use dg_core::dungeon::{Doorway, Placement};
use dg_core::{
    DEFAULT_GENERATION_ATTEMPTS, Dungeon, DungeonKind, GenerationOptions, Point,
    generate_with_retries,
};

/// Generate a BSP catacomb and print it
#[derive(Parser, Debug)]
#[command(name = "dungeon-dump")]
#[command(author, version, about = "Generate a BSP catacomb and print it", long_about = None)]
struct Args {
    /// Seed; a random one is picked and reported when missing
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Dungeon height
    #[arg(short = 'r', long = "rows", default_value_t = 40)]
    rows: u8,

    /// Dungeon width
    #[arg(short = 'c', long = "cols", default_value_t = 120)]
    cols: u8,

    /// JSON file with generation options
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Minimum rows of a BSP leaf
    #[arg(long = "min-rows")]
    min_rows: Option<u8>,

    /// Minimum columns of a BSP leaf
    #[arg(long = "min-cols")]
    min_cols: Option<u8>,

    /// Lower bound of the room scale factor
    #[arg(long = "min-scale")]
    min_scale: Option<f64>,

    /// Target rows/cols ratio
    #[arg(long = "square-ratio")]
    square_ratio: Option<f64>,

    /// Generation attempts before giving up
    #[arg(short = 'n', long = "attempts", default_value_t = DEFAULT_GENERATION_ATTEMPTS)]
    attempts: usize,

    /// Print a JSON summary instead of the map
    #[arg(long = "json")]
    json: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

/// Writes log records to stderr
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Options from `--config`, then individual flags on top
fn load_options(args: &Args) -> Result<GenerationOptions, Box<dyn Error>> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| format!("can't read {}: {err}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|err| format!("can't parse {}: {err}", path.display()))?
        }
        None => GenerationOptions::default(),
    };

    if let Some(rows) = args.min_rows {
        options.region_min_rows = rows;
    }
    if let Some(cols) = args.min_cols {
        options.region_min_cols = cols;
    }
    if let Some(scale) = args.min_scale {
        options.min_scale = scale;
    }
    if let Some(ratio) = args.square_ratio {
        options.square_ratio = ratio;
    }
    Ok(options)
}

#[derive(Serialize)]
struct DoorwaySummary {
    place: Point,
    #[serde(flatten)]
    doorway: Doorway,
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    kind: DungeonKind,
    rows: u8,
    cols: u8,
    entrance: Point,
    exit: Point,
    options: &'a GenerationOptions,
    placements: &'a [Placement],
    doorways: Vec<DoorwaySummary>,
    map: Vec<String>,
}

impl<'a> Summary<'a> {
    fn new(dungeon: &'a Dungeon, options: &'a GenerationOptions) -> Self {
        let doors: BTreeSet<Point> = dungeon
            .placements()
            .iter()
            .flat_map(|placement| placement.doorways().iter().copied())
            .collect();
        let doorways = doors
            .into_iter()
            .filter_map(|place| {
                dungeon
                    .doorway_at(place)
                    .map(|doorway| DoorwaySummary { place, doorway: *doorway })
            })
            .collect();

        Self {
            seed: dungeon.seed(),
            kind: dungeon.kind(),
            rows: dungeon.rows(),
            cols: dungeon.cols(),
            entrance: dungeon.entrance(),
            exit: dungeon.exit(),
            options,
            placements: dungeon.placements(),
            doorways,
            map: dungeon.to_string().lines().map(str::to_owned).collect(),
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let options = load_options(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    if args.seed.is_none() {
        eprintln!("seed: {seed}");
    }

    let dungeon = generate_with_retries(seed, args.rows, args.cols, &options, args.attempts)?;
    if dungeon.seed() != seed {
        info!("seed {seed} failed, dungeon built from derived seed {}", dungeon.seed());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &Summary::new(&dungeon, &options))?;
        writeln!(out)?;
    } else {
        dungeon.write(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("dungeon-dump: {err}");
            ExitCode::FAILURE
        }
    }
}
