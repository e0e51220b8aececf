// atlasgen - Build the glyph atlas for the WebGL renderer
//
// Pipeline:
//   1. Load a glyph sheet (a regular grid of glyph cells)
//   2. Slice the first 48 cells in row-major order, matching `glyphs::ALPHABET`
//   3. Convert each cell to a coverage mask
//   4. Resample to square slots and stack them vertically
//   5. Write a PNG the shader samples with one slot per 1/48 of its height
//
// Usage: cargo run --bin atlasgen -- <sheet> <out.png> [--cols N] [--rows N] [--cell N] [--invert]
//        cargo run --bin atlasgen -- --list

mod sheet;

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glyph_rain_engine::glyphs::{ALPHABET, ALPHABET_SIZE};
use log::{info, warn};

struct Options {
    sheet: PathBuf,
    out: PathBuf,
    layout: sheet::Layout,
    cell: u32,
    invert: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--list") {
        for (i, g) in ALPHABET.iter().enumerate() {
            println!("{i:2}  {g}");
        }
        return Ok(());
    }

    let opts = parse_args(&args)?;

    let img = image::open(&opts.sheet)
        .with_context(|| format!("failed to open glyph sheet {}", opts.sheet.display()))?;
    info!(
        "sheet {} ({}x{}, layout {}x{})",
        opts.sheet.display(), img.width(), img.height(), opts.layout.cols, opts.layout.rows
    );

    let cells = sheet::slice(&img, opts.layout, ALPHABET_SIZE)?;
    let atlas = sheet::stack(&cells, opts.cell, opts.invert);

    let filled = sheet::filled_slots(&atlas, ALPHABET_SIZE as u32);
    if filled < ALPHABET_SIZE {
        warn!(
            "{} of {} slots are blank; wrong layout or missing --invert?",
            ALPHABET_SIZE - filled, ALPHABET_SIZE
        );
    }

    atlas
        .save(&opts.out)
        .with_context(|| format!("failed to write atlas {}", opts.out.display()))?;
    info!("wrote {} ({}x{})", opts.out.display(), atlas.width(), atlas.height());
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options> {
    let program = args.first().map_or("atlasgen", String::as_str);
    if args.len() < 3 {
        bail!(
            "usage: {program} <sheet> <out.png> [--cols N] [--rows N] [--cell N] [--invert]\n       {program} --list"
        );
    }

    let mut opts = Options {
        sheet: PathBuf::from(&args[1]),
        out: PathBuf::from(&args[2]),
        layout: sheet::Layout { cols: 1, rows: ALPHABET_SIZE as u32 },
        cell: 64,
        invert: false,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--cols" => { opts.layout.cols = number(args, i)?; i += 2; }
            "--rows" => { opts.layout.rows = number(args, i)?; i += 2; }
            "--cell" => { opts.cell = number(args, i)?; i += 2; }
            "--invert" => { opts.invert = true; i += 1; }
            other => bail!("unknown argument `{other}`"),
        }
    }

    if opts.cell == 0 {
        bail!("--cell must be positive");
    }
    Ok(opts)
}

fn number(args: &[String], i: usize) -> Result<u32> {
    let flag = &args[i];
    let value = args.get(i + 1).with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got `{value}`"))
}
