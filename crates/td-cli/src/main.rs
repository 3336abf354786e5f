//! `tdraw` — run a turtle command file and export the canvas as PNG.
//!
//! File loading, logging setup and image export live here; the parser,
//! cursor and interpreter never touch the filesystem.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use td_core::Program;
use td_engine::Interpreter;
use td_render::{PngExport, Present};

#[derive(Debug, Parser)]
#[command(name = "tdraw", version, about = "Render a turtle command file to PNG")]
struct Args {
    /// Command file: canvas line, cursor line, then one command per line.
    input: PathBuf,

    /// Where to write the rendered canvas.
    #[arg(short, long, default_value = "turtle.png")]
    output: PathBuf,

    /// Print the parsed program as JSON and exit without drawing.
    #[arg(long)]
    dump: bool,

    /// Export the partial canvas even when a command fails.
    #[arg(long)]
    keep_partial: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let program = Program::from_source(&source)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&program)?);
        return Ok(());
    }

    let mut exporter = PngExport::new(&args.output);
    let mut interpreter = Interpreter::new();

    for step in &program {
        if let Err(err) = interpreter.step(step) {
            log::error!("{err}");
            if args.keep_partial
                && let Some(canvas) = interpreter.canvas()
            {
                exporter
                    .present(canvas)
                    .context("failed to export partial canvas")?;
                log::warn!("partial canvas written to {}", exporter.path().display());
            }
            bail!(
                "run aborted at line {} after {} instructions",
                err.line,
                interpreter.executed()
            );
        }
    }

    let canvas = interpreter.finish().context("program is incomplete")?;
    exporter.present(&canvas).context("failed to export canvas")?;
    Ok(())
}
