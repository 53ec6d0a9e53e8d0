use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use glam::IVec2;
use petri_tools::report::{self, ChunkReport};
use petri_tools::{load_chunk_file, load_registry, reencode, render, ToolError};

#[derive(Parser)]
#[command(name = "chunk-tool", about = "Inspect, render and re-encode decompressed chunk files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ChunkArgs {
    /// Decompressed chunk file
    file: PathBuf,
    /// Chunk grid x coordinate
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    x: i32,
    /// Chunk grid y coordinate
    #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
    y: i32,
    /// Extra materials RON file, merged after the built-in set
    #[arg(long)]
    materials: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a JSON summary of a chunk
    Info {
        #[command(flatten)]
        chunk: ChunkArgs,
        /// Also write the report to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Reconstruct a chunk's raster and save it as PNG
    Render {
        #[command(flatten)]
        chunk: ChunkArgs,
        /// Output .png path
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Decode and re-encode a chunk, reporting whether the bytes survive
    Reencode {
        #[command(flatten)]
        chunk: ChunkArgs,
        /// Output chunk file path
        #[arg(long, short)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, ToolError> {
    match cli.command {
        Command::Info { chunk, output } => {
            let registry = load_registry(chunk.materials.as_deref())?;
            let decoded = load_chunk_file(&chunk.file, IVec2::new(chunk.x, chunk.y), &registry)?;
            let report = ChunkReport::from_chunk(&decoded);
            for name in report.missing_materials() {
                log::warn!("unrecognized material '{name}'");
            }
            println!("{}", report.to_json()?);
            if let Some(path) = output {
                report::save_report(&path, &report)?;
                log::info!("saved report to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Render { chunk, out } => {
            let registry = load_registry(chunk.materials.as_deref())?;
            let decoded = load_chunk_file(&chunk.file, IVec2::new(chunk.x, chunk.y), &registry)?;
            render::save_png(decoded.raster(), &out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Reencode { chunk, out } => {
            let registry = load_registry(chunk.materials.as_deref())?;
            let bytes = std::fs::read(&chunk.file).map_err(|source| ToolError::Read {
                path: chunk.file.clone(),
                source,
            })?;
            let (output, outcome) = reencode(&bytes, IVec2::new(chunk.x, chunk.y), &registry)?;
            std::fs::write(&out, output)?;

            println!(
                "{} -> {}: {} bytes in, {} bytes out, {}",
                chunk.file.display(),
                out.display(),
                outcome.input_len,
                outcome.output_len,
                if outcome.identical { "identical" } else { "DIFFERENT" }
            );
            if outcome.identical {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
