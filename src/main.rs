use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use huffpack::file::{self, FileReport};
use huffpack::{Codec, CodecConfig};

#[derive(Parser, Debug)]
#[command(name = "huffpack", version, about = "Huffman file compressor with integrity checking")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file, writing <path>.huffman unless -o is given
    Compress {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a file and verify its digest
    Decompress {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CodecConfig::default(),
    };
    let codec = Codec::new(config);

    match cli.command {
        Command::Compress { path, output } => {
            let report = file::compress_file(&path, output.as_deref(), &codec)
                .with_context(|| format!("compressing {}", path.display()))?;
            print_compress_report(&report);
        }
        Command::Decompress { path, output } => {
            let report = file::decompress_file(&path, output.as_deref(), &codec)
                .with_context(|| format!("decompressing {}", path.display()))?;
            println!(
                "Decompression complete. File integrity verified: {} ({} bytes)",
                report.output.display(),
                report.stats.original_size
            );
        }
    }
    Ok(())
}

fn print_compress_report(report: &FileReport) {
    let stats = &report.stats;
    println!("Compressed file saved as: {}", report.output.display());
    println!(
        "  original {} bytes, payload {} bytes, container {} bytes",
        stats.original_size, stats.payload_size, stats.container_size
    );
    println!(
        "  ratio {:.4} (saving {:.2}%), overall {:.4}, entropy {:.3} bits/byte",
        stats.ratio(),
        stats.space_saving() * 100.0,
        stats.overall_ratio(),
        report.entropy
    );
}
