use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xxhash_rust::xxh3::xxh3_64;

use flate_core::{FlateConfig, TrailingData};
use flate_zlib::runtime;

// ── CLI definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "flate",
    about = "Compress and decompress raw DEFLATE streams through reusable codec contexts",
    version
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,
    #[command(subcommand)]
    command: Commands,
}

// Context settings shared by every subcommand.
#[derive(Args)]
struct Settings {
    /// JSON file with context settings; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Transfer buffer size in bytes
    #[arg(long, global = true)]
    chunk_size: Option<usize>,
    /// Compressor window size as a power of two (9–15)
    #[arg(long, global = true)]
    window_bits: Option<u8>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a raw DEFLATE stream
    Compress {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Destination file ("-" writes stdout)
        output: PathBuf,
        /// Preset dictionary file
        #[arg(short, long)]
        dict: Option<PathBuf>,
        /// Compression level (0–9, -1 for the codec default)
        #[arg(short, long, allow_negative_numbers = true)]
        level: Option<i32>,
    },
    /// Decompress a raw DEFLATE stream
    Decompress {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Destination file ("-" writes stdout)
        output: PathBuf,
        /// Preset dictionary file used when compressing
        #[arg(short, long)]
        dict: Option<PathBuf>,
        /// Fail when bytes follow the end of the stream
        #[arg(long)]
        reject_trailing: bool,
    },
    /// Compress and decompress a file repeatedly through the same contexts
    ///
    /// Verifies that every round trip reproduces the input and reports
    /// ratio and throughput.
    Roundtrip {
        /// Source file ("-" reads stdin)
        input: PathBuf,
        /// Preset dictionary file
        #[arg(short, long)]
        dict: Option<PathBuf>,
        /// Compression level (0–9, -1 for the codec default)
        #[arg(short, long, allow_negative_numbers = true)]
        level: Option<i32>,
        /// Number of round trips
        #[arg(short = 'n', long, default_value_t = 10)]
        iterations: u32,
    },
}

// ── Helpers ────────────────────────────────────────────────────────────────

fn load_config(settings: &Settings, command: &Commands) -> anyhow::Result<FlateConfig> {
    let mut config = match &settings.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {:?}", path))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config file {:?}", path))?
        }
        None => FlateConfig::default(),
    };
    if let Some(chunk_size) = settings.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(window_bits) = settings.window_bits {
        config.window_bits = window_bits;
    }
    if let Commands::Decompress {
        reject_trailing: true,
        ..
    } = command
    {
        config.trailing_data = TrailingData::Reject;
    }
    Ok(config)
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path.to_str() == Some("-") {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("reading input file {:?}", path))
    }
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if path.to_str() == Some("-") {
        let mut out = io::stdout().lock();
        out.write_all(data)?;
        out.flush()?;
    } else {
        let mut file =
            File::create(path).with_context(|| format!("creating output file {:?}", path))?;
        file.write_all(data)?;
    }
    Ok(())
}

fn read_dict(path: Option<&PathBuf>) -> anyhow::Result<Option<Vec<u8>>> {
    path.map(|p| fs::read(p).with_context(|| format!("reading dictionary {:?}", p)))
        .transpose()
}

fn human_bytes(n: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut v = n as f64;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.2} {}", v, UNITS[unit])
    }
}

// ── Subcommand implementations ─────────────────────────────────────────────

fn run_compress(
    input: PathBuf,
    output: PathBuf,
    dict: Option<PathBuf>,
    level: Option<i32>,
) -> anyhow::Result<()> {
    let raw = read_input(&input)?;
    let dict = read_dict(dict.as_ref())?;

    let t0 = Instant::now();
    let compressed = runtime::compress(Some(&raw), dict.as_deref(), level)?
        .context("compress returned no result")?;
    let elapsed = t0.elapsed();

    write_output(&output, &compressed)?;

    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed.len() as u64));
    eprintln!(
        "  ratio       : {:.2}x",
        raw.len() as f64 / compressed.len().max(1) as f64
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_decompress(input: PathBuf, output: PathBuf, dict: Option<PathBuf>) -> anyhow::Result<()> {
    let compressed = read_input(&input)?;
    let dict = read_dict(dict.as_ref())?;

    let t0 = Instant::now();
    let raw = runtime::decompress(Some(&compressed), dict.as_deref())?
        .context("decompress returned no result")?;
    let elapsed = t0.elapsed();

    write_output(&output, &raw)?;

    eprintln!("  compressed  : {}", human_bytes(compressed.len() as u64));
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_roundtrip(
    input: PathBuf,
    dict: Option<PathBuf>,
    level: Option<i32>,
    iterations: u32,
) -> anyhow::Result<()> {
    let raw = read_input(&input)?;
    let dict = read_dict(dict.as_ref())?;
    let expected = xxh3_64(&raw);

    let mut compressed_len = 0usize;
    let t0 = Instant::now();
    for i in 0..iterations {
        let compressed = runtime::compress(Some(&raw), dict.as_deref(), level)?
            .context("compress returned no result")?;
        let restored = runtime::decompress(Some(&compressed), dict.as_deref())?
            .context("decompress returned no result")?;
        let actual = xxh3_64(&restored);
        if actual != expected {
            anyhow::bail!(
                "round trip {} mismatch: expected xxh3 {:016x}, got {:016x}",
                i,
                expected,
                actual
            );
        }
        compressed_len = compressed.len();
    }
    let elapsed = t0.elapsed();
    let processed = raw.len() as u64 * iterations as u64;

    eprintln!("  iterations  : {}", iterations);
    eprintln!("  xxh3        : {:016x}", expected);
    eprintln!("  raw size    : {}", human_bytes(raw.len() as u64));
    eprintln!("  compressed  : {}", human_bytes(compressed_len as u64));
    eprintln!(
        "  ratio       : {:.2}x",
        raw.len() as f64 / compressed_len.max(1) as f64
    );
    eprintln!(
        "  throughput  : {}/s",
        human_bytes((processed as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64)
    );
    eprintln!("  elapsed     : {:.3}s", elapsed.as_secs_f64());
    Ok(())
}

// ── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.settings, &cli.command)?;
    debug!(?config, "starting");

    runtime::on_load(&config).context("initializing codec contexts")?;

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            dict,
            level,
        } => run_compress(input, output, dict, level),
        Commands::Decompress {
            input, output, dict, ..
        } => run_decompress(input, output, dict),
        Commands::Roundtrip {
            input,
            dict,
            level,
            iterations,
        } => run_roundtrip(input, dict, level, iterations),
    };

    runtime::on_unload();
    result
}
