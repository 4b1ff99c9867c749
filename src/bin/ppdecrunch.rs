use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use powerpacker::{Container, Signature, decompress_with_limit};
use tracing_subscriber::EnvFilter;

/// Decrunch Amiga PowerPacker (PP20) files.
#[derive(Parser)]
#[command(name = "ppdecrunch", version)]
struct Args {
    /// Crunched input file
    input: PathBuf,
    /// Where to write the decrunched data (defaults to `<input>.out`)
    output: Option<PathBuf>,
    /// Refuse files that decrunch to more than this many bytes
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    limit: usize,
    /// Only print the container header
    #[arg(long)]
    info: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.info {
        return print_info(&args);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("out"));

    let data = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let plain = match Signature::from_bytes(&data) {
        Some(_) => decompress_with_limit(&data, args.limit)
            .with_context(|| format!("decrunching {}", args.input.display()))?,
        None => {
            tracing::info!("input is not PowerPacker data, copying it unchanged");
            data
        }
    };

    fs::write(&output_path, &plain)
        .with_context(|| format!("writing {}", output_path.display()))?;
    tracing::info!(bytes = plain.len(), path = %output_path.display(), "wrote output");
    Ok(())
}

fn print_info(args: &Args) -> Result<()> {
    let data = fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let Some(signature) = Signature::from_bytes(&data) else {
        bail!("{} is not a PowerPacker file", args.input.display());
    };
    println!("signature:   {signature} (0x{:08X})", signature.magic());
    println!("efficiency:  {}", signature.efficiency());
    println!("crunched:    {} bytes", data.len());

    let container = Container::parse(&data)?;
    println!("decrunched:  {} bytes", container.decrunched_len);
    println!("offset bits: {:?}", container.offset_lens);
    println!("skip bits:   {}", container.skip_bits);
    Ok(())
}
