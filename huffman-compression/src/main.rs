use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use huffman_compression::{compress_file, uncompress_file, CompressOptions};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.compress {
        let options = CompressOptions { force: args.force };
        compress_file(&args.input, &args.output, options).with_context(|| {
            format!(
                "failed to compress {} into {}",
                args.input.display(),
                args.output.display()
            )
        })?;
    } else {
        uncompress_file(&args.input, &args.output).with_context(|| {
            format!(
                "failed to uncompress {} into {}",
                args.input.display(),
                args.output.display()
            )
        })?;
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(version, about = "Static Huffman file compression", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["compress", "uncompress"])))]
struct Args {
    /// Compress <INPUT> into <OUTPUT>
    #[arg(short)]
    compress: bool,
    /// Uncompress <INPUT> into <OUTPUT>
    #[arg(short)]
    uncompress: bool,
    /// Print frequencies, tree shape, codes and sizes
    #[arg(short)]
    verbose: bool,
    /// Compress even when the output would not be smaller
    #[arg(short)]
    force: bool,
    input: PathBuf,
    output: PathBuf,
}
