use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

use huffpack::{Container, HuffmanEncoder};

#[derive(Subcommand)]
enum Command {
    /// Compresses INPUT into a container written to OUTPUT
    #[clap(visible_alias = "c")]
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Decompress the result in memory and compare it with the input before writing
        #[arg(long, default_value_t = false)]
        verify: bool,
    },
    /// Restores the bytes stored in the container INPUT into OUTPUT
    #[clap(visible_alias = "x")]
    Decompress { input: PathBuf, output: PathBuf },
    /// Prints the header of a container, or the code statistics of a raw file
    Inspect {
        input: PathBuf,
        /// Treat INPUT as uncompressed data
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, infer_subcommands = true)]
/// Static Huffman compressor.
struct Conf {
    #[command(subcommand)]
    command: Command,

    /// Print sizes after compressing or decompressing; repeat to log library
    /// debug (-vv) and trace (-vvv) records to stderr
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

impl Conf {
    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 | 1 => LevelFilter::Warn,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };
            eprintln!("{} (in {}): {}", record.level(), target, record.args());
        }
    }

    fn flush(&self) {}
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {}", path.display()))
}

fn write(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))
}

fn ratio(from: usize, to: usize) -> f64 {
    if from == 0 {
        return 0.0;
    }
    to as f64 * 100.0 / from as f64
}

fn compress(conf: &Conf, input: &Path, output: &Path, verify: bool) -> Result<()> {
    let data = read(input)?;
    let packed = huffpack::compress(&data)
        .with_context(|| format!("cannot compress {}", input.display()))?;
    if verify && huffpack::decompress(&packed)? != data {
        bail!("verification failed: decompressed data differs from {}", input.display());
    }
    write(output, &packed)?;
    if conf.verbose > 0 {
        println!(
            "{}: {} -> {} bytes ({:.1}%)",
            input.display(),
            data.len(),
            packed.len(),
            ratio(data.len(), packed.len())
        );
    }
    Ok(())
}

fn decompress(conf: &Conf, input: &Path, output: &Path) -> Result<()> {
    let packed = read(input)?;
    // The output file is created only once the whole container has decoded.
    let data = huffpack::decompress(&packed)
        .with_context(|| format!("cannot decompress {}", input.display()))?;
    write(output, &data)?;
    if conf.verbose > 0 {
        println!("{}: {} -> {} bytes", input.display(), packed.len(), data.len());
    }
    Ok(())
}

fn inspect_raw(data: &[u8]) -> Result<()> {
    let encoder = HuffmanEncoder::from_bytes(data)?;
    let frequencies = encoder.frequencies();
    let payload = encoder.encoded_len();
    println!("input bytes:     {}", data.len());
    println!("distinct bytes:  {}", frequencies.distinct());
    println!("entropy:         {:.4} bits/byte", frequencies.entropy());
    println!("tree depth:      {}", encoder.tree().depth());
    println!("longest code:    {} bits", encoder.codes().max_len());
    println!("payload:         {payload} bits");
    if !data.is_empty() {
        println!("average code:    {:.4} bits/byte", payload as f64 / data.len() as f64);
    }
    Ok(())
}

fn inspect_container(packed: &[u8]) -> Result<()> {
    let container = Container::from_bytes(packed)?;
    let tree = container.tree().to_tree()?;
    println!("container bytes: {}", packed.len());
    println!("shape:           {} bits", container.tree().shape().len());
    println!("symbols:         {}", container.tree().symbols().len());
    println!("tree depth:      {}", tree.depth());
    println!("payload:         {} bits", container.payload().len());
    Ok(())
}

fn main() -> Result<()> {
    let conf = Conf::parse();
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(conf.log_level());
    }
    match &conf.command {
        Command::Compress {
            input,
            output,
            verify,
        } => compress(&conf, input, output, *verify),
        Command::Decompress { input, output } => decompress(&conf, input, output),
        Command::Inspect { input, raw } => {
            let bytes = read(input)?;
            if *raw {
                inspect_raw(&bytes)
            } else {
                inspect_container(&bytes)
                    .with_context(|| format!("{} is not a valid container", input.display()))
            }
        }
    }
}
