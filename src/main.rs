use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use sniff_fs::{DetectionConfig, EncodingError, ReadConfig, detect_file, is_binary_file, read_file_text};
use tracing::{Level, debug, error};

/// Detect the text encoding of files.
#[derive(Debug, Parser)]
#[command(name = "sniff", version, about)]
struct Cli {
    /// Files to inspect
    paths: Vec<PathBuf>,

    /// Print the decoded contents instead of the detected encoding.
    /// With several files each one is preceded by a `==> path <==` header.
    #[arg(long, conflicts_with = "binary")]
    text: bool,

    /// Only report whether each file looks binary
    #[arg(long)]
    binary: bool,

    /// Bytes examined when there is no byte-order mark
    #[arg(long, value_name = "BYTES", default_value_t = sniff_fs::DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Write one file's text, headed by `==> path <==` when several are printed.
fn write_text<W: Write>(out: &mut W, path: &Path, text: &str, headers: bool, first: bool) -> io::Result<()> {
    if headers {
        if !first {
            writeln!(out)?;
        }
        writeln!(out, "==> {} <==", path.display())?;
    }
    write!(out, "{}", text)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if cli.paths.is_empty() {
        return Err(EncodingError::MissingArgument("path").into());
    }

    let detection_config = DetectionConfig::default().with_sample_size(cli.sample_size);
    let read_config = ReadConfig {
        detection: detection_config,
        ..ReadConfig::default()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;
    let headers = cli.text && cli.paths.len() > 1;

    for (i, path) in cli.paths.iter().enumerate() {
        debug!(path = %path.display(), "inspecting");
        let result = if cli.text {
            read_file_text(path, &read_config)
                .map(|decoded| write_text(&mut out, path, &decoded.text, headers, i == 0))
        } else if cli.binary {
            is_binary_file(path, &detection_config).map(|binary| {
                writeln!(out, "{}: {}", path.display(), if binary { "binary" } else { "text" })
            })
        } else {
            detect_file(path, &detection_config).map(|detection| {
                let binary = detection.is_fallback();
                writeln!(
                    out,
                    "{}: {} (code page {}){}{}",
                    path.display(),
                    detection.encoding,
                    detection.encoding.code_page(),
                    if detection.had_bom { ", BOM" } else { "" },
                    if binary { ", binary" } else { "" },
                )
            })
        };

        match result {
            Ok(written) => written?,
            Err(err) => {
                error!(path = %path.display(), "{}", err);
                failed = true;
            }
        }
    }

    out.flush()?;
    if failed {
        std::process::exit(1);
    }
    Ok(())
}
