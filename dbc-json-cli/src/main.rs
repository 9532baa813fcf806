//! DBC to JSON CLI Application
//!
//! Command-line front end of the dbc-json library. It adds:
//! - Argument parsing and an optional TOML run configuration
//! - Input validation before any conversion starts
//! - Writing the document to a file or stdout

use anyhow::{Context, Result};
use clap::Parser;
use dbc_json::{
    validate_input_path, ConvertConfig, Converter, ConverterError, Header, TextEncoding,
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

mod config;

use config::AppConfig;

/// DBC to JSON - Convert a CAN database into the AGL signal description
#[derive(Parser, Debug)]
#[command(name = "dbc2json")]
#[command(about = "Convert a DBC file into the AGL low-level CAN JSON description", long_about = None)]
struct Args {
    /// Input DBC file (.dbc)
    #[arg(short = 'i', long = "in", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long = "out", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Version written to the document header [default: 0.0]
    #[arg(short = 'v', long = "version", value_name = "VERSION")]
    version: Option<String>,

    /// Bus name [default: hs]
    #[arg(short, long, value_name = "BUS")]
    bus: Option<String>,

    /// Signals are writable
    #[arg(short, long, visible_alias = "writeable", alias = "mode")]
    writable: bool,

    /// Messages use J1939
    #[arg(short, long)]
    j1939: bool,

    /// Messages use CAN-FD
    #[arg(short, long)]
    fd: bool,

    /// Bit positions are reversed
    #[arg(short, long)]
    reversed: bool,

    /// Byte positions are reversed (big endian)
    #[arg(short = 'e', long)]
    big_endian: bool,

    /// Byte positions are little endian
    #[arg(short, long)]
    little_endian: bool,

    /// Header template replacing the bundled one
    #[arg(long, value_name = "FILE")]
    header: Option<PathBuf>,

    /// Text encoding of the DBC file (utf-8, latin-1)
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<TextEncoding>,

    /// Path to a TOML run configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: --verbose --verbose)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("dbc2json v{}", env!("CARGO_PKG_VERSION"));
    log::debug!(
        "Using dbc-json library v{} (schema v{})",
        dbc_json::VERSION,
        dbc_json::SCHEMA_VERSION
    );

    let app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    let run = RunSettings::resolve(app_config, &args)?;
    convert(&run)
}

/// Settings of one run after merging the config file with the command line
#[derive(Debug)]
struct RunSettings {
    input: PathBuf,
    output: Option<PathBuf>,
    header: Option<PathBuf>,
    encoding: TextEncoding,
    conversion: ConvertConfig,
}

impl RunSettings {
    /// Merge and validate; fails before anything is read or written
    fn resolve(app_config: AppConfig, args: &Args) -> Result<Self> {
        let mut conversion = app_config.conversion;
        if let Some(version) = &args.version {
            conversion.version = version.trim().to_string();
        }
        if let Some(bus) = &args.bus {
            conversion.bus = bus.trim().to_string();
        }
        conversion.writable |= args.writable;
        conversion.j1939 |= args.j1939;
        conversion.fd |= args.fd;
        conversion.reversed |= args.reversed;
        conversion.big_endian |= args.big_endian;
        conversion.little_endian |= args.little_endian;

        let input = args
            .input
            .clone()
            .or(app_config.input.file)
            .ok_or_else(|| {
                ConverterError::ConfigError("missing input file (-i/--in)".to_string())
            })?;

        validate_input_path(&input)?;
        conversion.validate()?;

        Ok(Self {
            input,
            output: args.output.clone().or(app_config.output.file),
            header: args.header.clone().or(app_config.output.header),
            encoding: args.encoding.unwrap_or(app_config.input.encoding),
            conversion,
        })
    }
}

/// Convert the input and write the document
fn convert(run: &RunSettings) -> Result<()> {
    let mut converter = Converter::new(run.conversion.clone())?;

    if let Some(header_path) = &run.header {
        log::info!("Using header template: {:?}", header_path);
        converter = converter.with_header(Header::from_file(header_path)?);
    }

    let document = converter
        .convert_file(&run.input, run.encoding)
        .with_context(|| format!("Failed to convert {:?}", run.input))?;

    match &run.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            document
                .write_to(BufWriter::new(file))
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Finished");
        }
        None => {
            document
                .write_to(io::stdout().lock())
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
