//! `orbitview` binary: opens the calibrated viewport in a window.

use std::{io::Write, path::PathBuf};

use clap::Parser;
use orbitview::{
    calibration::CalibrationRecord, error::ViewportError,
    navigation::JsonLinesChannel, options::Options, Viewer,
};

/// Calibrated surface viewport. Navigation requests are written to stdout
/// as one JSON object per line.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// TOML options file (missing fields use defaults)
    #[arg(long)]
    options: Option<PathBuf>,

    /// JSON calibration record (defaults to the reference record)
    #[arg(long)]
    calibration: Option<PathBuf>,

    /// Print the options JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

fn main() -> Result<(), ViewportError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    if args.print_schema {
        let schema = serde_json::to_string_pretty(&Options::json_schema())
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{schema}")?;
        return Ok(());
    }

    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let calibration = match &args.calibration {
        Some(path) => CalibrationRecord::load(path)?,
        None => CalibrationRecord::reference(),
    };
    log::info!(
        "viewport {}x{} at ({}, {})",
        options.viewport.width,
        options.viewport.height,
        options.viewport.origin[0],
        options.viewport.origin[1]
    );

    Viewer::builder(JsonLinesChannel::new(std::io::stdout()))
        .with_options(options)
        .with_calibration(calibration)
        .build()
        .run()
}
