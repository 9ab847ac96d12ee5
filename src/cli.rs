use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use config::ConfigError;
use tracing::info;

use crate::config::Settings;
use crate::core::{CapacityPolicy, Matcher};
use crate::error::AppError;
use crate::models::Assignment;
use crate::services::{InputReader, OccupantOrder, OutputFormat, OutputWriter};

const LONG_ABOUT: &str = "\
Match homeowners with neighborhoods based on preferences

The input data should contain information on both homeowners and neighborhoods with one record per line

The data format should be as follows:

for a Neighborhood
N N0 E:7 W:7 R:10

for a Homeowner
H H0 E:3 W:9 R:2 N2>N0>N1

The assignments of Homeowner to Neighborhood will be output as follows
N0: H5(161) H11(154) H2(128) H4(122)";

#[derive(Parser, Debug, Default)]
#[command(
    name = "neighborhood-match",
    about = "Match homeowners with neighborhoods based on fit and preferences",
    long_about = LONG_ABOUT,
    version
)]
pub struct Cli {
    /// Input file (default: standard input)
    pub input: Option<PathBuf>,
    /// Output file (default: standard output)
    pub output: Option<PathBuf>,
    /// Read settings from this file instead of config/default.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override how neighborhood capacity is derived
    #[arg(long, value_enum)]
    pub capacity: Option<CapacityPolicy>,
    /// Override the order occupants are listed in
    #[arg(long, value_enum)]
    pub order: Option<OccupantOrder>,
    /// Override the output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Layered settings with command-line overrides applied last
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from(path)?,
            None => Settings::load()?,
        };

        if let Some(capacity) = self.capacity {
            settings.matching.capacity_policy = capacity;
        }
        if let Some(order) = self.order {
            settings.output.order = order;
        }
        if let Some(format) = self.format {
            settings.output.format = format;
        }

        Ok(settings)
    }
}

/// Read, match and write using the files named on the command line
pub fn run(cli: &Cli, settings: &Settings) -> Result<Assignment, AppError> {
    let assignment = match stream_path(cli.input.as_deref()) {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| AppError::io(format!("failed to open {}", path.display()), e))?;
            match_records(BufReader::new(file), settings)?
        }
        None => match_records(io::stdin().lock(), settings)?,
    };

    let writer = output_writer(settings);
    match stream_path(cli.output.as_deref()) {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| AppError::io(format!("failed to create {}", path.display()), e))?;
            writer.write(&mut BufWriter::new(file), &assignment)?;
        }
        None => writer.write(&mut io::stdout().lock(), &assignment)?,
    }

    Ok(assignment)
}

/// Parse records from `reader` and assign every homeowner
pub fn match_records<R: BufRead>(reader: R, settings: &Settings) -> Result<Assignment, AppError> {
    let input = InputReader::new(settings.matching.require_complete_rankings).parse(reader)?;
    let matcher = Matcher::new(settings.matching.capacity_policy);

    info!("Matching with {:?} capacity policy", matcher.policy());
    Ok(matcher.assign(&input)?)
}

/// Full pipeline over in-memory streams
pub fn run_streams<R: BufRead, W: Write>(
    reader: R,
    out: &mut W,
    settings: &Settings,
) -> Result<Assignment, AppError> {
    let assignment = match_records(reader, settings)?;
    output_writer(settings).write(out, &assignment)?;
    Ok(assignment)
}

fn output_writer(settings: &Settings) -> OutputWriter {
    OutputWriter::new(settings.output.format, settings.output.order)
}

/// `None` for standard streams (no path, or `-`)
fn stream_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| *p != Path::new("-"))
}
