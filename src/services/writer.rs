use std::io::Write;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Assignment, Occupant, Placement};

/// Rendering used for the final assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `N0: H5(161) H11(154) ...`, one line per neighborhood
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// Order of occupants within each neighborhood
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OccupantOrder {
    /// Highest fit score first
    #[default]
    Score,
    /// The order occupants were left in by the matcher
    Arrival,
}

/// Errors that can occur while emitting the assignment
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Renders an [`Assignment`] to any writer
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter {
    format: OutputFormat,
    order: OccupantOrder,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, order: OccupantOrder) -> Self {
        Self { format, order }
    }

    pub fn write<W: Write>(&self, out: &mut W, assignment: &Assignment) -> Result<(), WriteError> {
        let ordered = order_placements(assignment, self.order);

        match self.format {
            OutputFormat::Text => {
                for placement in &ordered.neighborhoods {
                    writeln!(out, "{}", render_line(placement))?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &ordered)?;
                writeln!(out)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    pub fn render(&self, assignment: &Assignment) -> Result<String, WriteError> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, assignment)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// `<neighborhood>: <homeowner>(<score>) <homeowner>(<score>) ...`
pub fn render_line(placement: &Placement) -> String {
    let occupants: Vec<String> = placement
        .occupants
        .iter()
        .map(|Occupant { homeowner, score }| format!("{}({})", homeowner, score))
        .collect();

    format!("{}: {}", placement.neighborhood, occupants.join(" "))
}

fn order_placements(assignment: &Assignment, order: OccupantOrder) -> Assignment {
    let mut ordered = assignment.clone();
    if order == OccupantOrder::Score {
        for placement in &mut ordered.neighborhoods {
            placement.occupants = placement.ranked_occupants();
        }
    }
    ordered
}
