//! JSON rendering of command results.

use std::io::Write;

use serde::Serialize;
use wayfarer_core::WriteOutcome;

use crate::CliError;

/// Result of a mutation that may have been a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OutcomeReport {
    pub(crate) written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
}

impl From<WriteOutcome> for OutcomeReport {
    fn from(outcome: WriteOutcome) -> Self {
        match outcome {
            WriteOutcome::Written => Self {
                written: true,
                reason: None,
            },
            WriteOutcome::Unchanged(reason) => Self {
                written: false,
                reason: Some(reason.to_string()),
            },
        }
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

pub(crate) fn write_outcome(writer: &mut dyn Write, outcome: WriteOutcome) -> Result<(), CliError> {
    write_json(writer, &OutcomeReport::from(outcome))
}

pub(crate) fn write_text(writer: &mut dyn Write, text: &str) -> Result<(), CliError> {
    writer
        .write_all(text.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
