//! Output formatting: text or JSON.
//!
//! Text is for people and may be colored; JSON serializes the outcome
//! types directly for scripts.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;

use mapshare_core::DispatchOutcome;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a dispatch outcome in the chosen format.
pub fn render_outcome(
    format: OutputFormat,
    outcome: &DispatchOutcome,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(outcome_text(outcome, color)),
        OutputFormat::Json => render_json(outcome, false),
        OutputFormat::JsonCompact => render_json(outcome, true),
    }
}

fn outcome_text(outcome: &DispatchOutcome, color: bool) -> String {
    let (mark, line) = match outcome {
        DispatchOutcome::Sent { device_ids } => ("✓", format!("Sent to {}", device_ids.join(", "))),
        DispatchOutcome::NoValidTargets => ("✗", "No valid device targets".to_owned()),
        DispatchOutcome::TransportFailure { reason, .. } => ("✗", format!("Send failed: {reason}")),
    };
    if !color {
        return format!("{mark} {line}");
    }
    if outcome.is_sent() {
        format!("{} {line}", mark.green().bold())
    } else {
        format!("{} {line}", mark.red().bold())
    }
}

pub fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) -> Result<(), CliError> {
    if quiet || output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_lists_device_ids() {
        let outcome = DispatchOutcome::Sent {
            device_ids: vec!["99".into(), "12345".into()],
        };
        let text = render_outcome(OutputFormat::Text, &outcome, false).unwrap();
        assert_eq!(text, "✓ Sent to 99, 12345");
    }

    #[test]
    fn compact_json_is_tagged() {
        let outcome = DispatchOutcome::Sent {
            device_ids: vec!["99".into()],
        };
        let json = render_outcome(OutputFormat::JsonCompact, &outcome, false).unwrap();
        assert_eq!(json, r#"{"outcome":"sent","device_ids":["99"]}"#);
    }
}
