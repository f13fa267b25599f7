//! Command handlers.

pub mod config_cmd;
pub mod notify;
pub mod send;

use std::sync::Arc;

use mapshare_core::{Coordinator, DeviceFetcher, DispatchOutcome};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config;
use crate::devices::ProfileDevices;
use crate::error::CliError;
use crate::output;

/// Build a coordinator for the active link and load its device table.
pub async fn connect(global: &GlobalOpts) -> Result<Coordinator, CliError> {
    let link = config::resolve_link(global)?;
    tracing::debug!(
        link = %link.config.link_name,
        devices = link.devices.len(),
        "resolved link"
    );

    let fetcher: Arc<dyn DeviceFetcher> = Arc::new(ProfileDevices::new(link.devices));
    let coordinator = Coordinator::new(link.config, fetcher)?;
    coordinator.refresh().await?.into_result()?;
    Ok(coordinator)
}

/// Print a dispatch outcome and turn failures into errors.
///
/// JSON output always carries the outcome; text output prints successes
/// and leaves failures to the error report.
fn report(outcome: DispatchOutcome, global: &GlobalOpts) -> Result<(), CliError> {
    if outcome.is_sent() || !matches!(global.output, OutputFormat::Text) {
        let color = output::should_color(global.color);
        let rendered = output::render_outcome(global.output, &outcome, color)?;
        output::print_output(&rendered, global.quiet)?;
    }
    outcome.into_result()?;
    Ok(())
}
