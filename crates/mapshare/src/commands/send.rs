//! `mapshare send`: targets are device keys or raw device IDs.

use mapshare_core::{Coordinator, DispatchRequest};

use crate::cli::{GlobalOpts, SendArgs};
use crate::error::CliError;

pub async fn handle(
    args: SendArgs,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut request = DispatchRequest::new(args.targets, args.message);
    if let Some(from) = args.from_addr {
        request = request.with_sender(from);
    }

    tracing::debug!(targets = ?request.targets, "sending message");
    let outcome = coordinator.send_message(request).await?;
    super::report(outcome, global)
}
