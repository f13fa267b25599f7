//! `mapshare notify`: targets are matched by key, name or display name.

use mapshare_core::{Coordinator, Notifier};

use crate::cli::{GlobalOpts, NotifyArgs};
use crate::error::CliError;

pub async fn handle(
    args: NotifyArgs,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let notifier = Notifier::new(coordinator.clone());
    let outcome = notifier
        .notify(&args.message, &args.targets, args.from_addr.as_deref())
        .await?;
    super::report(outcome, global)
}
