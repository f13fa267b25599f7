//! Clap derive structures for the `mapshare` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mapshare -- send messages to Garmin inReach devices through MapShare
#[derive(Debug, Parser)]
#[command(
    name = "mapshare",
    version,
    about = "Send messages to Garmin inReach devices through a MapShare link",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Link profile to use
    #[arg(long, short = 'p', env = "MAPSHARE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "MAPSHARE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// MapShare link name (overrides profile)
    #[arg(long, short = 'l', env = "MAPSHARE_LINK", global = true)]
    pub link: Option<String>,

    /// MapShare service root (overrides profile)
    #[arg(long, env = "MAPSHARE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MAPSHARE_OUTPUT",
        default_value = "text",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MAPSHARE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a message to device keys or raw device IDs
    Send(SendArgs),

    /// Send a notification to devices by key or name
    Notify(NotifyArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Message text
    pub message: String,

    /// Device key or raw device ID (repeatable)
    #[arg(long = "to", short = 't', required = true, num_args = 1..)]
    pub targets: Vec<String>,

    /// Sender label shown on the device
    #[arg(long = "from")]
    pub from_addr: Option<String>,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Message text
    pub message: String,

    /// Device key, name or display name (repeatable; default: every device)
    #[arg(long = "target", short = 't')]
    pub targets: Vec<String>,

    /// Sender label shown on the device
    #[arg(long = "from")]
    pub from_addr: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (passwords masked)
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
