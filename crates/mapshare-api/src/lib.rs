// mapshare-api: Async Rust client for the Garmin MapShare web service

pub mod client;
pub mod error;
pub mod messaging;
pub mod transport;

pub use client::{DEFAULT_BASE_URL, MapShareClient, default_base_url};
pub use error::Error;
pub use messaging::{DEFAULT_SENDER, Session};
pub use transport::TransportConfig;
