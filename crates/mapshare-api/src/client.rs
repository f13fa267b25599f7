// MapShare HTTP client
//
// Wraps `reqwest::Client` with MapShare URL construction for a single map
// link. The message flow itself lives in `messaging.rs` as inherent methods
// to keep this module focused on transport mechanics.

use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Public root of the MapShare web service.
pub const DEFAULT_BASE_URL: &str = "https://share.garmin.com/";

/// Parsed [`DEFAULT_BASE_URL`].
pub fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

/// Raw HTTP client for one MapShare link.
///
/// Every URL it produces is rooted at `{base_url}{link_name}/`, which is
/// also the public map page used to establish a session.
pub struct MapShareClient {
    http: reqwest::Client,
    base_url: Url,
    link_name: String,
}

impl MapShareClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, link_name: String, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, link_name))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, link_name: String) -> Self {
        Self {
            http,
            base_url,
            link_name,
        }
    }

    pub fn link_name(&self) -> &str {
        &self.link_name
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// The public map page: `{base}{link}/`.
    pub fn map_page_url(&self) -> Result<Url, Error> {
        self.link_url(&[""])
    }

    /// The message endpoint: `{base}{link}/Map/SendMessageToDevices`.
    pub fn send_message_url(&self) -> Result<Url, Error> {
        self.link_url(&["Map", "SendMessageToDevices"])
    }

    /// Scheme, host and port of the base URL, without a trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Append the link name and `rest` as path segments of the base URL.
    ///
    /// Segments are percent-encoded, so link names never escape the path.
    fn link_url(&self, rest: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(&self.link_name)
            .extend(rest);
        Ok(url)
    }
}
