// MapShare messaging
//
// Two-phase send: fetch the public map page to obtain session cookies,
// then POST the message form with those cookies attached. A fresh session
// is bootstrapped for every send; nothing is cached between calls.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, ORIGIN, REFERER, SET_COOKIE};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::client::MapShareClient;
use crate::error::Error;

/// Sender label used when the caller does not supply one.
pub const DEFAULT_SENDER: &str = "HomeAssistant";

const ACCEPT_AJAX: &str = "application/json, text/javascript, */*; q=0.01";
const BODY_PREVIEW_CHARS: usize = 200;

/// Form body of `Map/SendMessageToDevices`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageForm<'a> {
    device_ids: String,
    message_text: &'a str,
    from_addr: &'a str,
}

/// Cookie jar filled from one bootstrap response.
///
/// Expiry and path scoping follow the `Set-Cookie` attributes, so a cookie
/// the server cleared or scoped to another link is never sent back.
#[derive(Debug, Default)]
pub struct Session {
    jar: Jar,
}

impl Session {
    fn from_response(resp: &reqwest::Response) -> Self {
        Self::from_set_cookie(resp.headers(), resp.url())
    }

    fn from_set_cookie(headers: &HeaderMap, url: &Url) -> Self {
        let jar = Jar::default();
        jar.set_cookies(&mut headers.get_all(SET_COOKIE).iter(), url);
        Self { jar }
    }

    /// `Cookie` header value for a request to `url`, if any cookie applies.
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

impl MapShareClient {
    /// Fetch the public map page and capture the cookies it sets.
    ///
    /// No credentials are sent. A non-2xx answer is reported as
    /// [`Error::Bootstrap`].
    pub async fn bootstrap_session(&self) -> Result<Session, Error> {
        let url = self.map_page_url()?;
        debug!("GET {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Bootstrap {
                status: status.as_u16(),
                body: body_preview(resp).await,
            });
        }

        let session = Session::from_response(&resp);
        debug!("session bootstrapped");
        Ok(session)
    }

    /// POST a message to `device_ids` using an existing session.
    pub async fn post_message(
        &self,
        session: &Session,
        device_ids: &[String],
        message: &str,
        from_addr: &str,
    ) -> Result<(), Error> {
        let url = self.send_message_url()?;
        let referer = self.map_page_url()?;
        let cookie = session.cookie_header(&url);
        debug!("POST {}", url);

        let form = SendMessageForm {
            device_ids: device_ids.join(","),
            message_text: message,
            from_addr,
        };

        let mut request = self
            .http()
            .post(url)
            .header(ACCEPT, ACCEPT_AJAX)
            .header("x-requested-with", "XMLHttpRequest")
            .header(ORIGIN, self.origin())
            .header(REFERER, referer.as_str())
            .form(&form);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: body_preview(resp).await,
            });
        }
        Ok(())
    }

    /// Bootstrap a session, then send `message` to every ID in `device_ids`.
    ///
    /// Nothing is sent when `device_ids` is empty or the bootstrap fails.
    pub async fn send_message_to_devices(
        &self,
        device_ids: &[String],
        message: &str,
        from_addr: &str,
    ) -> Result<(), Error> {
        if device_ids.is_empty() {
            return Err(Error::NoDeviceIds);
        }

        let session = self.bootstrap_session().await?;
        self.post_message(&session, device_ids, message, from_addr)
            .await?;

        info!(link = self.link_name(), ?device_ids, "message sent");
        Ok(())
    }
}

async fn body_preview(resp: reqwest::Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://share.garmin.com/TrailCrew/";
    const SEND_URL: &str = "https://share.garmin.com/TrailCrew/Map/SendMessageToDevices";

    fn session_from(set_cookies: &[&str], page: &str) -> Session {
        let mut headers = HeaderMap::new();
        for value in set_cookies {
            headers.append(SET_COOKIE, HeaderValue::from_str(value).unwrap());
        }
        Session::from_set_cookie(&headers, &Url::parse(page).unwrap())
    }

    #[test]
    fn empty_session_has_no_cookie_header() {
        let url = Url::parse(PAGE_URL).unwrap();
        assert_eq!(Session::default().cookie_header(&url), None);
    }

    #[test]
    fn cookie_header_joins_live_cookies() {
        let session = session_from(
            &[
                "ASP.NET_SessionId=abc; path=/; HttpOnly",
                "BrowserCheck=1; path=/",
            ],
            PAGE_URL,
        );
        let send = Url::parse(SEND_URL).unwrap();
        let header = session.cookie_header(&send).unwrap();
        let mut pairs: Vec<&str> = header.to_str().unwrap().split("; ").collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec!["ASP.NET_SessionId=abc", "BrowserCheck=1"]);
    }

    #[test]
    fn expired_and_foreign_path_cookies_are_dropped() {
        let session = session_from(
            &[
                "live=1; Path=/",
                "deleted=; Max-Age=0; Path=/",
                "elsewhere=2; Path=/OtherLink/",
            ],
            PAGE_URL,
        );
        let send = Url::parse(SEND_URL).unwrap();
        assert_eq!(
            session.cookie_header(&send).unwrap().to_str().unwrap(),
            "live=1"
        );
    }
}
