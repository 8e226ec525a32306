//! Generic JSON data loader.
//!
//! Requests carry `Content-Type: application/json` and the CSRF token from
//! the `csrftoken` cookie. The response's `html` (or `message`) replaces the
//! container's content whatever the HTTP status. Transport and decoding
//! failures become a generic danger banner; nothing is retried.

use std::borrow::Cow;

use anyhow::{Context as _, Result};
use html::NodeId;
use log::{debug, error};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::alerts::{AlertPresenter, Severity};
use crate::state::HtmlPage;
use crate::window::Window;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "x-csrftoken";
pub const LOAD_FAILED: &str = "Error al cargar los datos";
const LOADED: &str = "Datos cargados";

/// Value of cookie `name` in a `document.cookie` style string, percent-decoded.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|cookie| {
        let raw = cookie.trim().strip_prefix(name)?.strip_prefix('=')?;
        Some(urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned))
    })
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct LoadResponse {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: bool,
}

impl LoadResponse {
    /// Markup placed in the container: `html`, then `message`, then a
    /// generic notice.
    pub fn content(&self) -> &str {
        self.html
            .as_deref()
            .filter(|html| !html.is_empty())
            .or_else(|| self.message.as_deref().filter(|message| !message.is_empty()))
            .unwrap_or(LOADED)
    }
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub method: Method,
    /// Serialized as the JSON request body.
    pub data: Option<Value>,
    /// Extra headers, applied after the defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            data: None,
            headers: Vec::new(),
        }
    }
}

pub struct DataLoader {
    client: Client,
    alerts: AlertPresenter,
}

impl DataLoader {
    pub fn new(alerts: AlertPresenter) -> Self {
        Self::with_client(Client::new(), alerts)
    }

    pub const fn with_client(client: Client, alerts: AlertPresenter) -> Self {
        Self { client, alerts }
    }

    fn headers(csrf_token: Option<&str>, options: &LoadOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = csrf_token {
            headers.insert(
                HeaderName::from_static(CSRF_HEADER),
                HeaderValue::from_str(token).context("CSRF token is not a valid header value")?,
            );
        }
        for (name, value) in &options.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).with_context(|| format!("bad header name {name:?}"))?,
                HeaderValue::from_str(value).with_context(|| format!("bad value for header {name:?}"))?,
            );
        }
        Ok(headers)
    }

    /// Perform the request and decode the JSON answer, whatever its status.
    ///
    /// # Errors
    /// Transport failures and bodies that are not the expected JSON.
    pub async fn fetch(&self, url: &Url, csrf_token: Option<&str>, options: &LoadOptions) -> Result<LoadResponse> {
        let mut request = self
            .client
            .request(options.method.clone(), url.clone())
            .headers(Self::headers(csrf_token, options)?);
        if let Some(data) = &options.data {
            request = request.body(serde_json::to_string(data)?);
        }
        debug!("{} {url}", options.method);
        let response = request
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            debug!("{url} answered {status}");
        }
        response
            .json::<LoadResponse>()
            .await
            .with_context(|| format!("response from {url} ({status}) is not valid JSON"))
    }

    /// Render the outcome of a load into the page.
    ///
    /// # Errors
    /// Returns an error only if the page itself cannot be updated.
    pub fn apply(&self, window: &mut Window, container: Option<NodeId>, outcome: Result<LoadResponse>) -> Result<()> {
        match outcome {
            Ok(response) => {
                if let Some(container) = container {
                    window
                        .document_mut()
                        .set_inner_html(container, response.content())?;
                }
                if let Some(message) = response.message.as_deref().filter(|_| response.success) {
                    self.alerts.show_default(window, message, Severity::Success)?;
                }
            }
            Err(err) => {
                error!("Error: {err:#}");
                self.alerts.show_default(window, LOAD_FAILED, Severity::Danger)?;
            }
        }
        Ok(())
    }

    /// Load `path` (resolved against the page location) into `container`.
    ///
    /// # Errors
    /// Returns an error if `path` cannot be resolved or the page cannot be
    /// updated. Network and decoding failures are reported on the page.
    pub async fn load_data(
        &self,
        page: &mut HtmlPage,
        path: &str,
        container: Option<NodeId>,
        options: &LoadOptions,
    ) -> Result<()> {
        let window = page.window();
        let url = window
            .location()
            .join(path)
            .with_context(|| format!("cannot resolve {path:?} against {}", window.location()))?;
        let csrf_token = get_cookie(window.cookie(), CSRF_COOKIE);
        let outcome = self.fetch(&url, csrf_token.as_deref(), options).await;
        self.apply(page.window_mut(), container, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookies_are_found_and_decoded() {
        let jar = "sessionid=abc; csrftoken=a%2Bb%3Dc; tema=oscuro";
        assert_eq!(get_cookie(jar, CSRF_COOKIE).as_deref(), Some("a+b=c"));
        assert_eq!(get_cookie(jar, "tema").as_deref(), Some("oscuro"));
        assert_eq!(get_cookie(jar, "csrf"), None);
        assert_eq!(get_cookie("", CSRF_COOKIE), None);
    }

    #[test]
    fn content_prefers_html_then_message() {
        let mut response = LoadResponse {
            html: Some(String::from("<p>Hola</p>")),
            message: Some(String::from("Listo")),
            success: true,
        };
        assert_eq!(response.content(), "<p>Hola</p>");
        response.html = None;
        assert_eq!(response.content(), "Listo");
        response.message = None;
        assert_eq!(response.content(), LOADED);
    }
}
