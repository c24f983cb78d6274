//! The network seam between the executor and an HTTP client.
//!
//! # Design
//! A `Transport` performs exactly one round-trip for one `HttpRequest`. It
//! reports a non-2xx status as an ordinary `HttpResponse`; only failures that
//! prevent a response from arriving are `TransportError`s. Status and body
//! interpretation belong to the executor.
//!
//! `UreqTransport` drives a blocking `ureq` agent on tokio's blocking pool.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// Settings for `UreqTransport`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Upper bound on a whole round-trip. `None` leaves it to the client's defaults.
    #[serde(rename = "timeout_secs", with = "opt_secs")]
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

/// `Transport` backed by a blocking `ureq` agent.
///
/// `execute` hands the call to `tokio::task::spawn_blocking` and therefore
/// must be polled inside a Tokio runtime.
///
/// Redirects are not followed: a 3xx response is returned as-is. Response
/// bodies are read in full with no size cap.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    user_agent: Option<String>,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new(config: TransportConfig) -> Self {
        // Non-2xx responses, 3xx included, must come back as data for the executor to map.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self {
            agent,
            user_agent: config.user_agent,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent.clone();
        let user_agent = self.user_agent.clone();
        tokio::task::spawn_blocking(move || call_blocking(&agent, user_agent.as_deref(), request))
            .await
            .map_err(TransportError::new)?
    }
}

fn call_blocking(
    agent: &ureq::Agent,
    user_agent: Option<&str>,
    request: HttpRequest,
) -> Result<HttpResponse, TransportError> {
    let url = request.url.as_str();
    let body = request.body.unwrap_or_default();

    let mut response = match request.method {
        HttpMethod::Get => apply_headers(agent.get(url), &request.headers, user_agent).call(),
        HttpMethod::Post => apply_headers(agent.post(url), &request.headers, user_agent).send(&body[..]),
        HttpMethod::Put => apply_headers(agent.put(url), &request.headers, user_agent).send(&body[..]),
    }
    .map_err(TransportError::new)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(TransportError::new)?;

    Ok(HttpResponse {
        status,
        headers,
        body: Bytes::from(body),
    })
}

fn apply_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    user_agent: Option<&str>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(ua) = configured_user_agent(headers, user_agent) {
        builder = builder.header("user-agent", ua);
    }
    builder
}

// A caller-supplied user agent wins over the configured one.
fn configured_user_agent<'a>(
    headers: &[(String, String)],
    user_agent: Option<&'a str>,
) -> Option<&'a str> {
    let caller_set = headers
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case("user-agent"));
    user_agent.filter(|_| !caller_set)
}
