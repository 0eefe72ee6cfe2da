//! HTTP transport seam
//!
//! The session and query logic only sees raw response bytes, so tests can
//! substitute a scripted transport for the real `ureq` one.

use std::io::Read;
use std::time::Duration;

use serde_json::Value;

use crate::error::TransportError;

pub(crate) trait Transport {
    /// POST a JSON body and return the raw response body. `params` are
    /// appended to the URL query string, encoded by the transport.
    fn post_json(
        &self,
        url: &str,
        cookie: Option<&str>,
        params: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;

    /// POST an empty body with extra query parameters
    fn post_query(
        &self,
        url: &str,
        cookie: Option<&str>,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;
}

/// Blocking transport backed by `ureq`; one attempt per call, no retries
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UreqTransport;

fn agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

fn read_body(response: ureq::http::Response<ureq::Body>) -> Result<Vec<u8>, TransportError> {
    let mut body = response.into_body();
    let mut bytes = Vec::new();
    body.as_reader().read_to_end(&mut bytes)?;
    Ok(bytes)
}

impl Transport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        cookie: Option<&str>,
        params: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let mut request = agent(timeout).post(url);
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        let response = request.send_json(body)?;
        read_body(response)
    }

    fn post_query(
        &self,
        url: &str,
        cookie: Option<&str>,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let mut request = agent(timeout).post(url);
        if let Some(cookie) = cookie {
            request = request.header("Cookie", cookie);
        }
        for (key, value) in params {
            request = request.query(*key, *value);
        }
        let response = request.send_empty()?;
        read_body(response)
    }
}
