//! Blocking HTTP implementation of [`PathService`].
//!
//! One `POST` per request with a JSON body, no retries. Blocking reqwest is
//! enough here: requests run on a command thread, never on the UI loop.

use std::time::Duration;

use gridpath_core::Point;

use crate::error::PathRequestError;
use crate::wire::{decode_response, PathRequest};
use crate::PathService;

/// Path service client over HTTP.
#[derive(Clone, Debug)]
pub struct HttpPathClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpPathClient {
    /// Build a client posting to `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PathRequestError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gridpath/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| PathRequestError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PathService for HttpPathClient {
    fn request_path(&self, start: Point, end: Point) -> Result<Vec<Point>, PathRequestError> {
        log::debug!("POST {} start={start} end={end}", self.endpoint);
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&PathRequest { start, end })
            .send()
            .map_err(|e| PathRequestError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| PathRequestError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(PathRequestError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let path = decode_response(&body)?;
        log::debug!("path service answered with {} cells", path.len());
        Ok(path)
    }
}
