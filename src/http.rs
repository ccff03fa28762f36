//! # HTTP Transport
//!
//! [`Transport`] implementation on top of `reqwest`.
//!
//! Paths produced by the controller are joined onto the configured server URL.
//! Outcomes map onto the transport contract as follows:
//!
//! - connection failure, timeout, or an undecodable 2xx body: status `0`
//! - non-2xx: the HTTP status, with the JSON body when there is one
//! - 2xx: the body decoded as a [`ResponsePayload`]

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use crate::framework::{Cancelable, HttpMethod, ResponsePayload, Transport, TransportError};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client: builder.build()?,
            server_url,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<String>,
        content_type: &str,
    ) -> Cancelable<ResponsePayload> {
        let verb = match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        };
        let target = format!("{}{}", self.server_url, url);
        debug!(%method, %target, "Sending request");

        let mut request = self
            .client
            .request(verb, target)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, content_type).body(body);
        }
        Cancelable::new(execute(request))
    }
}

async fn execute(request: RequestBuilder) -> Result<ResponsePayload, TransportError> {
    let response = request.send().await.map_err(|e| {
        warn!(error = %e, timeout = e.is_timeout(), "Request did not complete");
        TransportError::interrupted()
    })?;

    let status = response.status();
    if status.is_success() {
        response.json::<ResponsePayload>().await.map_err(|e| {
            warn!(%status, error = %e, "Invalid response body");
            TransportError::interrupted()
        })
    } else {
        let body = response.json::<Value>().await.ok();
        Err(TransportError::new(status.as_u16(), body))
    }
}
