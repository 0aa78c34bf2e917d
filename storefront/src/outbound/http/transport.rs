//! Reqwest implementation of the `HttpTransport` port.
//!
//! This adapter owns transport details only: URL resolution against the base
//! URL, JSON content negotiation headers, body serialisation, and error
//! mapping.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use tracing::trace;

use super::{join_beneath, map_transport_error};
use crate::domain::ports::{HttpTransport, TransportError};
use crate::domain::{ApiRequest, ApiResponse, HttpMethod};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Transport sending requests relative to one backend base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Wrap a session client and the backend base URL.
    ///
    /// `client` should come from [`super::session_client`] so requests carry
    /// the session cookie.
    #[must_use]
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn resolve(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = join_beneath(&self.base_url, request.path()).map_err(|error| {
            TransportError::invalid_request(format!(
                "cannot resolve path {path}: {error}",
                path = request.path()
            ))
        })?;
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }
        Ok(url)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.resolve(request)?;
        trace!(method = %request.method(), url = %url, "dispatching request");

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method()), url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE);
        for (name, value) in request.headers() {
            let (name, value) = parse_header(name, value)?;
            if name == CONTENT_TYPE || name == ACCEPT {
                continue;
            }
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            let bytes = serde_json::to_vec(body).map_err(|error| {
                TransportError::invalid_request(format!("cannot serialise body: {error}"))
            })?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error))?;
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), TransportError> {
    let parsed_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
        TransportError::invalid_request(format!("invalid header name {name}: {error}"))
    })?;
    let parsed_value = HeaderValue::from_str(value).map_err(|error| {
        TransportError::invalid_request(format!("invalid value for header {name}: {error}"))
    })?;
    Ok((parsed_name, parsed_value))
}
