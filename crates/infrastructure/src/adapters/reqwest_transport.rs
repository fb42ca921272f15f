//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port. It resolves request paths
//! against the configured base URL and performs exactly one HTTP exchange per
//! call; tokens and retries are handled by the dispatcher.

use std::time::Duration;

use quay_application::ports::{Transport, TransportError, TransportFuture};
use quay_domain::{ApiRequest, ApiResponse, HttpMethod, RequestBody};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Url};

use crate::config::ClientConfig;

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport from the client configuration.
    ///
    /// Configuration applied:
    /// - Request timeout from `config.timeout`
    /// - Follow redirects: up to 5
    /// - User-Agent from `config.user_agent`
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self::with_client(client, config.base_url.clone(), config.timeout))
    }

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins the base URL, the request path and the query string.
    fn resolve_url(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        if !request.query.is_empty() {
            let encoded = serde_urlencoded::to_string(request.query.pairs())
                .map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
            url.push('?');
            url.push_str(&encoded);
        }
        Url::parse(&url).map_err(|e| TransportError::InvalidUrl(format!("{e}: {url}")))
    }

    /// Attaches the domain body to the builder.
    fn build_body(
        builder: reqwest::RequestBuilder,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        match body {
            RequestBody::None => Ok(builder),
            RequestBody::Json(value) => Ok(builder.json(value)),
            RequestBody::Multipart(parts) => {
                let mut form = Form::new();
                for part in parts {
                    let mut file = Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
                    if let Some(mime) = &part.mime_type {
                        file = file
                            .mime_str(mime)
                            .map_err(|e| TransportError::InvalidBody(format!("{mime}: {e}")))?;
                    }
                    form = form.part(part.name.clone(), file);
                }
                Ok(builder.multipart(form))
            }
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            if message.to_lowercase().contains("refused") {
                return TransportError::ConnectionRefused {
                    host: error
                        .url()
                        .and_then(|u| u.host_str().map(str::to_string))
                        .unwrap_or_else(|| "unknown".to_string()),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_builder() {
            return TransportError::InvalidBody(error.to_string());
        }

        TransportError::Other(error.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> TransportFuture<'_> {
        let method = request.method;
        let url = self.resolve_url(request);
        let headers = request.headers.clone();
        let body = request.body.clone();
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);

        Box::pin(async move {
            let mut builder = self.client.request(Self::to_reqwest_method(method), url?);

            for (name, value) in &headers {
                builder = builder.header(name, value);
            }
            builder = Self::build_body(builder, &body)?;

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();
            let response_headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            let mut api_response = ApiResponse::new(status, bytes);
            api_response.headers = response_headers;
            Ok(api_response)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quay_domain::{MultipartPart, QueryParams};

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::with_client(
            Client::new(),
            Url::parse(base).unwrap(),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_resolve_url_joins_base_and_path() {
        let transport = transport("http://localhost:5000/api/");
        let url = transport
            .resolve_url(&ApiRequest::get("/v1/containers"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/v1/containers");
    }

    #[test]
    fn test_resolve_url_encodes_query() {
        let transport = transport("http://localhost:5000/api");
        let request = ApiRequest::get("/v1/containers").with_query(
            QueryParams::new()
                .with("search", "MSCU 12")
                .with("page", 2),
        );
        let url = transport.resolve_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/v1/containers?search=MSCU+12&page=2"
        );
    }

    #[test]
    fn test_invalid_mime_is_rejected() {
        let body = RequestBody::Multipart(vec![MultipartPart {
            name: "image".to_string(),
            file_name: "a.png".to_string(),
            mime_type: Some("not a mime".to_string()),
            bytes: vec![1],
        }]);
        let builder = Client::new().put("https://example.com");
        let result = ReqwestTransport::build_body(builder, &body);
        assert!(matches!(result, Err(TransportError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_mapped() {
        // Nothing listens on the discard port.
        let transport = transport("http://127.0.0.1:9");
        let result = transport.send(&ApiRequest::get("/v1/containers")).await;
        assert!(matches!(
            result,
            Err(TransportError::ConnectionRefused { .. } | TransportError::ConnectionFailed(_))
        ));
    }
}
