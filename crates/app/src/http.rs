//! Storefront API client.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a server error.
    #[error("server error {status}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The API refused the request for a reason unrelated to the resource (auth, timeout, rate
    /// limiting, or a status the caller does not treat as an answer).
    #[error("request refused {status}: {body}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response (status {status}): {source}")]
    Decode {
        /// HTTP status code
        status: u16,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },
}

/// JSON client for the storefront REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    /// Create a client for the API at `base_url`, optionally sending a bearer token.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            http: Client::new(),
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `GET` a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a 5xx status, an auth, timeout or rate-limit
    /// status, or an unparseable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.http.get(self.url(path)), carries_answer).await
    }

    /// `GET` a single resource. Only a 2xx or a 404 body is read; any other status is an error,
    /// so a refused or throttled request is never mistaken for a missing resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, any status other than 2xx or 404, or an unparseable
    /// body.
    pub async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.http.get(self.url(path)), is_not_found).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a 5xx status, an auth, timeout or rate-limit
    /// status, or an unparseable body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body), carries_answer)
            .await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a 5xx status, an auth, timeout or rate-limit
    /// status, or an unparseable body.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.put(self.url(path)).json(body), carries_answer)
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        answers: fn(StatusCode) -> bool,
    ) -> Result<T, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        read_body(status, &body, answers)
    }
}

/// 4xx statuses whose `{success: false, message}` body is the API's answer. Auth failures,
/// timeouts and rate limiting say nothing about the resource.
fn carries_answer(status: StatusCode) -> bool {
    status.is_client_error()
        && !matches!(
            status,
            StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::REQUEST_TIMEOUT
                | StatusCode::TOO_MANY_REQUESTS
        )
}

fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND
}

fn read_body<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    answers: fn(StatusCode) -> bool,
) -> Result<T, ApiError> {
    if status.is_server_error() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    if !status.is_success() && !answers(status) {
        return Err(ApiError::Client {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    serde_json::from_str(body).map_err(|source| ApiError::Decode {
        status: status.as_u16(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testresult::TestResult;

    use crate::test::server::serve_once;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Envelope {
        success: bool,
    }

    const REJECTED: &str = r#"{"success": false, "message": "nope"}"#;

    #[test]
    fn server_errors_are_never_read() {
        let result: Result<Envelope, _> =
            read_body(StatusCode::BAD_GATEWAY, REJECTED, carries_answer);

        assert!(matches!(result, Err(ApiError::Server { status: 502, .. })));
    }

    #[test]
    fn refusals_are_errors_for_every_caller() {
        for status in [
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            let general: Result<Envelope, _> = read_body(status, REJECTED, carries_answer);
            let resource: Result<Envelope, _> = read_body(status, REJECTED, is_not_found);

            assert!(
                matches!(general, Err(ApiError::Client { .. })),
                "{status} read as an answer"
            );
            assert!(
                matches!(resource, Err(ApiError::Client { .. })),
                "{status} read as a resource answer"
            );
        }
    }

    #[test]
    fn rejection_bodies_reach_the_caller() -> TestResult {
        let general: Envelope = read_body(StatusCode::BAD_REQUEST, REJECTED, carries_answer)?;
        let missing: Envelope = read_body(StatusCode::NOT_FOUND, REJECTED, is_not_found)?;
        let refused: Result<Envelope, _> =
            read_body(StatusCode::BAD_REQUEST, REJECTED, is_not_found);

        assert!(!general.success);
        assert!(!missing.success);
        assert!(matches!(refused, Err(ApiError::Client { status: 400, .. })));

        Ok(())
    }

    #[test]
    fn undecodable_body_is_an_error() {
        let result: Result<Envelope, _> =
            read_body(StatusCode::OK, "<html>maintenance</html>", carries_answer);

        assert!(matches!(result, Err(ApiError::Decode { status: 200, .. })));
    }

    #[tokio::test]
    async fn sends_bearer_token_and_json_body() -> TestResult {
        let (base_url, request) = serve_once(200, r#"{"success": true}"#).await?;
        let client = ApiClient::new(base_url, Some("secret".to_string()));

        let response: Envelope = client
            .post("orders", &serde_json::json!({"total": "230.00"}))
            .await?;

        let request = request.await??;

        assert!(response.success);
        assert_eq!(request.request_line, "POST /orders HTTP/1.1");
        assert_eq!(request.header("authorization").as_deref(), Some("Bearer secret"));
        assert_eq!(request.body, r#"{"total":"230.00"}"#);

        Ok(())
    }

    #[test]
    fn url_joins_base_and_path_with_one_slash() {
        let client = ApiClient::new("https://api.example.sa/api/", None);

        assert_eq!(
            client.url("/products/p-1"),
            "https://api.example.sa/api/products/p-1"
        );
        assert_eq!(client.url("orders"), "https://api.example.sa/api/orders");
    }

    #[test]
    fn blank_tokens_are_dropped() {
        let client = ApiClient::new("https://api.example.sa", Some("  ".to_string()));

        assert!(client.token.is_none());
    }
}
