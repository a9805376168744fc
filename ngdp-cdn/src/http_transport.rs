//! Default HTTP implementation of [`Transport`]
//!
//! Grounded on the range/status-mapping logic in `tact_client::http::HttpClient`
//! and `ngdp_cdn::client::CdnClient`'s request path: connection failure and
//! HTTP >= 500 map to a retryable error, 400..500 is non-retryable, and a
//! body larger than the caller's fixed buffer is reported (and truncated)
//! rather than failing the whole attempt.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Error, Result};
use crate::transport::{ByteRange, DownloadBuffer, DownloadOutcome, DownloadStatus, Transport};

/// The default HTTP transport, backed by a pooled [`reqwest::Client`].
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(8)
            .build()
            .map_err(Error::ClientBuild)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn download(
        &self,
        url: &str,
        range: Option<ByteRange>,
        buffer: DownloadBuffer<'_>,
    ) -> DownloadOutcome {
        let head_only = matches!(buffer, DownloadBuffer::None);

        let mut request = if head_only {
            self.client.head(url)
        } else {
            self.client.get(url)
        };

        if let Some((start, end)) = range {
            if end > start && end > 0 {
                request = request.header("Range", format!("bytes={start}-{}", end - 1));
            }
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(error = %e, url, "transport request failed");
                return DownloadOutcome {
                    status: Some(DownloadStatus::RetryableServerError),
                    ..Default::default()
                };
            }
        };

        let status = response.status();
        if status.is_server_error() {
            return DownloadOutcome {
                status: Some(DownloadStatus::RetryableServerError),
                ..Default::default()
            };
        }
        if status.is_client_error() {
            return DownloadOutcome {
                status: Some(DownloadStatus::NonRetryable4xx),
                ..Default::default()
            };
        }

        let content_length = response.content_length().unwrap_or(0);

        if head_only {
            return DownloadOutcome {
                status: Some(DownloadStatus::Success),
                size: content_length,
                ..Default::default()
            };
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, url, "failed to read response body");
                return DownloadOutcome {
                    status: Some(DownloadStatus::RetryableServerError),
                    ..Default::default()
                };
            }
        };

        match buffer {
            DownloadBuffer::None => unreachable!("handled above"),
            DownloadBuffer::Allocate => DownloadOutcome {
                status: Some(DownloadStatus::Success),
                size: body.len() as u64,
                allocated: Some(body.to_vec()),
                written: 0,
            },
            DownloadBuffer::Fixed(slice) => {
                let capacity = slice.len();
                if body.len() > capacity {
                    slice.copy_from_slice(&body[..capacity]);
                    DownloadOutcome {
                        status: Some(DownloadStatus::BufferTooSmall),
                        size: body.len() as u64,
                        written: capacity,
                        ..Default::default()
                    }
                } else {
                    slice[..body.len()].copy_from_slice(&body);
                    DownloadOutcome {
                        status: Some(DownloadStatus::Success),
                        size: body.len() as u64,
                        written: body.len(),
                        ..Default::default()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn head_mode_reports_size_without_a_body() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(200).insert_header("Content-Length", "1234"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport.download(&url, None, DownloadBuffer::None).await;

        assert_eq!(outcome.status(), DownloadStatus::Success);
        assert_eq!(outcome.size, 1234);
        assert!(outcome.allocated.is_none());
    }

    #[tokio::test]
    async fn allocate_mode_returns_the_full_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".to_vec()))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport
            .download(&url, None, DownloadBuffer::Allocate)
            .await;

        assert_eq!(outcome.status(), DownloadStatus::Success);
        assert_eq!(outcome.allocated.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn fixed_buffer_too_small_truncates_and_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello world".to_vec()))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let mut small_buf = [0u8; 5];
        let outcome = transport
            .download(&url, None, DownloadBuffer::Fixed(&mut small_buf))
            .await;

        assert_eq!(outcome.status(), DownloadStatus::BufferTooSmall);
        assert_eq!(outcome.written, 5);
        assert_eq!(&small_buf, b"hello");
    }

    #[tokio::test]
    async fn server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport
            .download(&url, None, DownloadBuffer::Allocate)
            .await;

        assert_eq!(outcome.status(), DownloadStatus::RetryableServerError);
    }

    #[tokio::test]
    async fn client_error_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport
            .download(&url, None, DownloadBuffer::Allocate)
            .await;

        assert_eq!(outcome.status(), DownloadStatus::NonRetryable4xx);
    }

    #[tokio::test]
    async fn too_many_requests_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport
            .download(&url, None, DownloadBuffer::Allocate)
            .await;

        assert_eq!(outcome.status(), DownloadStatus::NonRetryable4xx);
    }

    #[tokio::test]
    async fn range_header_uses_inclusive_upper_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/ab/cd/abcd"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(b"ab".to_vec()))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let url = format!("{}/data/ab/cd/abcd", server.uri());
        let outcome = transport
            .download(&url, Some((0, 2)), DownloadBuffer::Allocate)
            .await;

        assert_eq!(outcome.status(), DownloadStatus::Success);
    }
}
