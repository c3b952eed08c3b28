use std::error::Error as _;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use tracing::trace;

use crate::error::RequestFailure;
use crate::sinks::OutputSink;

use super::spec::{Outcome, RequestSpec};

/// Issues one request and classifies it. Implementations never retry.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> Outcome;
}

/// `reqwest`-backed executor.
pub struct HttpExecutor {
    client: Client,
    log_response_body: bool,
    sink: Arc<dyn OutputSink>,
}

impl HttpExecutor {
    #[must_use]
    pub fn new(client: Client, log_response_body: bool, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            client,
            log_response_body,
            sink,
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: &RequestSpec) -> Outcome {
        let mut request = self
            .client
            .request(spec.method().clone(), spec.url().clone())
            .headers(spec.header_map().clone());
        if let Some(body) = spec.body() {
            request = request.body(body.clone());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                return Outcome::Failure(RequestFailure::Transport {
                    message: describe_error(&err),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            // Read the rest so the connection can go back to the pool.
            if let Err(err) = drain_response_body(response).await {
                trace!("Discarding unread error body: {}", err);
            }
            return Outcome::Failure(RequestFailure::Status {
                status: status.as_u16(),
            });
        }

        let read = if self.log_response_body {
            read_and_emit_body(response, self.sink.as_ref()).await
        } else {
            drain_response_body(response).await
        };
        match read {
            Ok(bytes) => Outcome::Success {
                status: status.as_u16(),
                bytes,
            },
            Err(err) => Outcome::Failure(RequestFailure::Body {
                message: describe_error(&err),
            }),
        }
    }
}

async fn read_and_emit_body(
    response: Response,
    sink: &dyn OutputSink,
) -> Result<u64, reqwest::Error> {
    let body = response.bytes().await?;
    sink.response_body(&String::from_utf8_lossy(&body));
    Ok(u64::try_from(body.len()).unwrap_or(u64::MAX))
}

async fn drain_response_body(response: Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// `reqwest` hides the interesting part (refused, DNS, reset) in the source
/// chain, so flatten it into one message.
fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
