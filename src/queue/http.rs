//! HTTPS broker queue backend
//!
//! Client for an external long-poll-capable message broker with
//! at-least-once delivery. Receive asks the broker to hide the message for
//! a visibility interval; re-delivery after expiry is expected and handled
//! downstream by idempotent persistence.
//!
//! Broker surface:
//! - `POST {base}/queues/{name}/messages`            body `{"payload": ...}`
//! - `POST {base}/queues/{name}/receive?wait=&visibility=`  200 with
//!   `{"payload": ...}` or 204 when empty
//! - `GET  {base}/health`
//! - `GET  {base}/queues/{name}/stats`

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use super::{MessageQueue, QueueStats};
use crate::errors::QueueError;

#[derive(Debug, Serialize, Deserialize)]
struct MessageEnvelope {
    payload: String,
}

/// HTTPS broker client
pub struct HttpBrokerQueue {
    client: reqwest::Client,
    base_url: String,
    long_poll: Duration,
    visibility: Duration,
}

impl HttpBrokerQueue {
    pub fn new(
        base_url: &str,
        long_poll: Duration,
        visibility: Duration,
    ) -> Result<Self, QueueError> {
        // Overall timeout covers the broker's long-poll window plus slack
        let client = reqwest::Client::builder()
            .timeout(long_poll + Duration::from_secs(10))
            .build()
            .map_err(|e| QueueError::Backend {
                queue: String::new(),
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            long_poll,
            visibility,
        })
    }

    fn map_request_error(queue: &str, err: reqwest::Error) -> QueueError {
        if err.is_connect() || err.is_timeout() {
            QueueError::Unhealthy {
                message: format!("broker unreachable: {err}"),
            }
        } else {
            QueueError::Transient {
                queue: queue.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn map_status(queue: &str, status: StatusCode) -> Option<QueueError> {
        if status.is_success() {
            None
        } else if status.is_server_error() {
            Some(QueueError::Transient {
                queue: queue.to_string(),
                message: format!("broker returned {status}"),
            })
        } else {
            Some(QueueError::Backend {
                queue: queue.to_string(),
                message: format!("broker returned {status}"),
            })
        }
    }
}

#[async_trait]
impl MessageQueue for HttpBrokerQueue {
    async fn send(&self, queue: &str, payload: &str) -> Result<(), QueueError> {
        let url = format!("{}/queues/{}/messages", self.base_url, queue);
        let response = self
            .client
            .post(&url)
            .json(&MessageEnvelope {
                payload: payload.to_string(),
            })
            .send()
            .await
            .map_err(|e| Self::map_request_error(queue, e))?;

        match Self::map_status(queue, response.status()) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    async fn receive(&self, queue: &str) -> Result<Option<String>, QueueError> {
        let url = format!(
            "{}/queues/{}/receive?wait={}&visibility={}",
            self.base_url,
            queue,
            self.long_poll.as_secs(),
            self.visibility.as_secs()
        );
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| Self::map_request_error(queue, e))?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if let Some(err) = Self::map_status(queue, response.status()) {
            return Err(err);
        }

        let envelope: MessageEnvelope =
            response.json().await.map_err(|e| QueueError::Transient {
                queue: queue.to_string(),
                message: format!("malformed broker response: {e}"),
            })?;
        Ok(Some(envelope.payload))
    }

    async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                warn!(error = %err, "broker health check failed");
                false
            }
        }
    }

    async fn stats(&self, queue: &str) -> Result<QueueStats, QueueError> {
        let url = format!("{}/queues/{}/stats", self.base_url, queue);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::map_request_error(queue, e))?;

        if let Some(err) = Self::map_status(queue, response.status()) {
            return Err(err);
        }
        response.json().await.map_err(|e| QueueError::Transient {
            queue: queue.to_string(),
            message: format!("malformed stats response: {e}"),
        })
    }
}
