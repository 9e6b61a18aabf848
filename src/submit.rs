//! Submission boundary — hands the finished Record to an external
//! collaborator.
//!
//! The core's responsibility ends here: it does not retry, and it does not
//! interpret the collaborator's response beyond transport success.

use async_trait::async_trait;
use tracing::info;

use crate::error::SubmitError;
use crate::wizard::model::Record;

/// Destination for a completed wizard Record.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, record: &Record) -> Result<(), SubmitError>;
}

/// Posts the Record as JSON to a configured HTTP endpoint.
pub struct HttpSubmissionSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn submit(&self, record: &Record) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(endpoint = %self.endpoint, "Record submitted");
        Ok(())
    }
}

/// Logs the Record instead of sending it anywhere. Used when no submit
/// endpoint is configured.
pub struct LoggingSink;

#[async_trait]
impl SubmissionSink for LoggingSink {
    async fn submit(&self, record: &Record) -> Result<(), SubmitError> {
        let payload = serde_json::to_string(record)?;
        info!(record = %payload, "Record accepted (no submit endpoint configured)");
        Ok(())
    }
}
