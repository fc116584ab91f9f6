use std::future::Future;

use aws_config::BehaviorVersion;
use aws_sdk_kinesis::{
    config::http::HttpResponse,
    error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::Blob,
    types::PutRecordsRequestEntry,
    Client,
};
use serde::Serialize;
use thiserror::Error;

use crate::event::OutboundEntry;

/// Outcome of a batch write as reported by the destination stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_record_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SubmissionResult {
    pub const SUCCESS: u16 = 200;

    pub fn success(failed_record_count: Option<i32>) -> Self {
        Self {
            status_code: Self::SUCCESS,
            failed_record_count,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == Self::SUCCESS
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("[Kinesis] Invalid request entry")]
    InvalidEntry(#[from] BuildError),
    #[error("[Kinesis] No response from stream {stream}: {detail}")]
    NoResponse { stream: String, detail: String },
}

/// Destination of a forwarded batch.
pub trait StreamSink {
    /// Writes `entries` to `stream_name` in a single call.
    ///
    /// An `Err` means no HTTP exchange took place. A response with a non-success status
    /// is reported as `Ok` so the caller can decide what to return.
    fn put_records(
        &self,
        stream_name: &str,
        entries: &[OutboundEntry],
    ) -> impl Future<Output = Result<SubmissionResult, SinkError>> + Send;
}

pub struct KinesisSink {
    client: Client,
}

impl KinesisSink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the default AWS provider chain.
    ///
    /// A missing region does not stop start-up; every later call will fail instead.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        if config.region().is_none() {
            tracing::error!("[Kinesis] Failed to instantiate Kinesis client: no AWS region configured");
        }
        Self::new(Client::new(&config))
    }
}

impl StreamSink for KinesisSink {
    async fn put_records(
        &self,
        stream_name: &str,
        entries: &[OutboundEntry],
    ) -> Result<SubmissionResult, SinkError> {
        let records = entries
            .iter()
            .map(to_request_entry)
            .collect::<Result<Vec<_>, _>>()?;

        match self
            .client
            .put_records()
            .stream_name(stream_name)
            .set_records(Some(records))
            .send()
            .await
        {
            Ok(output) => Ok(SubmissionResult::success(output.failed_record_count())),
            Err(e) => classify_error(stream_name, e),
        }
    }
}

fn to_request_entry(entry: &OutboundEntry) -> Result<PutRecordsRequestEntry, BuildError> {
    PutRecordsRequestEntry::builder()
        .data(Blob::new(entry.data.as_bytes()))
        .partition_key(&entry.partition_key)
        .build()
}

fn classify_error<E>(
    stream_name: &str,
    err: SdkError<E, HttpResponse>,
) -> Result<SubmissionResult, SinkError>
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let detail = DisplayErrorContext(&err).to_string();
    match err.raw_response() {
        Some(raw) => {
            tracing::trace!("[Kinesis] Stream {stream_name} answered with an error: {detail}");
            Ok(SubmissionResult {
                status_code: raw.status().as_u16(),
                failed_record_count: None,
                error_code: err
                    .as_service_error()
                    .and_then(|e| e.code())
                    .map(str::to_owned),
                detail: Some(detail),
            })
        }
        None => Err(SinkError::NoResponse {
            stream: stream_name.to_owned(),
            detail,
        }),
    }
}
