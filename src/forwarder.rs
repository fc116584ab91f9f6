use std::{borrow::Cow, string::FromUtf8Error};

use base64::{
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use thiserror::Error;
use tracing::{instrument, Level};

use crate::{
    event::{ForwarderResponse, InboundEvent, OutboundEntry, SourceRecord},
    kinesis::{SinkError, StreamSink, SubmissionResult},
};

/// Partition key shared by every forwarded record.
///
/// All records land on the same shard of the destination stream.
pub const PARTITION_KEY: &str = "shard1";

/// Standard alphabet that also tolerates non-zero trailing bits.
const RECORD_VALUE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("[Forwarder] Record {topic}/{partition}@{offset} has an invalid base64 value")]
    InvalidBase64 {
        topic: String,
        partition: i64,
        offset: i64,
        #[source]
        source: base64::DecodeError,
    },
    #[error("[Forwarder] Record {topic}/{partition}@{offset} is not valid UTF-8")]
    InvalidUtf8 {
        topic: String,
        partition: i64,
        offset: i64,
        #[source]
        source: FromUtf8Error,
    },
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("[Forwarder] Failed to serialize submission result")]
    Serialize(#[from] serde_json::Error),
}

/// Decodes one source record into a destination entry.
pub fn decode_record(record: &SourceRecord) -> Result<OutboundEntry, DecodeError> {
    let bytes = RECORD_VALUE_ENGINE
        .decode(strip_whitespace(&record.value).as_bytes())
        .map_err(|source| DecodeError::InvalidBase64 {
            topic: record.topic.clone(),
            partition: record.partition,
            offset: record.offset,
            source,
        })?;
    let data = String::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 {
        topic: record.topic.clone(),
        partition: record.partition,
        offset: record.offset,
        source,
    })?;

    Ok(OutboundEntry {
        data,
        partition_key: PARTITION_KEY.to_owned(),
    })
}

// Line-wrapped payloads are accepted.
fn strip_whitespace(value: &str) -> Cow<'_, str> {
    if value.bytes().any(|b| b.is_ascii_whitespace()) {
        Cow::Owned(value.split_ascii_whitespace().collect())
    } else {
        Cow::Borrowed(value)
    }
}

/// Flattens every topic-partition of `event` into one batch.
///
/// The first record that fails to decode aborts the whole batch.
pub fn flatten_event(event: &InboundEvent) -> Result<Vec<OutboundEntry>, DecodeError> {
    event
        .iter_records()
        .map(|record| {
            tracing::debug!(
                "topic: {}, partition: {}, offset: {}",
                record.topic,
                record.partition,
                record.offset
            );
            decode_record(record)
        })
        .collect()
}

/// Forwards Kafka event source batches into a single destination stream.
pub struct Forwarder<S> {
    sink: S,
    stream_name: String,
}

impl<S: StreamSink> Forwarder<S> {
    pub fn new(sink: S, stream_name: impl Into<String>) -> Self {
        Self {
            sink,
            stream_name: stream_name.into(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[instrument(name = "kafka_kinesis_forwarder.handle", skip_all, fields(otel.name = format!("forward {}", self.stream_name)))]
    pub async fn handle(&self, event: InboundEvent) -> Result<ForwarderResponse, ForwardError> {
        if tracing::enabled!(Level::DEBUG) {
            match serde_json::to_string_pretty(&event) {
                Ok(json) => tracing::debug!("Received event: {json}"),
                Err(e) => tracing::debug!("Received event (not printable: {e})"),
            }
        }

        let entries = flatten_event(&event)?;
        let result = self.sink.put_records(&self.stream_name, &entries).await?;

        Ok(self.respond(&result, entries.len())?)
    }

    fn respond(
        &self,
        result: &SubmissionResult,
        forwarded: usize,
    ) -> Result<ForwarderResponse, serde_json::Error> {
        if !result.is_success() {
            let body = format!(
                "ERROR: Kinesis put_record failed: \n{}",
                serde_json::to_string(result)?
            );
            tracing::error!("{body}");
            return Ok(ForwarderResponse::internal_error(body));
        }

        if let Some(failed) = result.failed_record_count.filter(|count| *count > 0) {
            tracing::warn!(
                "[Forwarder] {failed} of {forwarded} records were rejected by stream {}",
                self.stream_name
            );
        }
        tracing::info!(
            "Number of records forwarded to stream {}: {forwarded}",
            self.stream_name
        );
        Ok(ForwarderResponse::ok())
    }
}
