use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload delivered by a Kafka (MSK or self-managed) event source mapping.
///
/// Records are grouped under `"<topic>-<partition>"` keys. Key order follows the
/// incoming document so that forwarding preserves the delivery order.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_source_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_servers: Option<String>,
    pub records: IndexMap<String, Vec<SourceRecord>>,
    /// Envelope fields not modelled above, kept so the event can be logged as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InboundEvent {
    /// Total number of records across every topic-partition.
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn iter_records(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values().flatten()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub topic: String,
    pub partition: i64,
    pub offset: i64,
    /// Base64 encoded message body.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single entry of a Kinesis `PutRecords` batch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutboundEntry {
    #[serde(rename = "Data")]
    pub data: String,
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
}

/// Value returned to the Lambda service at the end of an invocation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ForwarderResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ForwarderResponse {
    pub const OK: u16 = 200;
    pub const INTERNAL_ERROR: u16 = 500;

    pub fn ok() -> Self {
        Self {
            status_code: Self::OK,
            body: None,
        }
    }

    pub fn internal_error(body: impl Into<String>) -> Self {
        Self {
            status_code: Self::INTERNAL_ERROR,
            body: Some(body.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == Self::OK
    }
}
