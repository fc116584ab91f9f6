//! Lambda function that forwards Kafka event source batches into a Kinesis data stream.
//!
//! Every invocation decodes the base64 record values of an [`InboundEvent`] and writes
//! them to the configured stream with one `PutRecords` call. The destination is
//! abstracted behind [`StreamSink`] so the [`Forwarder`] can run against any client.

pub mod config;
pub mod event;
pub mod forwarder;
pub mod kinesis;
pub mod logging;

pub use config::ForwarderConfig;
pub use event::{ForwarderResponse, InboundEvent, OutboundEntry, SourceRecord};
pub use forwarder::{decode_record, flatten_event, DecodeError, ForwardError, Forwarder, PARTITION_KEY};
pub use kinesis::{KinesisSink, SinkError, StreamSink, SubmissionResult};
