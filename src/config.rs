use clap::Parser;

/// Start-up configuration, read from the function environment.
#[derive(Clone, Debug, Parser)]
#[clap(name = "kafka-kinesis-forwarder", version, about)]
pub struct ForwarderConfig {
    /// Name of the Kinesis data stream records are written to.
    #[clap(long, env = "STREAM_NAME")]
    pub stream_name: String,

    /// Log verbosity. Unrecognised values fall back to INFO.
    #[clap(long, env = "LOG_LEVEL")]
    pub log_level: String,
}
