use anyhow::anyhow;
use clap::Parser;
use kafka_kinesis_forwarder::{logging, Forwarder, ForwarderConfig, InboundEvent, KinesisSink};
use lambda_runtime::{service_fn, LambdaEvent};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ForwarderConfig::parse();

    let level = logging::init(&config.log_level)?;
    tracing::info!("Setting logger level to {level}");
    tracing::info!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let sink = KinesisSink::from_env().await;
    tracing::info!(
        "Lambda will forward data to Kinesis name: {}",
        config.stream_name
    );

    let forwarder = Forwarder::new(sink, config.stream_name);
    let forwarder = &forwarder;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<InboundEvent>| async move {
            forwarder
                .handle(event.payload)
                .await
                .map_err(lambda_runtime::Error::from)
        },
    ))
    .await
    .map_err(|e| anyhow!(e))
}
