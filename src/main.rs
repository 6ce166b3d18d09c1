use std::io::Write;

use clap::Parser;
use meshvernor::{configuration::Configuration, store::Kind};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CommandArgs {
    /// YAML configuration, defaults apply when omitted.
    #[arg(long)]
    with_config_file: Option<String>,
    /// Multi-document YAML with GatewayClass, Gateway and HTTPRoute resources.
    #[arg(long)]
    manifests: String,
    /// Kind to generate, `Gateway` or `VirtualService`.
    #[arg(long, default_value = "VirtualService")]
    kind: Kind,
    /// Namespace to generate for, all namespaces when empty.
    #[arg(long, default_value = "")]
    namespace: String,
}

fn init_tracing_logging(configuration: &Configuration) -> WorkerGuard {
    let directory = configuration.log_directory.clone().unwrap_or_else(|| ".".to_owned());
    let file_appender = tracing_appender::rolling::never(directory, "meshvernor.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);
    let file_filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_FILE_LOG").unwrap_or_else(|_| "debug".to_owned()));
    let console_filter = tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()));

    let console_layer = fmt::layer()
        .event_format(fmt::format().compact())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false)
        .with_filter(filter::filter_fn(|meta| !meta.is_span()))
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_appender)
        .with_span_events(FmtSpan::NONE)
        .with_target(true)
        .with_ansi(false)
        .with_filter(filter::filter_fn(|meta| !meta.is_span()))
        .with_filter(file_filter);

    Registry::default().with(console_layer).with(file_layer).init();
    guard
}

fn main() -> meshvernor::Result<()> {
    let args = CommandArgs::parse();
    let configuration: Configuration = match &args.with_config_file {
        Some(path) => serde_yaml::from_str(&std::fs::read_to_string(path)?)?,
        None => Configuration::default(),
    };
    let _guard = init_tracing_logging(&configuration);
    info!("Generating {} for namespace {:?} as {}", args.kind, args.namespace, configuration.controller_name);

    let manifests = std::fs::read_to_string(&args.manifests)?;
    let output = meshvernor::translate(&configuration, &manifests, args.kind, &args.namespace)?;
    std::io::stdout().write_all(output.as_bytes())?;
    Ok(())
}
