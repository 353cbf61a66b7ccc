//! Logging setup, with optional OpenTelemetry trace export.
//!
//! Events go to stderr through `tracing-subscriber`, filtered by `RUST_LOG`
//! (default `info`). With the `telemetry` feature, setting any of the
//! `OTEL_EXPORTER_OTLP_*` variables also exports spans over OTLP.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[cfg(feature = "telemetry")]
use opentelemetry::{KeyValue, trace::TracerProvider as _};
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::{
    SCHEMA_URL,
    attribute::{DEPLOYMENT_ENVIRONMENT_NAME, SERVICE_VERSION},
};
#[cfg(feature = "telemetry")]
use std::env;
#[cfg(feature = "telemetry")]
use tracing_opentelemetry::OpenTelemetryLayer;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Telemetry protocol to use for OTLP export
#[cfg(feature = "telemetry")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TelemetryProtocol {
    Http,
    Grpc,
}

#[cfg(feature = "telemetry")]
impl TelemetryProtocol {
    /// Reads the protocol from the environment, or `None` if OTLP export is not configured.
    fn from_env() -> Option<Self> {
        let is_enabled = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok()
            || env::var("OTEL_EXPORTER_OTLP_HEADERS").is_ok()
            || env::var("OTEL_EXPORTER_OTLP_PROTOCOL").is_ok();
        if !is_enabled {
            return None;
        }
        let protocol = match env::var("OTEL_EXPORTER_OTLP_PROTOCOL").as_deref() {
            Ok("grpc") => TelemetryProtocol::Grpc,
            _ => TelemetryProtocol::Http,
        };
        Some(protocol)
    }
}

#[cfg(feature = "telemetry")]
fn resource() -> Resource {
    let deployment_env = env::var("DEPLOYMENT_ENV").unwrap_or_else(|_| "develop".to_string());
    Resource::builder()
        .with_service_name(env!("CARGO_PKG_NAME"))
        .with_schema_url(
            [
                KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
                KeyValue::new(DEPLOYMENT_ENVIRONMENT_NAME, deployment_env),
            ],
            SCHEMA_URL,
        )
        .build()
}

#[cfg(feature = "telemetry")]
fn init_tracer_provider(
    protocol: TelemetryProtocol,
) -> Result<SdkTracerProvider, opentelemetry_otlp::ExporterBuildError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder();
    let exporter = match protocol {
        TelemetryProtocol::Http => exporter.with_http().build(),
        TelemetryProtocol::Grpc => exporter.with_tonic().build(),
    }?;
    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// Installed subscriber; flushes exported spans when dropped.
pub struct Telemetry {
    #[cfg(feature = "telemetry")]
    tracer_provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    #[cfg(feature = "telemetry")]
    pub fn init() -> Self {
        let provider = match TelemetryProtocol::from_env().map(init_tracer_provider) {
            Some(Ok(provider)) => Some(provider),
            Some(Err(err)) => {
                eprintln!("Failed to build OTLP span exporter: {err}");
                None
            }
            None => None,
        };
        match provider {
            Some(provider) => {
                let tracer = provider.tracer("paycom-cli");
                tracing_subscriber::registry()
                    .with(env_filter())
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .with(OpenTelemetryLayer::new(tracer))
                    .init();
                tracing::debug!("OpenTelemetry trace export is enabled");
                Self {
                    tracer_provider: Some(provider),
                }
            }
            None => {
                tracing_subscriber::registry()
                    .with(env_filter())
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .init();
                Self {
                    tracer_provider: None,
                }
            }
        }
    }

    #[cfg(not(feature = "telemetry"))]
    pub fn init() -> Self {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
        Self {}
    }
}

#[cfg(feature = "telemetry")]
impl Drop for Telemetry {
    fn drop(&mut self) {
        if let Some(tracer_provider) = self.tracer_provider.as_ref() {
            if let Err(err) = tracer_provider.shutdown() {
                eprintln!("{err:?}");
            }
        }
    }
}
