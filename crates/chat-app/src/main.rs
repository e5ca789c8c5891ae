use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use compass::error::{CreateGatewaySnafu, ReadInputSnafu};
use compass::render::{TYPING_LINE, render_timeline};
use compass::settings::state::DEFAULT_LOG_FILTER;
use compass::settings::{AppSettings, SettingsStore};
use compass::{AppError, ChatSession, Command, HELP_TEXT};
use compass_gateway::HttpGateway;
use snafu::ResultExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Debug, Parser)]
#[command(name = "compass", about = "Terminal client for the Compass mental health companion")]
struct Cli {
    /// Settings file to load instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Compass API base URL, overriding settings and environment.
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter_handle = init_tracing();

    let store = match cli.config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::load(),
    };
    let mut settings = store.settings().clone();
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }
    let settings = settings.normalized();

    apply_log_filter(&filter_handle, &settings.log_filter);
    if let Some(error) = store.load_error() {
        tracing::warn!(
            config_path = ?store.config_path(),
            error = %error,
            "failed to parse settings, using defaults"
        );
    } else {
        tracing::debug!(config_path = ?store.config_path(), "settings loaded");
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %error, "compass exited with an error");
            ExitCode::FAILURE
        }
    }
}

/// Installs the subscriber before settings load; the settings filter is swapped in later.
fn init_tracing() -> FilterHandle {
    let (filter, handle) = reload::Layer::new(env_filter(DEFAULT_LOG_FILTER));

    // Logs go to stderr so they never interleave with the transcript.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

fn apply_log_filter(handle: &FilterHandle, default_filter: &str) {
    if let Err(error) = handle.reload(env_filter(default_filter)) {
        tracing::warn!(error = %error, "failed to apply the configured log filter");
    }
}

async fn run(settings: AppSettings) -> Result<(), AppError> {
    let gateway = HttpGateway::new(settings.gateway_config()).context(CreateGatewaySnafu {
        stage: "create-gateway",
    })?;
    tracing::info!(endpoint = %gateway.endpoint(), "using compass gateway");

    let session = ChatSession::new(Arc::new(gateway));
    println!("{HELP_TEXT}\n");
    print!("{}", render_timeline(&session.timeline()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context(ReadInputSnafu {
        stage: "read-stdin-line",
    })? {
        match Command::parse(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => {
                println!("{HELP_TEXT}");
                continue;
            }
            Command::Clear => session.reset(),
            Command::Message(text) => drive(session.send(&text)).await,
            Command::Advice => {
                let target = session.timeline().latest_snippet_entry().map(|entry| {
                    (entry.id, entry.visible_snippets().unwrap_or_default().to_vec())
                });
                let Some((entry_id, snippets)) = target else {
                    println!("There are no reference responses to base advice on yet.");
                    continue;
                };
                drive(session.request_advice(entry_id, snippets)).await;
            }
        }

        println!();
        print!("{}", render_timeline(&session.timeline()));
    }

    Ok(())
}

/// Runs one chat operation, showing the typing line while it is suspended.
async fn drive(operation: impl Future<Output = ()>) {
    let mut operation = std::pin::pin!(operation);
    if futures::poll!(operation.as_mut()).is_pending() {
        println!("{TYPING_LINE}");
        operation.await;
    }
}
