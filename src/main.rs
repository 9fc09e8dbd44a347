//! Wiring & DI. Entry point: load config, build adapters, run one digest.
//! No business logic here; orchestration is delegated to DigestService.

use clap::Parser;
use hackathon_digest::adapters::mail::SmtpMailer;
use hackathon_digest::adapters::search::MockSearchAdapter;
use hackathon_digest::shared::AppConfig;
use hackathon_digest::usecases::DigestService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Search for hackathons and programming challenges and email a digest.
#[derive(Parser, Debug)]
#[command(name = "hackathon-digest", version, about)]
struct Cli {
    /// Natural-language request sent to the search agent instead of the default one.
    request: Option<String>,

    /// Format the email but do not send it.
    #[arg(long)]
    dry_run: bool,

    /// Use canned search results instead of calling the agent (no API key needed).
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv::dotenv();
    // stdout carries the JSON result; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;

    let service = if cli.mock {
        warn!("--mock set, using mock search adapter");
        DigestService::new(
            Arc::new(MockSearchAdapter::new()),
            Arc::new(SmtpMailer::new(cfg.smtp_settings())),
            cfg.digest_configuration(),
        )
    } else {
        DigestService::from_app_config(&cfg)?
    };
    let service = if cli.dry_run {
        service.without_delivery()
    } else {
        service
    };

    info!(
        recipients = %service.config().recipient_emails.join(","),
        model = %cfg.openai_model_or_default(),
        "configuration resolved"
    );

    let output = service.run(cli.request.as_deref()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
