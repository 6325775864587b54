use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use reforger_pipeline::{IngestConfig, IngestionService};
use reforger_types::{DomainEvent, EventKind};

/// reforger-ingest - Tails Arma Reforger server event logs and prints typed
/// game events as JSON lines
#[derive(Parser, Debug)]
#[command(name = "reforger-ingest")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file (optional, defaults are used otherwise)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing the server's event files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Directory for tail recovery records
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Only print these families or event names (comma separated)
    #[arg(short, long, value_delimiter = ',', value_name = "EVENT")]
    events: Vec<EventKind>,

    /// Print the event names the service publishes and exit
    #[arg(long)]
    list_events: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Events go to stdout, diagnostics to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = run(args).await;

    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

fn load_config(args: &Args) -> Result<IngestConfig> {
    let mut config = match &args.config {
        Some(path) => IngestConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => IngestConfig::default(),
    };

    if let Some(log_dir) = &args.log_dir {
        config.log_dir = log_dir.clone();
    }
    if let Some(state_dir) = &args.state_dir {
        config.state_dir = state_dir.clone();
    }
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let mut service = IngestionService::new(config);

    if args.list_events {
        for name in service.event_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let kinds = if args.events.is_empty() {
        EventKind::ALL.to_vec()
    } else {
        args.events.clone()
    };

    // Merge every subscription into one stream for printing
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Arc<DomainEvent>>();
    for kind in kinds {
        let mut subscription = service.subscribe(kind);
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });
    }
    drop(event_tx);

    let readers = service.start().await;
    if readers == 0 {
        anyhow::bail!("no readers could be started");
    }

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut output = Ok(());
    loop {
        tokio::select! {
            signal = &mut shutdown => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "failed to listen for ctrl-c");
                }
                break;
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = print_event(&event) {
                    output = Err(e);
                    break;
                }
            }
        }
    }

    service.stop().await;

    // Everything drained during stop is still printed
    if output.is_ok() {
        while let Some(event) = event_rx.recv().await {
            print_event(&event)?;
        }
    }
    output
}

fn print_event(event: &DomainEvent) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, event).context("failed to serialize event")?;
    writeln!(stdout).context("failed to write event")?;
    Ok(())
}
