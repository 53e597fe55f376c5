use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trailsift::report;
use trailsift_core::{export_csv_labelled, Config, Engine, HeuristicStrategy, TracingObserver};
use trailsift_remote::{HttpTransport, RemoteParser};

#[derive(Parser)]
#[command(
    name = "trailsift",
    version,
    about = "Normalise and triage document-management audit trails"
)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    /// (default: ~/.config/trailsift/config.toml, if present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Free-text strategy for rows without usable columns: probes or anchored.
    #[arg(long, global = true)]
    strategy: Option<HeuristicStrategy>,

    /// Log parse diagnostics to stderr at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Totals, categories, top users and documents, time range.
    Summary {
        /// Audit-trail export to read, or `-` for stdin.
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Every record, newest first.
    Records {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Normalised records as CSV.
    Export {
        file: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },
    /// Records that warrant priority review.
    KeyEvents {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Parse through the configured remote completion service.
    Remote {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Read `path` (or stdin for `-`) as UTF-8 text.
fn read_input(path: &Path) -> anyhow::Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8 text", path.display()))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let mut engine_config = config.engine();
    if let Some(strategy) = cli.strategy {
        engine_config.strategy = strategy;
    }
    let engine = Engine::new(engine_config).with_observer(Arc::new(TracingObserver));
    tracing::debug!(?engine, "engine configured");

    match cli.command {
        Command::Summary { file, json } => {
            let records = engine.parse(&read_input(&file)?);
            let summary = engine.summarize(&records);
            if json {
                print_json(&summary)?;
            } else {
                let key_events = engine.key_events(&records).len();
                println!("{}", report::render_summary(&summary, key_events));
            }
        }
        Command::Records { file, json } => {
            let records = engine.parse(&read_input(&file)?);
            if json {
                print_json(&records)?;
            } else {
                println!("{}", report::render_records(&records));
            }
        }
        Command::Export { file, output } => {
            let records = engine.parse(&read_input(&file)?);
            let csv = export_csv_labelled(&records);
            match output {
                Some(out) => std::fs::write(&out, format!("{csv}\n"))
                    .with_context(|| format!("failed to write {}", out.display()))?,
                None => println!("{csv}"),
            }
        }
        Command::KeyEvents { file, json } => {
            let records = engine.parse(&read_input(&file)?);
            let key_events = engine.key_events(&records);
            if json {
                print_json(&key_events)?;
            } else {
                println!("{}", report::render_records(key_events));
            }
        }
        Command::Remote { file, json } => {
            let content = read_input(&file)?;
            let transport = HttpTransport::from_config(&config.remote)
                .context("invalid remote configuration")?;
            let parser = RemoteParser::new(transport).with_engine_config(engine.config());
            let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
            let parsed = runtime
                .block_on(parser.parse(&content))
                .context("remote parse failed")?;
            if json {
                print_json(&parsed.records)?;
            } else {
                let key_events = engine.key_events(&parsed.records).len();
                println!("{}", report::render_summary(&parsed.summary, key_events));
                println!();
                println!("{}", report::render_records(&parsed.records));
            }
        }
    }

    Ok(())
}
