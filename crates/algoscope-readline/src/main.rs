use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use algoscope_application::{RejectReason, SendOutcome, SessionStore};
use algoscope_core::config::{AppConfig, LoggingConfig};
use algoscope_core::gateway::AnalysisGateway;
use algoscope_core::theme::ThemeMode;
use algoscope_infrastructure::{AlgoscopePaths, ConfigService};
use algoscope_interaction::HttpAnalysisGateway;

mod commands;
mod helper;
mod render;

use commands::{Command, parse_input};
use helper::CliHelper;
use render::{DiagramRenderer, PlainDiagramRenderer};

#[derive(Parser)]
#[command(name = "algoscope")]
#[command(about = "Chat with an algorithm complexity analyzer", long_about = None)]
struct Args {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Color theme to start with (light or dark)
    #[arg(long)]
    theme: Option<ThemeMode>,

    /// Do not restore chats from the service cache
    #[arg(long)]
    no_cache: bool,
}

impl Args {
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.base_url {
            config.gateway.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.gateway.request_timeout_secs = Some(secs);
        }
        if let Some(theme) = self.theme {
            config.ui.theme = theme;
        }
        config
    }
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let service = match &args.config {
        Some(path) => ConfigService::new(path),
        None => ConfigService::at_default_location()?,
    };
    let config = service
        .load()
        .with_context(|| format!("failed to load {}", service.path().display()))?;
    Ok(args.apply(config))
}

/// Routes tracing output to a daily log file; the terminal belongs to the REPL.
fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let directory = match &config.directory {
        Some(dir) => dir.clone(),
        None => AlgoscopePaths::logs_dir()?,
    };
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::daily(&directory, "algoscope.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Resolves a `/switch` argument: a 1-based list position or a session id.
async fn resolve_session_ref(store: &SessionStore, reference: &str) -> String {
    if let Ok(n) = reference.parse::<usize>() {
        let sessions = store.sessions().await;
        if let Some(session) = n.checked_sub(1).and_then(|i| sessions.get(i)) {
            return session.id.clone();
        }
    }
    reference.to_string()
}

fn print_rejection(reason: RejectReason) {
    let text = match reason {
        RejectReason::NoCurrentSession => "No chat selected. Use /new or /switch.",
        RejectReason::NoInputMode => {
            "Choose the input mode first: /mode pseudocode or /mode natural"
        }
        RejectReason::RequestInFlight => "An analysis is already running. Please wait.",
        RejectReason::NothingToRetry => "Nothing to retry in this chat.",
    };
    println!("{}", text.yellow());
}

async fn show_last_answer(store: &SessionStore, renderer: &dyn DiagramRenderer) {
    let is_dark = store.theme().await.is_dark();
    if let Some(message) = store
        .current_session()
        .await
        .and_then(|session| session.messages().last().cloned())
    {
        render::print_message(&message, renderer, is_dark);
    }
}

/// Runs one parsed command. Returns `false` when the REPL should exit.
async fn handle_command(
    store: &SessionStore,
    renderer: &dyn DiagramRenderer,
    command: Command,
) -> bool {
    match command {
        Command::Quit => return false,
        Command::Help => render::print_help(),
        Command::New => {
            store.create_session().await;
            println!("{}", "New chat created. Choose /mode pseudocode or /mode natural.".bright_green());
        }
        Command::List => {
            let current = store.current_session_id().await;
            render::print_session_list(&store.sessions().await, current.as_deref());
        }
        Command::Switch(reference) => {
            let id = resolve_session_ref(store, &reference).await;
            match store.set_current_session(&id).await {
                Ok(()) => {
                    if let Some(session) = store.current_session().await {
                        let is_dark = store.theme().await.is_dark();
                        render::print_session(&session, renderer, is_dark);
                    }
                }
                Err(e) => println!("{}", e.to_string().red()),
            }
        }
        Command::Rename(title) => {
            let applied = match store.current_session_id().await {
                Some(id) => store.rename_session(&id, &title).await,
                None => false,
            };
            if applied {
                println!("{}", format!("Renamed to \"{}\"", title.trim()).bright_green());
            }
        }
        Command::Mode(mode) => {
            if store.set_input_mode(mode).await {
                println!("{}", format!("Input mode: {mode}").bright_green());
            } else {
                println!("{}", "This chat already has an input mode.".yellow());
            }
        }
        Command::Theme => {
            let theme = store.toggle_theme().await;
            println!("{}", format!("Theme: {theme}").bright_green());
        }
        Command::Show => {
            if let Some(session) = store.current_session().await {
                let is_dark = store.theme().await.is_dark();
                render::print_session(&session, renderer, is_dark);
            }
        }
        Command::Retry => report_send(store, renderer, store.retry_last().await).await,
        Command::Send(content) => {
            println!("{}", "Analyzing...".yellow());
            let outcome = store.send_message(&content).await;
            report_send(store, renderer, outcome).await;
        }
    }
    true
}

async fn report_send(store: &SessionStore, renderer: &dyn DiagramRenderer, outcome: SendOutcome) {
    match outcome {
        SendOutcome::Rejected(reason) => print_rejection(reason),
        SendOutcome::Discarded => {
            println!("{}", "The chat was replaced while analyzing; result discarded.".yellow())
        }
        SendOutcome::Answered | SendOutcome::Failed(_) => show_last_answer(store, renderer).await,
    }
}

/// The main entry point for the Algoscope readline REPL.
///
/// 1. Loads config (file, then `ALGOSCOPE_BASE_URL`, then CLI flags)
/// 2. Sets up file logging and the HTTP gateway
/// 3. Restores cached chats in the background
/// 4. Runs the REPL until `/quit` or EOF
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    let _log_guard = init_logging(&config.logging)?;
    tracing::info!("[Main] Using analysis service at {}", config.gateway.base_url);

    let gateway: Arc<dyn AnalysisGateway> = Arc::new(HttpAnalysisGateway::new(
        &config.gateway.base_url,
        config.gateway.request_timeout_secs.map(Duration::from_secs),
    )?);
    let store = Arc::new(SessionStore::with_theme(gateway, config.ui.theme));

    if !args.no_cache {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store.rehydrate_from_cache().await;
        });
    }

    let renderer = PlainDiagramRenderer;
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Algoscope ===".bright_magenta().bold());
    println!(
        "{}",
        "Pick an input mode with /mode, then write pseudocode or a description. /help lists commands."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match parse_input(&line) {
                    Ok(Some(command)) => {
                        if !handle_command(&store, &renderer, command).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{}", message.red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::try_parse_from([
            "algoscope",
            "--theme",
            "Dark",
            "--base-url",
            "http://analyzer:9000",
        ])
        .unwrap();
        let config = args.apply(AppConfig::default());

        assert_eq!(config.ui.theme, ThemeMode::Dark);
        assert_eq!(config.gateway.base_url, "http://analyzer:9000");
        assert!(Args::try_parse_from(["algoscope", "--theme", "sepia"]).is_err());
    }
}
