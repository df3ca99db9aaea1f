//! leapedit entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{DispatcherConfig, InputDispatcher};
use core_config::{Config, load_from};
use core_events::{EVENT_CHANNEL_CAP, Event, TokioHelpScheduler};
use core_state::Editor;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};
use runtime::{EditorRuntime, ShutdownReason};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
mod script;

const LOG_FILE: &str = "leapedit.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "leapedit", version, about = "Leap-driven text editor core")]
struct Args {
    /// Optional path to open at startup (UTF-8 text). A missing file starts empty.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `leapedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Replay a key script headlessly instead of reading the terminal.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; drop guard so the writer shuts down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn load_editor(path: Option<&Path>, config: &Config) -> Result<Editor> {
    let content = match path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(target: "io", file = %path.display(), size_bytes = content.len(), "file_read_ok");
                content.replace("\r\n", "\n")
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(target: "io", file = %path.display(), "file_missing_starting_empty");
                String::new()
            }
            Err(e) => {
                error!(target: "io", ?e, "file_open_error");
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        },
        None => String::new(),
    };
    Ok(Editor::from_text(&content).with_undo_capacity(config.undo_capacity()))
}

/// Raw-mode session; restores the terminal on drop.
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        let mut out = io::stdout();
        execute!(out, EnableBracketedPaste)?;
        if enhanced {
            // Key releases are needed for the Leap quasimode.
            execute!(
                out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }
        info!(target: "runtime", enhanced, "terminal_entered");
        Ok(Self { enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = execute!(io::stdout(), DisableBracketedPaste);
    let _ = disable_raw_mode();
}

async fn run_live(runtime: &mut EditorRuntime, tx: mpsc::Sender<Event>) -> Result<ShutdownReason> {
    let guard = TerminalGuard::enter()?;
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);
    let reason = runtime.run().await;

    input_shutdown.signal();
    match input_task.await {
        Ok(_) => info!(target: "runtime.shutdown", "input_task_joined"),
        Err(err) if err.is_cancelled() => info!(target: "runtime.shutdown", "input_task_cancelled"),
        Err(err) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
    }
    drop(guard);
    Ok(reason)
}

fn print_outcome(runtime: &EditorRuntime) -> Result<()> {
    let editor = runtime.editor();
    let mut out = io::stdout().lock();
    write!(out, "{}", editor.text())?;
    out.flush()?;
    let selection = match editor.selection().range() {
        Some((a, b)) => format!("{a}..{b}"),
        None => "none".to_string(),
    };
    eprintln!(
        "caret={} selection={} mode={:?}",
        editor.caret(),
        selection,
        runtime.dispatcher().mode().kind()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let editor = load_editor(args.path.as_deref(), &config)?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let dispatcher = InputDispatcher::new(
        DispatcherConfig::from_config(&config),
        Box::new(TokioHelpScheduler::new(tx.clone())),
    );
    let mut runtime = EditorRuntime::new(editor, dispatcher, rx);

    let reason = match args.script.as_ref() {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            let steps = script::parse(&source)
                .with_context(|| format!("parsing script {}", path.display()))?;
            info!(target: "runtime", steps = steps.len(), "script_loaded");
            runtime.replay(&steps).await
        }
        None => run_live(&mut runtime, tx).await?,
    };
    info!(target: "runtime", reason = reason.as_str(), "shutdown");

    print_outcome(&runtime)
}
