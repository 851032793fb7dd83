mod actions;
mod api;
mod app;
mod constants;
mod debounce;
mod events;
mod insert;
mod state;
mod ui;

use std::io;
use std::sync::mpsc;

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use api::ApiEvent;
use app::App;
use constants::{DEFAULT_SERVER_URL, DOT_DIR, SERVER_URL_ENV};

fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Server base URL: CLI arg > env var > default
    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .cloned()
        .or_else(|| std::env::var(SERVER_URL_ENV).ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let base_url = base_url.trim_end_matches('/').to_string();

    // Panic hook: restore terminal state and log the panic to disk.
    // Without this, a panic leaves the terminal in raw mode + alternate screen
    // and the error is lost.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableBracketedPaste);
        let _ = io::stdout().execute(LeaveAlternateScreen);

        let error_dir = std::path::Path::new(DOT_DIR).join("errors");
        let _ = std::fs::create_dir_all(&error_dir);
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!(
            "[{}] {}\n\n{}\n\n---\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            info,
            backtrace
        );
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(error_dir.join("panic.log"))
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(msg.as_bytes())
            });

        default_hook(info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let (tx, rx) = mpsc::channel::<ApiEvent>();
    let mut app = App::new(base_url);
    let result = app.run(&mut terminal, tx, rx);

    disable_raw_mode()?;
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
