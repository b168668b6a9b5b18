use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::meter::VuTiming;
use crate::persist::StateStore;
use crate::playback::Player;

mod event_loop;
mod logging;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

const USAGE: &str = "usage: linamp [--default-config] [FILE|DIR]...";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    if args.iter().any(|a| a == "--default-config") {
        print!("{}", Settings::default().to_toml()?);
        return Ok(());
    }

    let (settings, warnings) = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings) {
        eprintln!("linamp: logging disabled: {e}");
    }
    for w in warnings {
        log::warn!("{w}");
    }

    let inputs: Vec<PathBuf> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(|a| startup::expand_home(a))
        .collect();
    let store = settings.state_file().map(StateStore::new);
    if store.is_none() {
        log::warn!("no state file location (HOME unset); playlist will not be saved");
    }

    let (engine, events) = AudioPlayer::new();
    let mut player = Player::new(
        engine,
        VuTiming::from(&settings.meter),
        Duration::from_millis(settings.playback.seek_grace_ms),
    );
    startup::restore_session(&mut player, store.as_ref(), &inputs, &settings);
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        &events,
        store.as_ref(),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    log::info!("bye");
    run_result
}
