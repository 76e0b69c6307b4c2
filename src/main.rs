use std::fs::File;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use galactatec::app::App;
use galactatec::audio::AudioContext;
use galactatec::config::{config_path, Settings};
use galactatec::event::{Event, EventHandler};
use galactatec::game::input::system_hub;
use galactatec::ui;

/// The terminal belongs to the UI, so log lines go to a file.
fn init_logging(path: &Path) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(path) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load();
    init_logging(&settings.log_file);
    log::info!("Galactatec {} starting", env!("CARGO_PKG_VERSION"));

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let exact_keys = supports_keyboard_enhancement().unwrap_or(false);
    if exact_keys {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    log::info!("Key release reporting: {}", exact_keys);
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let tick_rate = Duration::from_secs_f64(1.0 / f64::from(settings.tick_rate_hz.max(1)));
    let audio = AudioContext::open(settings.music_volume);
    let mut hub = system_hub();
    let mut app = App::new(settings, audio, hub.as_mut(), exact_keys).persist_settings(config_path());
    let event_handler = EventHandler::new(tick_rate);

    let result = run(&mut terminal, &mut app, &event_handler);
    app.shutdown();

    // Restore terminal
    if exact_keys {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    log::info!("Galactatec closed");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> anyhow::Result<()> {
    loop {
        if let Some(title) = app.take_title() {
            execute!(terminal.backend_mut(), SetTitle(title))?;
        }
        terminal.draw(|frame| ui::render(frame, app, Instant::now()))?;

        match events.next()? {
            Event::Tick(dt) => app.on_tick(dt, Instant::now()),
            Event::Key(key) => app.on_key(key, Instant::now()),
            Event::Resize => terminal.autoresize()?,
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
