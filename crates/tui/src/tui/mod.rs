use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use crate::config::AppConfig;
use crate::core::TasksService;

mod app;
mod constants;
mod dispatch;
mod helpers;

use app::App;
use constants::TICK_RATE;
use dispatch::Dispatcher;

type Backend = CrosstermBackend<Stdout>;

pub fn run(config: AppConfig, service: TasksService) -> Result<()> {
    info!(api = config.api_base_url(), "starting terminal UI");
    // Start the runtime before touching the terminal so a failure leaves it intact.
    let mut dispatcher = Dispatcher::new(service)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
    terminal.hide_cursor().context("failed to hide cursor")?;

    let mut app = App::new(config);
    let result = run_app(&mut terminal, &mut app, &mut dispatcher);

    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    dispatcher.shutdown();
    result
}

fn run_app(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    dispatcher: &mut Dispatcher,
) -> Result<()> {
    let mut last_tick = Instant::now();
    loop {
        for request in app.take_requests() {
            dispatcher.send(request);
        }
        for reply in dispatcher.drain() {
            app.on_reply(reply);
        }

        terminal.draw(|f| app.draw(f))?;
        if app.should_quit() {
            break;
        }

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }
    }

    Ok(())
}
