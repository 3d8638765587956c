use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use playchrome::{
    analytics,
    app::{cli::Args, state::App},
    config,
    events::types::AppEvent,
    input, logging,
    player::{
        adapter::StateCodes, clock::EngineClock, commands::PlayerCommand, engine::ThreadEngine,
        source,
    },
    ui,
    widget::PlayerWidget,
};

const MAX_WAIT: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(ref path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut config = config::load_or_create_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    args.apply(&mut config);

    let _log_guard = logging::init(&config.log_level)?;
    tracing::info!(config = %config_path.display(), video_id = %config.video_id, "starting");

    let media_path = source::resolve(&config.media_dir, &config.video_id)?;

    ui::theme::init_theme(config.theme);
    let _beacon = analytics::initialize(&config.analytics, &config.video_id);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let (player_cmd_tx, player_cmd_rx) = mpsc::channel::<PlayerCommand>();

    let variant = config.variant.into();
    let clock = Arc::new(EngineClock::new(0));
    let engine = ThreadEngine::new(player_cmd_tx.clone(), clock.clone());
    let widget = PlayerWidget::new(
        config.video_id.clone(),
        config.player_vars,
        variant,
        StateCodes::default(),
    );
    let mut app = App::new(widget, engine);

    let mut terminal = ratatui::init();

    let _input_handle = input::thread::spawn(event_tx.clone());
    let player_handle = playchrome::player::thread::spawn(player_cmd_rx, event_tx.clone(), clock);
    let _ = player_cmd_tx.send(PlayerCommand::Load { path: media_path });

    let outcome = run(&mut terminal, &mut app, &event_rx);

    let _ = app.widget.unmount();
    let _ = player_cmd_tx.send(PlayerCommand::Shutdown);
    let _ = player_handle.join();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture);
    ratatui::restore();

    outcome
}

fn run(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App<ThreadEngine>,
    event_rx: &mpsc::Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render::render(f, app))?;

        let wait = app
            .widget
            .next_tick_in(Instant::now())
            .map_or(MAX_WAIT, |due| due.min(MAX_WAIT));

        match event_rx.recv_timeout(wait) {
            Ok(event) => {
                let now = Instant::now();
                match event {
                    AppEvent::Input(key_event) => app.handle_input(key_event, now),
                    AppEvent::Mouse(mouse_event) => app.handle_mouse(mouse_event, now),
                    AppEvent::Resize(_width, _height) => {}
                    AppEvent::EngineReady => app.on_engine_ready(now),
                    AppEvent::EngineState(code) => app.on_engine_state(code, now),
                    AppEvent::PlayerError(e) => app.on_player_error(e),
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                anyhow::bail!("Event channel disconnected");
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            tracing::info!("quitting");
            return Ok(());
        }
    }
}
