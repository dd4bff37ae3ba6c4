//! A scroll-driven poster carousel for the terminal.
//!
//! Run the binary with image files or directories to browse them as a
//! horizontally snapping strip of posters over a crossfading backdrop.
//! Run with `--write-config` to persist the effective settings and exit.

mod app;
mod config;
mod core;
mod error;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, widgets::Paragraph, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    image_runtime::{spawn_image_loads, ImageUpdate},
    state::AppState,
};
use crate::core::{carousel::Engine, library, position::FRAME_INTERVAL};
use crate::ui::{
    backdrop::BackdropWidget,
    indicator::IndicatorRow,
    layout::AppLayout,
    posters::{PosterStrip, StripGeometry},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven poster carousel")]
struct Cli {
    /// Image files or directories to show (defaults to `.`).
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// Include hidden (dot) files.
    #[arg(long)]
    hidden: bool,

    /// Logical viewport width in px.
    #[arg(long)]
    viewport_width: Option<f64>,

    /// Item width as a fraction of the viewport.
    #[arg(long)]
    item_fraction: Option<f64>,

    /// Peak poster lift in px.
    #[arg(long)]
    displacement: Option<f64>,

    /// Minimum interval between drag updates, in milliseconds.
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// Save the effective configuration and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Layer command-line overrides over the loaded config.
    fn apply(&self, config: &mut config::AppConfig) {
        let c = &mut config.carousel;
        if let Some(v) = self.viewport_width {
            c.viewport_width = v;
        }
        if let Some(v) = self.item_fraction {
            c.item_fraction = v;
        }
        if let Some(v) = self.displacement {
            c.displacement = v;
        }
        if let Some(ms) = self.throttle_ms {
            c.scroll_throttle = Duration::from_millis(ms);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut user_config = config::AppConfig::load();
    cli.apply(&mut user_config);
    let engine = Engine::new(&user_config.carousel)?;

    if cli.write_config {
        let path = user_config.save()?;
        println!("{}", path.display());
        return Ok(());
    }

    let discover = library::DiscoverConfig {
        recursive: cli.recursive,
        show_hidden: cli.hidden,
    };
    let mut state = AppState::new(user_config, engine, cli.paths, discover);
    tracing::info!(
        pitch = engine.pitch(),
        displacement = engine.displacement(),
        "carousel ready"
    );

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(FRAME_INTERVAL);
    let (image_tx, mut image_rx) = tokio::sync::mpsc::unbounded_channel::<ImageUpdate>();

    // ── event loop ────────────────────────────────────────────
    let mut needs_draw = true;
    loop {
        if needs_draw {
            needs_draw = false;
            state.position.mark_seen();
            draw(&mut terminal, &mut state)?;
        }

        // Rescan after the draw so the loading placeholder shows first.
        if state.needs_reload {
            state.needs_reload = false;
            let found = library::discover(&state.inputs, &state.discover);
            let (generation, to_load) = state.set_items(found);
            tracing::info!(generation, count = to_load.len(), "loading posters");
            spawn_image_loads(image_tx.clone(), generation, to_load);
            needs_draw = true;
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => {
                        handler::handle_key(&mut state, k);
                        needs_draw = true;
                    }
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m, Instant::now()),
                    AppEvent::Resize(_, _) => needs_draw = true,
                    AppEvent::Tick => {}
                }
            }

            Some(update) = image_rx.recv() => {
                state.apply_image_update(update);
                // Drain everything already queued before redrawing.
                while let Ok(update) = image_rx.try_recv() {
                    state.apply_image_update(update);
                }
                needs_draw = true;
            }
        }

        state.scroll.tick(Instant::now());
        needs_draw |= state.position.has_changed();

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stderr>>, state: &mut AppState) -> Result<()> {
    terminal.draw(|frame| {
        let layout = AppLayout::from_area(frame.area());
        state.strip_area = layout.strip_area;

        let carousel = &state.config.carousel;
        let snapshot = state.frame();

        frame.render_widget(
            BackdropWidget {
                opacities: &snapshot.backdrops,
                images: &state.images,
            },
            layout.backdrop_area,
        );
        frame.render_widget(
            PosterStrip {
                frame: &snapshot,
                sequence: &state.sequence,
                images: &state.images,
                failed: &state.failed,
                geometry: StripGeometry::new(
                    carousel.viewport_width,
                    carousel.spacing,
                    state.engine.pitch(),
                    state.engine.displacement(),
                    layout.strip_area,
                ),
                loading: state.loading || state.needs_reload,
            },
            layout.strip_area,
        );
        frame.render_widget(
            IndicatorRow {
                frame: &snapshot,
                viewport_width: carousel.viewport_width,
            },
            layout.indicator_area,
        );

        let hint = state.config.status_bar_hint();
        let message = state.status_message.as_deref().unwrap_or(&hint);
        let status_text = match state.current_item() {
            Some((index, item)) => format!(
                " {} ({}/{}) │ {message}",
                item.label(),
                index + 1,
                state.sequence.real_len()
            ),
            None => format!(" {message}"),
        };
        let status = Paragraph::new(status_text).style(Theme::status_bar_style());
        frame.render_widget(status, layout.status_area);
    })?;
    Ok(())
}
