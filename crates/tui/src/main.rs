mod app;
mod page;
mod renderer;

use std::fs::{self, File};
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_core::views::ViewMetrics;
use folio_core::{FolioConfig, Portfolio, load_config};
use folio_protocol::{Point, ThemeToken, Viewport};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    widgets::Paragraph,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use crate::app::App;
use crate::renderer::{draw_frame, theme_to_color};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: folio [--config <folio.toml>] [--content <portfolio.json>] \
                     [--snapshot <out.svg> [--offset <px>]]";
const LOG_FILE: &str = "folio.log";
const SNAPSHOT_SIZE: (f64, f64) = (1280.0, 800.0);

struct Args {
    config: PathBuf,
    content: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    offset: f64,
}

fn main() -> Result<()> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        writeln!(stdout().lock(), "{USAGE}")?;
        return Ok(());
    };
    let reload_handle = init_tracing()?;
    let config = load_config(&args.config);
    set_log_level(&reload_handle, config.log_level.as_filter_str());
    info!(level = %config.log_level, theme = ?config.theme, "Starting folio");

    let portfolio = load_portfolio(args.content.as_deref())?;
    let result = match &args.snapshot {
        Some(path) => write_snapshot(config, portfolio, path, args.offset),
        None => run_tui(config, portfolio),
    };
    if let Err(err) = &result {
        error!("{err:?}");
    }
    result
}

/// `None` when help was requested.
fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args {
        config: PathBuf::from("folio.toml"),
        content: None,
        snapshot: None,
        offset: 0.0,
    };
    let mut rest = raw.into_iter();
    while let Some(flag) = rest.next() {
        let mut value = || rest.next().ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"));
        match flag.as_str() {
            "--config" => args.config = PathBuf::from(value()?),
            "--content" => args.content = Some(PathBuf::from(value()?)),
            "--snapshot" => args.snapshot = Some(PathBuf::from(value()?)),
            "--offset" => {
                let raw = value()?;
                args.offset = raw
                    .parse()
                    .with_context(|| format!("invalid --offset `{raw}`"))?;
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(anyhow!("unknown argument `{other}`\n{USAGE}")),
        }
    }
    Ok(Some(args))
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing() -> Result<ReloadHandle> {
    let file = File::create(LOG_FILE).with_context(|| format!("failed to create {LOG_FILE}"))?;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    Ok(handle)
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    // RUST_LOG wins over the config file.
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}

fn load_portfolio(path: Option<&Path>) -> Result<Portfolio> {
    match path {
        Some(path) => {
            let data =
                fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let portfolio = Portfolio::from_json(&data)?;
            info!(path = %path.display(), projects = portfolio.projects.len(), "Loaded content");
            Ok(portfolio)
        }
        None => Ok(Portfolio::bundled()?),
    }
}

/// Render one frame at `offset` as SVG, with every entrance already done.
fn write_snapshot(
    config: FolioConfig,
    portfolio: Portfolio,
    path: &Path,
    offset: f64,
) -> Result<()> {
    let (width, height) = SNAPSHOT_SIZE;
    let theme = config.theme;
    let mut app = App::new(
        config,
        portfolio,
        ViewMetrics::PIXELS,
        Viewport::new(width, height),
    );
    app.mount(Duration::ZERO);
    app.scroll_to(offset);
    let settled = Duration::from_secs(60);
    app.tick(settled);
    // First render reveals the footer; the second lets its rows stagger in.
    app.render(settled);
    let commands = app.render(settled + Duration::from_secs(5)).flatten();
    let svg = folio_core::svg::render_svg(&commands, width, height, theme);
    fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), offset, commands = commands.len(), "Wrote snapshot");
    Ok(())
}

fn run_tui(config: FolioConfig, portfolio: Portfolio) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, config, portfolio);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: FolioConfig,
    portfolio: Portfolio,
) -> Result<()> {
    let theme = config.theme;
    let poll_interval = config.frame_interval();
    let size = terminal.size()?;
    let mut app = App::new(
        config,
        portfolio,
        ViewMetrics::CELLS,
        page_viewport(size.width, size.height),
    );
    let started = Instant::now();
    app.mount(Duration::ZERO);

    loop {
        let now = started.elapsed();
        app.tick(now);
        let frame = app.render(now);

        terminal.draw(|f| {
            let area = f.area();
            let page_area = Rect::new(0, 0, area.width, area.height.saturating_sub(1));
            draw_frame(f.buffer_mut(), page_area, frame, theme);

            let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            let status = Paragraph::new(
                " folio | ↑↓ scroll | PgUp/PgDn | click jumps | Tab select | c filter | q quit ",
            )
            .style(
                Style::default()
                    .fg(theme_to_color(ThemeToken::TextSecondary, theme))
                    .bg(theme_to_color(ThemeToken::Surface, theme)),
            );
            f.render_widget(status, status_area);
        })?;

        if !event::poll(poll_interval)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => app.scroll_step(1.0),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_step(-1.0),
                KeyCode::PageDown | KeyCode::Char(' ') => app.page_by(1.0),
                KeyCode::PageUp => app.page_by(-1.0),
                KeyCode::Home => app.scroll_to(0.0),
                KeyCode::End => app.scroll_to_end(),
                KeyCode::Tab | KeyCode::Right => app.select_relative(1),
                KeyCode::BackTab | KeyCode::Left => app.select_relative(-1),
                KeyCode::Char('c') => {
                    app.cycle_project_filter();
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let point = Point::new(f64::from(mouse.column), f64::from(mouse.row));
                match mouse.kind {
                    MouseEventKind::ScrollDown => app.scroll_step(1.0),
                    MouseEventKind::ScrollUp => app.scroll_step(-1.0),
                    MouseEventKind::Down(MouseButton::Left) => app.click(point),
                    MouseEventKind::Moved => app.hover(point),
                    _ => {}
                }
            }
            Event::Resize(width, height) => app.resize(page_viewport(width, height)),
            _ => {}
        }
    }

    app.unmount();
    Ok(())
}

/// The bottom row holds the status line.
fn page_viewport(width: u16, height: u16) -> Viewport {
    Viewport::new(f64::from(width), f64::from(height.saturating_sub(1)))
}
