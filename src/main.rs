//! Terminal tile runner (default binary).
//!
//! Walks a player sprite around the configured map. Keyboard arrows/WASD and
//! mouse drags move, a click or Space is the action. Usage:
//!
//! ```text
//! tui-tiles [--config path/to/game.json]
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see them.

use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use tui_tiles::core::{Container, ElementBox, ElementId, Host, HostNotification, HostSurface, SurfaceProbe};
use tui_tiles::input::{pointer_from_mouse, should_quit, InputUnifier, KeyTranslator, RawInput};
use tui_tiles::term::{
    viewport_dots, CellStyle, FrameBuffer, MemoryBackend, Presenter, TerminalRenderer, TileRenderer,
};
use tui_tiles::types::{Drawable, Input, Position, Rgb};
use tui_tiles::{GameConfig, MapConfig};

/// Terminal region above the status line.
const GAME_REGION: ElementId = ElementId(1);

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_config_arg(&args)? {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut term = TerminalRenderer::new();
    let reports_repeats = term.enter()?;

    let result = run(&mut term, &config, reports_repeats);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_config_arg(args: &[String]) -> Result<Option<&str>> {
    match args {
        [] => Ok(None),
        [flag, path] if flag == "--config" => Ok(Some(path.as_str())),
        [flag] if flag == "--config" => Err(anyhow!("missing value for --config")),
        other => Err(anyhow!("unexpected arguments: {}", other.join(" "))),
    }
}

fn game_region(cols: u16, rows: u16) -> ElementBox {
    let (width, height) = viewport_dots(cols, rows.saturating_sub(1));
    ElementBox::new(width, height, 0.0, 0.0)
}

/// The canvas is letterboxed inside the game region, never under the status line.
fn game_renderer(config: &GameConfig, probe: Rc<dyn SurfaceProbe>) -> Result<TileRenderer> {
    TileRenderer::new(
        config.renderer.clone(),
        Container::new(HostSurface::Element(GAME_REGION), probe),
        &mut MemoryBackend::new(),
    )
}

/// Keep the player centered on screen.
fn camera_for(player: Position, config: &GameConfig) -> Position {
    let half_w = (config.renderer.screen_width / 2) as i32;
    let half_h = (config.renderer.screen_height / 2) as i32;
    (player.0 - half_w, player.1 - half_h)
}

fn step(player: Position, input: Input, map: &MapConfig) -> Position {
    let Some((dx, dy)) = input.delta() else {
        return player;
    };
    let next = (player.0 + dx, player.1 + dy);
    if map.is_walkable(next) {
        next
    } else {
        player
    }
}

fn run(term: &mut TerminalRenderer, config: &GameConfig, reports_repeats: bool) -> Result<()> {
    let (mut cols, mut rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let (w, h) = viewport_dots(cols, rows);
    let host = Rc::new(Host::new(w, h));
    host.set_element(GAME_REGION, game_region(cols, rows));
    let probe: Rc<dyn SurfaceProbe> = host.clone();

    let mut renderer = game_renderer(config, probe.clone())?;
    let mut unifier = InputUnifier::new(
        config.input.clone(),
        Container::new(HostSurface::Element(GAME_REGION), probe),
    );
    let mut keys = KeyTranslator::new(reports_repeats);
    let presenter = Presenter::new(Rgb::BLACK);
    let status_style = CellStyle::default().dimmed();

    let world = config.map.placed_tiles();
    let mut player = config.map.player.position;
    let mut last_input: Option<Input> = None;
    let mut actions: u32 = 0;

    let mut fb = FrameBuffer::new(cols, rows);
    let mut drawables: Vec<Drawable<'_>> = Vec::with_capacity(world.len() + 1);
    let mut raws: Vec<RawInput> = Vec::new();

    let start = Instant::now();
    let tick = Duration::from_millis(config.map.tick_ms);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        drawables.clear();
        drawables.extend(world.iter().map(|&(pos, tile)| Drawable::new(tile, pos)));
        drawables.push(Drawable::new(&config.map.player.sprite, player));
        renderer.render(&drawables, camera_for(player, config));

        fb.resize(cols, rows);
        presenter.compose_into(renderer.context(), &renderer.placement(), &mut fb);
        let status = format!(
            " pos {:>3},{:<3} last {:<6} actions {}  q quits",
            player.0,
            player.1,
            last_input.map(|i| i.as_str()).unwrap_or("-"),
            actions
        );
        fb.put_str(0, rows.saturating_sub(1), &status, status_style);
        term.draw_swap(&mut fb)?;

        // Input until the next tick.
        let timeout = tick
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            loop {
                let ev = event::read()?;
                let now = start.elapsed().as_millis() as u64;
                match ev {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press && should_quit(key) {
                            return Ok(());
                        }
                        if let Some(down) = keys.translate(key, now) {
                            raws.push(RawInput::Key(down));
                        }
                    }
                    Event::Mouse(mouse) => {
                        if let Some(pointer) = pointer_from_mouse(mouse, now) {
                            raws.push(RawInput::Pointer(pointer));
                        }
                    }
                    Event::FocusGained => raws.push(RawInput::Focus(true)),
                    Event::FocusLost => raws.push(RawInput::Focus(false)),
                    Event::Resize(c, r) => {
                        cols = c;
                        rows = r;
                        let (w, h) = viewport_dots(cols, rows);
                        host.set_viewport(w, h);
                        host.set_element(GAME_REGION, game_region(cols, rows));
                        renderer.handle_layout(HostNotification::ElementResized(GAME_REGION));
                        raws.push(RawInput::Layout(HostNotification::ElementResized(GAME_REGION)));
                        term.invalidate();
                    }
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }

            let mut pending = raws.drain(..).peekable();
            while pending.peek().is_some() {
                for input in unifier.handle_batch(&mut pending) {
                    match input {
                        Input::Action => actions += 1,
                        _ => player = step(player, input, &config.map),
                    }
                    last_input = Some(input);
                }
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_parsing() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(parse_config_arg(&args(&[])).unwrap(), None);
        assert_eq!(
            parse_config_arg(&args(&["--config", "a.json"])).unwrap(),
            Some("a.json")
        );
        assert!(parse_config_arg(&args(&["--config"])).is_err());
        assert!(parse_config_arg(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn player_stops_at_solid_tiles() {
        let config = GameConfig::default();
        let start = config.map.player.position;
        // (2, 1) has the wall directly above.
        assert_eq!(step(start, Input::Up, &config.map), start);
        assert_eq!(step(start, Input::Right, &config.map), (3, 1));
        assert_eq!(step(start, Input::Action, &config.map), start);
    }

    #[test]
    fn game_region_excludes_status_line() {
        let region = game_region(80, 24);
        assert_eq!(region.client_width, 80.0);
        assert_eq!(region.client_height, 46.0);
    }

    #[test]
    fn canvas_stays_above_status_line_on_short_terminals() {
        let (cols, rows) = (40, 4);
        let (w, h) = viewport_dots(cols, rows);
        let host = Rc::new(Host::new(w, h));
        host.set_element(GAME_REGION, game_region(cols, rows));
        let probe: Rc<dyn SurfaceProbe> = host.clone();
        let mut renderer = game_renderer(&GameConfig::default(), probe).unwrap();

        let status_top = f64::from(rows - 1) * 2.0;
        let p = renderer.placement();
        assert_eq!((p.width, p.height), (6.0, 4.0));
        assert!(p.top + p.height <= status_top);

        host.set_viewport(w, viewport_dots(cols, 10).1);
        host.set_element(GAME_REGION, game_region(cols, 10));
        assert!(renderer.handle_layout(HostNotification::ElementResized(GAME_REGION)));
        assert!(!renderer.handle_layout(HostNotification::ViewportResized));
        let p = renderer.placement();
        assert!(p.top + p.height <= 18.0);
    }
}
