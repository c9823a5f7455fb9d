use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use maze_game::config::{DEFAULT_STEPS_PER_TICK, MAZE_HEIGHT, MAZE_WIDTH};
use maze_game::{
    Dir, Game, GameConfig, HeldKeys, Input, MazeResult, Phase, Pos, TickOutcome, Tile,
};
use rand::Rng;
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const DEFAULT_TICK_MS: u64 = 40;
const DEFAULT_RENDER_FPS: u64 = 60;
const INPUT_HOLD_MS: u64 = 120;
const GOAL_BANNER: &str = " GOAL! ";

/// Watch a maze being carved, then walk it from start to goal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = MAZE_WIDTH)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = MAZE_HEIGHT)]
    height: usize,

    /// Start cell, defaults to the bottom-right corner
    #[arg(long, value_name = "X,Y", value_parser = parse_cell)]
    start: Option<Pos>,

    /// Goal cell, defaults to the top-left corner
    #[arg(long, value_name = "X,Y", value_parser = parse_cell)]
    goal: Option<Pos>,

    /// Carving steps taken per tick
    #[arg(long, default_value_t = DEFAULT_STEPS_PER_TICK)]
    steps_per_tick: usize,

    /// Skip the carving animation
    #[arg(long)]
    instant: bool,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds per tick [env: MAZE_TICK_MS]
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Render rate [env: MAZE_FPS]
    #[arg(long)]
    fps: Option<u64>,

    /// Write logs here; RUST_LOG filters them
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let mut config = GameConfig::with_size(self.width, self.height);
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(goal) = self.goal {
            config.goal = goal;
        }
        config.steps_per_tick = self.steps_per_tick;
        config.instant = self.instant;
        config.seed = self.seed;
        config
    }
}

fn parse_cell(s: &str) -> Result<Pos, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<usize>().map_err(|e| e.to_string())?;
    Ok(Pos::new(x, y))
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Wall,
    Open,
    Cursor,
    Start,
    Goal,
    Player,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    banner_shown: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Wall,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            needs_full: true,
            banner_shown: false,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn main() -> MazeResult<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = args.game_config();
    let mut game = Game::new(config.clone(), config.rng())?;
    let (tick_ms, render_fps) = read_speed_settings(&args);
    info!(width = config.width, height = config.height, tick_ms, render_fps, "starting");

    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;
    run(&mut stdout, &mut game, tick_ms, render_fps)
}

/// Raw mode and the alternate screen, undone on drop so an error or panic
/// in the game loop still hands back a usable terminal.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard {
            restore: restore_terminal,
        };
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = stdout.execute(Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

fn init_logging(path: Option<&Path>) -> MazeResult<()> {
    // The terminal belongs to the game, so logs only ever go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run<R: Rng>(
    stdout: &mut Stdout,
    game: &mut Game<R>,
    tick_ms: u64,
    render_fps: u64,
) -> MazeResult<()> {
    let mut last_tick = Instant::now();
    let mut last_seen: [Option<Instant>; 4] = [None, None, None, None];
    let mut reset_requested = false;
    let grid = game.grid();
    let mut renderer = Renderer::new(grid.width(), grid.height());
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL));
                if quit {
                    let input = Input {
                        quit: true,
                        ..Input::default()
                    };
                    if game.tick(input)? == TickOutcome::Quit {
                        return Ok(());
                    }
                }
                if key.code == KeyCode::Char('r') {
                    reset_requested = true;
                } else if let Some(dir) = dir_for_key(key.code) {
                    last_seen[idx_for_dir(dir)] = Some(Instant::now());
                }
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = Instant::now();
            let input = Input {
                dir: held_keys(&last_seen).direction(),
                reset: reset_requested,
                quit: false,
            };
            reset_requested = false;
            if game.tick(input)? == TickOutcome::Quit {
                return Ok(());
            }
        }
        render(stdout, game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn read_speed_settings(args: &Args) -> (u64, u64) {
    let tick_ms = args
        .tick_ms
        .or_else(|| env_u64("MAZE_TICK_MS"))
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = args
        .fps
        .or_else(|| env_u64("MAZE_FPS"))
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (tick_ms, render_fps)
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse::<u64>().ok())
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Some(Dir::North),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Some(Dir::South),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Some(Dir::West),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Some(Dir::East),
        _ => None,
    }
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::North => 0,
        Dir::South => 1,
        Dir::West => 2,
        Dir::East => 3,
    }
}

/// Terminals report presses, not key state: a key counts as held for a
/// short while after its last press or repeat.
fn held_keys(last_seen: &[Option<Instant>; 4]) -> HeldKeys {
    let now = Instant::now();
    let held = |dir: Dir| {
        last_seen[idx_for_dir(dir)]
            .is_some_and(|t| now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS))
    };
    HeldKeys {
        up: held(Dir::North),
        down: held(Dir::South),
        left: held(Dir::West),
        right: held(Dir::East),
    }
}

fn hud_for<R: Rng>(game: &Game<R>) -> String {
    match game.phase() {
        Phase::Generating => {
            let (visited, total) = game.generation_progress();
            format!("Carving {}/{}  (r: new maze, q: quit)", visited, total)
        }
        Phase::Playing => {
            let remaining = game
                .remaining_distance()
                .map_or_else(|| "?".to_string(), |d| d.to_string());
            format!(
                "Moves: {}  To goal: {}  (arrows/hjkl: move, r: new maze, q: quit)",
                game.moves(),
                remaining
            )
        }
        Phase::GoalReached => {
            format!("Goal reached in {} moves  (r: new maze, q: quit)", game.moves())
        }
    }
}

fn render<R: Rng>(stdout: &mut Stdout, game: &Game<R>, renderer: &mut Renderer) -> io::Result<()> {
    let grid = game.grid();

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    let extent = grid_extent(grid.width(), grid.height())
        .filter(|(w, h)| *w <= term_w && *h <= term_h);
    let Some((needed_w, needed_h)) = extent else {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            grid.width() * CELL_W,
            grid.height() + 2,
            term_w,
            term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    };

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    let goal_reached = game.phase() == Phase::GoalReached;
    if renderer.banner_shown && !goal_reached {
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_for(game);
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let pos = Pos { x, y };
            let cell = cell_for(game, pos);
            let idx = y * grid.width() + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    if goal_reached {
        draw_banner(stdout, renderer, needed_w, grid.height())?;
    }
    renderer.banner_shown = goal_reached;

    stdout.flush()?;
    Ok(())
}

/// Terminal columns and rows needed for a tile grid plus the HUD line, or
/// `None` when that cannot be expressed in terminal coordinates.
fn grid_extent(grid_w: usize, grid_h: usize) -> Option<(u16, u16)> {
    let w = u16::try_from(grid_w.checked_mul(CELL_W)?).ok()?;
    let h = u16::try_from(grid_h.checked_add(2)?).ok()?;
    Some((w, h))
}

fn screen_coord(origin: u16, offset: usize) -> Option<u16> {
    u16::try_from(usize::from(origin).checked_add(offset)?).ok()
}

fn cell_for<R: Rng>(game: &Game<R>, pos: Pos) -> Cell {
    if game.player() == Some(pos) {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Cyan,
        };
    }
    if game.cursor().map(Pos::to_grid) == Some(pos) {
        return Cell {
            glyph: Glyph::Cursor,
            color: Color::Yellow,
        };
    }
    if game.phase() != Phase::Generating {
        if game.start().to_grid() == pos {
            return Cell {
                glyph: Glyph::Start,
                color: Color::Red,
            };
        }
        if game.goal().to_grid() == pos {
            return Cell {
                glyph: Glyph::Goal,
                color: Color::Green,
            };
        }
    }
    match game.grid().tile(pos) {
        Some(Tile::Open) => Cell {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
        _ => Cell {
            glyph: Glyph::Wall,
            color: Color::White,
        },
    }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Wall => ("██", cell.color),
        Glyph::Open => ("  ", cell.color),
        Glyph::Cursor => ("▒▒", cell.color),
        Glyph::Start => ("██", cell.color),
        Glyph::Goal => ("██", cell.color),
        Glyph::Player => ("●", cell.color),
    };
    let (Some(x_pos), Some(y_pos)) = (
        screen_coord(renderer.origin_x, x * CELL_W),
        screen_coord(renderer.origin_y, y),
    ) else {
        return Ok(());
    };
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn draw_banner(stdout: &mut Stdout, renderer: &Renderer, grid_w: u16, grid_h: usize) -> io::Result<()> {
    let msg_w = UnicodeWidthStr::width(GOAL_BANNER);
    let (Some(x), Some(y)) = (
        screen_coord(renderer.origin_x, usize::from(grid_w).saturating_sub(msg_w) / 2),
        screen_coord(renderer.origin_y, grid_h / 2),
    ) else {
        return Ok(());
    };
    stdout.queue(MoveTo(x, y))?;
    stdout.queue(SetForegroundColor(Color::Black))?;
    stdout.queue(SetBackgroundColor(Color::White))?;
    stdout.queue(Print(GOAL_BANNER))?;
    stdout.queue(ResetColor)?;
    Ok(())
}
