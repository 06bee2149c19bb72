mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::filter::EnvFilter;

use galaxy_shooter::assets::{SpriteAtlas, DEFAULT_SPRITES_PATH};
use galaxy_shooter::config::{GameConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use galaxy_shooter::input::{Flow, InputEvent, Steering};
use galaxy_shooter::session::GameSession;

const LOG_FILE: &str = "galaxy_shooter.log";

// ── Held-key input ────────────────────────────────────────────────────────────

/// Frames a press/repeat keeps a key "down" when the terminal never reports
/// releases.  Key repeat runs at 15 Hz or faster, which refreshes the entry
/// well inside 7 frames at 50 FPS.
const HOLD_WINDOW: u64 = 7;

/// Last frame each key was pressed or repeated.
type KeyFrames = HashMap<KeyCode, u64>;

fn is_held(keys: &KeyFrames, key: &KeyCode, frame: u64) -> bool {
    matches!(keys.get(key), Some(&seen) if frame.saturating_sub(seen) <= HOLD_WINDOW)
}

fn any_held(keys: &KeyFrames, candidates: &[KeyCode], frame: u64) -> bool {
    candidates.iter().any(|k| is_held(keys, k, frame))
}

/// Directional movement is polled, never event driven.
fn steering(keys: &KeyFrames, frame: u64) -> Steering {
    Steering {
        left: any_held(
            keys,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        ),
        right: any_held(
            keys,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        ),
    }
}

/// Key press to engine input.  Arrows and A/D also land here as `Other`;
/// their movement effect comes from `steering`.
fn map_key(code: KeyCode, modifiers: KeyModifiers) -> InputEvent {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char(' ') => InputEvent::Fire,
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => InputEvent::PauseToggle,
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => InputEvent::MenuUp,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::MenuDown,
        KeyCode::Enter => InputEvent::MenuConfirm,
        _ => InputEvent::Other,
    }
}

/// Update the held-key map for one key event.  Returns true only for a fresh
/// press, the one event kind that reaches the session.  Classic terminals
/// report auto-repeat as more presses, so a press for a key that is still
/// held counts as a repeat.
fn track_key(keys: &mut KeyFrames, code: KeyCode, kind: KeyEventKind, frame: u64) -> bool {
    match kind {
        KeyEventKind::Press => {
            let fresh = !is_held(keys, &code, frame);
            keys.insert(code, frame);
            fresh
        }
        KeyEventKind::Repeat => {
            keys.insert(code, frame);
            false
        }
        KeyEventKind::Release => {
            keys.remove(&code);
            false
        }
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Fresh presses go to the session as discrete inputs; presses and repeats
/// are stamped into `keys`, and once per frame the live directional stamps
/// become the tick's `Steering`.  Fire and movement can be held together.
fn run<W: Write>(
    out: &mut W,
    session: &mut GameSession,
    atlas: &mut SpriteAtlas,
    events: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let frame_len = Duration::from_millis(session.config().frame_ms());

    let mut keys = KeyFrames::new();
    let mut frame: u64 = 0;
    let mut last_update = Instant::now();

    loop {
        let started = Instant::now();
        frame += 1;

        for event in events.try_iter() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = event else {
                continue;
            };
            if !track_key(&mut keys, code, kind, frame) {
                continue;
            }
            if session.handle_input(map_key(code, modifiers), &mut rng) == Flow::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        let dt_ms = now.duration_since(last_update).as_millis() as u64;
        last_update = now;
        session.update(dt_ms, steering(&keys, frame), &mut rng);

        display::render(out, session, atlas)?;

        if let Some(rest) = frame_len.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

/// Log to a file; stdout belongs to the alternate screen.
fn init_logging() -> anyhow::Result<()> {
    let file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("creating log file {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_config() -> anyhow::Result<GameConfig> {
    let path = std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    GameConfig::load_or_default(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))
}

/// Built-in sprites plus any overrides on disk.  Failures only cost visuals.
fn load_atlas() -> SpriteAtlas {
    let mut atlas = SpriteAtlas::builtin();
    let path = PathBuf::from(DEFAULT_SPRITES_PATH);
    if path.exists() {
        match atlas.apply_overrides(&path) {
            Ok(n) => tracing::info!(applied = n, "sprite overrides loaded"),
            Err(err) => tracing::warn!("{err}; using built-in sprites"),
        }
    }
    atlas
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as the value lives.  Dropping
/// it puts the terminal back, including on early returns.
struct Terminal {
    enhanced_keys: bool,
}

impl Terminal {
    fn enter<W: Write>(out: &mut W) -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        let mut guard = Terminal { enhanced_keys: false };
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;

        // Release events need the kitty keyboard protocol; without it the
        // hold window covers movement.
        guard.enhanced_keys = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        if !guard.enhanced_keys {
            tracing::info!("terminal has no key-release events, using hold window");
        }
        Ok(guard)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.enhanced_keys {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking reads happen on their own thread so a frame never waits on input.
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(event) = event::read() {
            // the frame loop has gone away
            if tx.send(event).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let config = load_config()?;
    let mut atlas = load_atlas();
    let mut session = GameSession::new(config);

    let mut out = BufWriter::new(stdout());
    let guard = Terminal::enter(&mut out)?;
    let events = spawn_input_reader();

    tracing::info!("session started");
    let result = run(&mut out, &mut session, &mut atlas, &events);
    drop(guard);

    tracing::info!(
        completed = session.levels().progress_stats().completed_levels,
        "session ended"
    );
    result.context("running frame loop")
}
