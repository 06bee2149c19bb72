/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and a read-only view of the
/// session.  No game logic is performed; world coordinates are scaled into
/// the terminal grid and sprites come from the [`SpriteAtlas`].

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use galaxy_shooter::assets::{Rgb, Sprite, SpriteAtlas};
use galaxy_shooter::compute::Playfield;
use galaxy_shooter::entities::{Combatant, SpriteKey};
use galaxy_shooter::menus::Menu;
use galaxy_shooter::progression::Level;
use galaxy_shooter::session::{BossHud, GameSession, GameState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::White;
const C_HUD_PROGRESS: Color = Color::Yellow;
const C_TITLE: Color = Color::Cyan;
const C_OPTION: Color = Color::White;
const C_SELECTED: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_GAME_OVER: Color = Color::Red;
const C_LEVEL_DONE: Color = Color::Green;

/// Maps world units onto terminal cells inside the border.
struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    fn new(cols: u16, rows: u16, world_w: f32, world_h: f32) -> Self {
        Viewport { cols, rows, world_w, world_h }
    }

    /// Inner playfield: columns 1..cols-1, rows 2..rows-2.
    fn cell(&self, x: f32, y: f32) -> (i32, i32) {
        let inner_w = self.cols.saturating_sub(2).max(1) as f32;
        let inner_h = self.rows.saturating_sub(4).max(1) as f32;
        let col = 1 + (x / self.world_w * inner_w) as i32;
        let row = 2 + (y / self.world_h * inner_h) as i32;
        (col, row)
    }

    fn in_field(&self, col: i32, row: i32) -> bool {
        col >= 1 && col < self.cols as i32 - 1 && row >= 2 && row < self.rows as i32 - 2
    }
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Draw the whole screen for the session's current state.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    atlas: &mut SpriteAtlas,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let config = session.config();
    let view = Viewport::new(cols, rows, config.screen_width, config.screen_height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &view)?;

    let in_game = matches!(
        session.state(),
        GameState::Playing | GameState::Paused | GameState::GameOver | GameState::LevelComplete
    );
    if in_game {
        if let (Some(field), Some(level)) = (session.playfield(), session.current_level()) {
            draw_field(out, &view, field, level, atlas)?;
        }
        if session.state() == GameState::Playing {
            draw_hud(out, &view, session)?;
        }
    }

    if let Some(menu) = session.active_menu() {
        draw_menu(out, &view, session, menu)?;
    }

    draw_controls_hint(out, &view, session.state())?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Frame around the playfield ────────────────────────────────────────────────

/// Rows 1 and `rows-2` carry the horizontal edges; the HUD sits above and the
/// controls hint below.
fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let inner = "═".repeat(view.cols.saturating_sub(2) as usize);
    let bottom = view.rows.saturating_sub(2);
    let right = view.cols.saturating_sub(1);

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("╔{inner}╗")))?;
    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("╚{inner}╝")))?;

    for row in 2..bottom {
        for col in [0, right] {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print('║'))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(
    out: &mut W,
    view: &Viewport,
    field: &Playfield,
    level: &Level,
    atlas: &mut SpriteAtlas,
) -> std::io::Result<()> {
    for enemy in &level.enemies {
        let r = enemy.bounds();
        draw_sprite(out, view, &atlas.resolve(enemy.sprite), r.center_x(), r.center_y())?;
    }

    if field.boss_engaged {
        if let Some(boss) = level.boss().filter(|b| !b.is_defeated()) {
            let r = boss.bounds();
            draw_sprite(out, view, &atlas.resolve(boss.sprite()), r.center_x(), r.center_y())?;
        }
    }

    for bullet in field.bullets.iter().chain(field.enemy_bullets.iter()) {
        draw_sprite(out, view, &atlas.resolve(bullet.sprite()), bullet.x, bullet.y)?;
    }

    for explosion in &field.explosions {
        draw_sprite(out, view, &atlas.resolve(explosion.sprite()), explosion.x, explosion.y)?;
    }

    if field.player.alive {
        let r = field.player.bounds();
        draw_sprite(
            out,
            view,
            &atlas.resolve(SpriteKey::Spaceship),
            r.center_x(),
            r.center_y(),
        )?;
    }
    Ok(())
}

/// Draw `sprite` centered on the world point `(x, y)`, clipped to the field.
fn draw_sprite<W: Write>(
    out: &mut W,
    view: &Viewport,
    sprite: &Sprite,
    x: f32,
    y: f32,
) -> std::io::Result<()> {
    let (col, row) = view.cell(x, y);
    let left = col - sprite.width() as i32 / 2;
    let top = row - sprite.height() as i32 / 2;

    out.queue(style::SetForegroundColor(rgb(sprite.color)))?;
    for (dy, line) in sprite.rows.iter().enumerate() {
        let r = top + dy as i32;
        for (dx, ch) in line.chars().enumerate() {
            let c = left + dx as i32;
            if ch == ' ' || !view.in_field(c, r) {
                continue;
            }
            out.queue(cursor::MoveTo(c as u16, r as u16))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, session: &GameSession) -> std::io::Result<()> {
    let Some(hud) = session.hud() else {
        return Ok(());
    };

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("Level {}: {}", hud.level_number, hud.level_name)))?;

    let right = match &hud.boss {
        Some(boss) => boss_bar(boss),
        None => format!("Enemies: {}/{}", hud.enemies_remaining, hud.total_enemies),
    };
    let rx = view.cols.saturating_sub(right.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_PROGRESS))?;
    out.queue(Print(right))?;
    Ok(())
}

fn boss_bar(boss: &BossHud) -> String {
    const WIDTH: usize = 12;
    let filled = ((boss.hp_fraction * WIDTH as f32).round() as usize).min(WIDTH);
    format!(
        "Boss: {} [{}{}] {}/{}",
        boss.name,
        "█".repeat(filled),
        "░".repeat(WIDTH - filled),
        boss.current_hp,
        boss.max_hp
    )
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_menu<W: Write>(
    out: &mut W,
    view: &Viewport,
    session: &GameSession,
    menu: &dyn Menu,
) -> std::io::Result<()> {
    let mid = view.rows / 2;
    let mut row = mid.saturating_sub(8);

    let title_color = match session.state() {
        GameState::GameOver => C_GAME_OVER,
        GameState::LevelComplete => C_LEVEL_DONE,
        _ => C_TITLE,
    };
    centered(out, view, row, menu.title(), title_color)?;
    row += 2;

    if session.state() == GameState::LevelComplete {
        let done = session.level_complete_menu();
        let info = format!("Level {}: {}", done.level_number(), done.level_name());
        centered(out, view, row, &info, C_OPTION)?;
        row += 1;
        let message = if done.has_next_level() {
            "Great job! Ready for the next challenge?"
        } else {
            "CONGRATULATIONS! You've completed all levels!"
        };
        centered(out, view, row, message, C_SELECTED)?;
        row += 2;
        if !done.can_proceed() {
            let wait = format!(
                "Please wait {} seconds before continuing...",
                done.seconds_remaining()
            );
            centered(out, view, row, &wait, C_HUD_PROGRESS)?;
            return Ok(());
        }
    }

    if !menu.is_interactive() {
        centered(out, view, row + 1, "Press any key to continue...", C_OPTION)?;
        return Ok(());
    }

    let descriptions = session.state() == GameState::LevelSelect;
    for (i, label) in menu.options().labels().iter().enumerate() {
        let selected = i == menu.selected();
        let text = if selected {
            format!("> {}", label)
        } else {
            format!("  {}", label)
        };
        centered(out, view, row, &text, if selected { C_SELECTED } else { C_OPTION })?;
        row += 1;

        if descriptions {
            if let Some(desc) = session.level_select_menu().description(i) {
                centered(out, view, row, desc, C_HINT)?;
                row += 1;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport, state: GameState) -> std::io::Result<()> {
    let hint = match state {
        GameState::Playing => "← → / A D : Move   SPACE : Shoot   P / ESC : Pause",
        GameState::Paused => "↑ ↓ / W S : Navigate   ENTER : Select   P / ESC : Resume",
        _ => "↑ ↓ / W S : Navigate   ENTER / SPACE : Select   Ctrl-C : Quit",
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}
