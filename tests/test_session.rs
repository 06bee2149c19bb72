use galaxy_shooter::config::GameConfig;
use galaxy_shooter::entities::Bullet;
use galaxy_shooter::input::{Flow, InputEvent, Steering};
use galaxy_shooter::session::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Session already playing level 1 with silent enemies.
fn playing(rng: &mut StdRng) -> GameSession {
    let mut session = GameSession::new(GameConfig::default());
    session.handle_input(InputEvent::MenuConfirm, rng);
    silence(&mut session);
    session
}

fn silence(session: &mut GameSession) {
    if let Some(level) = session.current_level_mut() {
        for enemy in &mut level.enemies {
            enemy.shoot_chance = 0.0;
        }
    }
}

/// Drop one player bullet on the centre of every enemy still alive.
fn volley_at_enemies(session: &mut GameSession) {
    let targets: Vec<_> = session
        .current_level()
        .expect("level")
        .enemies
        .iter()
        .map(|e| e.rect)
        .collect();
    let field = session.playfield_mut().expect("field");
    for r in targets {
        field.bullets.push(Bullet::player(r.center_x(), r.center_y(), 7.0));
    }
}

fn shoot_boss(session: &mut GameSession, rng: &mut StdRng) {
    let r = session
        .current_level()
        .and_then(|l| l.boss())
        .expect("boss")
        .rect;
    session
        .playfield_mut()
        .expect("field")
        .bullets
        .push(Bullet::player(r.center_x(), r.center_y(), 7.0));
    session.update(20, Steering::NONE, rng);
}

fn clear_wave(session: &mut GameSession, rng: &mut StdRng) {
    session.current_level_mut().expect("level").enemies.clear();
    session.update(20, Steering::NONE, rng);
}

// ── Menus and navigation ──────────────────────────────────────────────────────

#[test]
fn starts_in_main_menu() {
    let session = GameSession::new(GameConfig::default());
    assert_eq!(session.state(), GameState::MainMenu);
    assert!(session.current_level().is_none());
    assert!(session.playfield().is_none());
    assert!(session.active_menu().is_some());
}

#[test]
fn start_game_loads_level_one() {
    let mut rng = seeded_rng();
    let session = playing(&mut rng);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.current_level().map(|l| l.number()), Some(1));
    assert_eq!(session.current_level().expect("level").enemies.len(), 4);
    assert!(session.playfield().is_some());
    assert!(session.active_menu().is_none());
}

#[test]
fn quit_from_any_state() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    assert_eq!(session.handle_input(InputEvent::Quit, &mut rng), Flow::Quit);

    let mut session = playing(&mut rng);
    assert_eq!(session.handle_input(InputEvent::Quit, &mut rng), Flow::Quit);
}

#[test]
fn main_menu_quit_option() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.handle_input(InputEvent::MenuUp, &mut rng);
    assert_eq!(session.handle_input(InputEvent::MenuConfirm, &mut rng), Flow::Quit);
}

#[test]
fn level_select_starts_chosen_level() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::LevelSelect);

    for _ in 0..3 {
        session.handle_input(InputEvent::MenuDown, &mut rng);
    }
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.current_level().map(|l| l.number()), Some(4));
}

#[test]
fn level_select_back_returns_to_main_menu() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    session.handle_input(InputEvent::MenuUp, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::MainMenu);
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[test]
fn pause_toggles_and_freezes_time() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.handle_input(InputEvent::PauseToggle, &mut rng);
    assert_eq!(session.state(), GameState::Paused);

    let before = session.current_level().expect("level").enemies[0].rect;
    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.current_level().expect("level").enemies[0].rect, before);

    session.handle_input(InputEvent::PauseToggle, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
}

#[test]
fn pause_menu_quit_to_main_menu() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.handle_input(InputEvent::PauseToggle, &mut rng);
    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::MainMenu);
}

#[test]
fn pause_selection_resets_on_each_pause() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.handle_input(InputEvent::PauseToggle, &mut rng);
    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::PauseToggle, &mut rng);
    session.handle_input(InputEvent::PauseToggle, &mut rng);
    assert_eq!(session.active_menu().expect("pause menu").selected(), 0);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn fire_respects_player_cooldown() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.handle_input(InputEvent::Fire, &mut rng);
    assert!(session.playfield().expect("field").bullets.is_empty());

    session.update(301, Steering::NONE, &mut rng);
    session.handle_input(InputEvent::Fire, &mut rng);
    session.handle_input(InputEvent::Fire, &mut rng);
    assert_eq!(session.playfield().expect("field").bullets.len(), 1);
}

#[test]
fn steering_moves_player() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    let x = session.playfield().expect("field").player.rect.x;
    session.update(20, Steering::LEFT, &mut rng);
    assert_eq!(session.playfield().expect("field").player.rect.x, x - 5.0);
}

#[test]
fn hud_tracks_progress() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    let hud = session.hud().expect("hud");
    assert_eq!(hud.level_number, 1);
    assert_eq!(hud.total_enemies, 4);
    assert_eq!(hud.enemies_remaining, 4);
    assert!(hud.boss.is_none());

    let target = session.current_level().expect("level").enemies[0].rect;
    session
        .playfield_mut()
        .expect("field")
        .bullets
        .push(Bullet::player(target.center_x(), target.center_y(), 7.0));
    session.update(20, Steering::NONE, &mut rng);
    let hud = session.hud().expect("hud");
    assert_eq!(hud.enemies_killed, 1);
    assert_eq!(hud.enemies_remaining, 3);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn enemy_reaching_loss_line_ends_game() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    let loss_line = session.config().loss_line();
    let enemy = &mut session.current_level_mut().expect("level").enemies[0];
    enemy.rect.y = loss_line - enemy.rect.h;

    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.state(), GameState::GameOver);
    assert!(!session.playfield().expect("field").player.alive);
    assert!(session.game_over_menu().is_locked());
}

#[test]
fn descending_wave_ends_game() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    let loss_line = session.config().loss_line();

    let mut ticks = 0;
    while session.state() == GameState::Playing && ticks < 20_000 {
        session.update(20, Steering::NONE, &mut rng);
        ticks += 1;
    }

    assert_eq!(session.state(), GameState::GameOver);
    assert!(ticks > 1000, "wave reached the line after only {ticks} ticks");
    let level = session.current_level().expect("level");
    assert!(level.enemies.iter().any(|e| e.rect.bottom() >= loss_line));
    assert_eq!(level.progress(), (0, 4));
    assert!(!session.playfield().expect("field").player.alive);
}

#[test]
fn enemy_bullet_ends_game() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    let field = session.playfield_mut().expect("field");
    let p = field.player.rect;
    field
        .enemy_bullets
        .push(Bullet::enemy(p.center_x(), p.center_y(), 3.0, 800.0));

    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.state(), GameState::GameOver);
}

#[test]
fn game_over_restart_after_skip() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.current_level_mut().expect("level").enemies[0].rect.y = 690.0;
    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.state(), GameState::GameOver);

    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::GameOver);
    assert!(!session.game_over_menu().is_locked());

    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.current_level().expect("level").enemies.len(), 4);
    assert!(session.playfield().expect("field").player.alive);
}

#[test]
fn game_over_lockout_expires_with_time() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    session.current_level_mut().expect("level").enemies[0].rect.y = 690.0;
    session.update(20, Steering::NONE, &mut rng);

    session.update(1000, Steering::NONE, &mut rng);
    assert!(session.game_over_menu().is_locked());
    session.update(1000, Steering::NONE, &mut rng);
    assert!(!session.game_over_menu().is_locked());

    session.handle_input(InputEvent::MenuDown, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::MainMenu);
}

// ── Level complete ────────────────────────────────────────────────────────────

#[test]
fn clearing_wave_completes_level_one() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    clear_wave(&mut session, &mut rng);

    assert_eq!(session.state(), GameState::LevelComplete);
    assert!(session.levels().is_level_completed(0));
    let menu = session.level_complete_menu();
    assert_eq!(menu.level_number(), 1);
    assert!(menu.has_next_level());
    assert!(!menu.can_proceed());
}

#[test]
fn shooting_every_enemy_completes_level_one() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    volley_at_enemies(&mut session);
    session.update(20, Steering::NONE, &mut rng);

    assert_eq!(session.state(), GameState::LevelComplete);
    let level = session.current_level().expect("level");
    assert!(level.enemies.is_empty());
    assert_eq!(level.progress(), (4, 4));
    assert!(level.boss().is_none());
    assert_eq!(session.playfield().expect("field").explosions.len(), 4);
    assert!(session.playfield().expect("field").bullets.is_empty());
}

#[test]
fn level_three_boss_follows_the_wave_and_dies_after_five_hits() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.start_level(2, &mut rng);
    silence(&mut session);
    assert_eq!(session.current_level().expect("level").enemies.len(), 10);

    volley_at_enemies(&mut session);
    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
    let level = session.current_level().expect("level");
    assert_eq!(level.progress(), (10, 10));
    let boss = level.boss().expect("one boss");
    assert_eq!(boss.max_hp, 5);
    assert_eq!(boss.current_hp, 5);

    // wave explosions burn out and the boss joins the field
    for _ in 0..25 {
        session.update(20, Steering::NONE, &mut rng);
    }
    assert!(session.playfield().expect("field").boss_engaged);
    assert!(session.playfield().expect("field").explosions.is_empty());

    for hit in 1..=4 {
        shoot_boss(&mut session, &mut rng);
        let boss = session.current_level().and_then(|l| l.boss()).expect("boss");
        assert_eq!(boss.current_hp, 5 - hit);
        assert_eq!(session.state(), GameState::Playing);
    }
    assert!(session.playfield().expect("field").explosions.is_empty());

    shoot_boss(&mut session, &mut rng);
    assert_eq!(session.state(), GameState::LevelComplete);
    let boss = session.current_level().and_then(|l| l.boss()).expect("boss");
    assert!(boss.is_defeated());
    assert_eq!(boss.current_hp, 0);
    assert_eq!(session.playfield().expect("field").explosions.len(), 1);
    assert!(!session.playfield().expect("field").boss_engaged);
}

#[test]
fn level_complete_waits_then_advances() {
    let mut rng = seeded_rng();
    let mut session = playing(&mut rng);
    clear_wave(&mut session, &mut rng);

    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::LevelComplete);

    session.update(5000, Steering::NONE, &mut rng);
    session.handle_input(InputEvent::MenuConfirm, &mut rng);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.current_level().map(|l| l.number()), Some(2));
    assert_eq!(session.current_level().expect("level").enemies.len(), 8);
}

#[test]
fn final_level_has_no_next_option() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.start_level(4, &mut rng);
    silence(&mut session);
    clear_wave(&mut session, &mut rng);
    assert_eq!(session.state(), GameState::Playing);

    session
        .current_level_mut()
        .expect("level")
        .boss_mut()
        .expect("boss")
        .take_damage(100);
    session.update(20, Steering::NONE, &mut rng);
    assert_eq!(session.state(), GameState::LevelComplete);
    assert!(!session.level_complete_menu().has_next_level());
    assert!(session.levels().is_level_completed(4));
}

#[test]
fn boss_appears_in_hud_once_engaged() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.start_level(2, &mut rng);
    silence(&mut session);
    clear_wave(&mut session, &mut rng);
    assert!(session.hud().expect("hud").boss.is_none());

    session.update(20, Steering::NONE, &mut rng);
    let boss = session.hud().expect("hud").boss.expect("boss engaged");
    assert_eq!(boss.name, "Guardian Destroyer");
    assert_eq!(boss.max_hp, 5);
}

#[test]
fn bad_level_index_changes_nothing() {
    let mut rng = seeded_rng();
    let mut session = GameSession::new(GameConfig::default());
    session.start_level(9, &mut rng);
    assert_eq!(session.state(), GameState::MainMenu);
    assert!(session.current_level().is_none());
}
