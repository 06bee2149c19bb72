use galaxy_shooter::compute::*;
use galaxy_shooter::config::GameConfig;
use galaxy_shooter::entities::*;
use galaxy_shooter::levels::catalog;
use galaxy_shooter::progression::{Level, Phase};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn setup(number: u32, rng: &mut StdRng) -> (Playfield, Level, GameConfig) {
    let config = GameConfig::default();
    let def = catalog()
        .into_iter()
        .find(|d| d.number == number)
        .expect("level exists");
    let mut level = Level::new(def, &config);
    level.spawn_enemies(0, rng);
    for enemy in &mut level.enemies {
        enemy.shoot_chance = 0.0;
    }
    (Playfield::new(&config, 0), level, config)
}

/// Put the level straight into its boss fight with the wave still present.
fn force_boss(level: &mut Level, config: &GameConfig, rng: &mut StdRng) {
    let kind = level.definition.boss.expect("boss level");
    level.progress.boss = Some(Boss::spawn(kind, config, 0, rng));
    level.progress.boss_spawned = true;
    level.progress.phase = Phase::BossFight;
}

// ── Playfield ─────────────────────────────────────────────────────────────────

#[test]
fn playfield_starts_empty() {
    let field = Playfield::new(&GameConfig::default(), 0);
    assert!(field.bullets.is_empty());
    assert!(field.enemy_bullets.is_empty());
    assert!(field.explosions.is_empty());
    assert!(!field.boss_engaged);
    assert!(field.player.alive);
}

#[test]
fn player_fire_respects_cooldown() {
    let mut field = Playfield::new(&GameConfig::default(), 0);
    assert!(!field.player_fire(300));
    assert!(field.player_fire(301));
    assert!(!field.player_fire(400));
    assert_eq!(field.bullets.len(), 1);
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[test]
fn bullet_destroys_enemy() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    let target = level.enemies[0].rect;
    field
        .bullets
        .push(Bullet::player(target.center_x(), target.center_y(), 7.0));

    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report.destroyed_enemies, vec![0]);
    assert_eq!(report.spent_bullets, vec![0]);
    assert!(!report.player_destroyed());

    apply_collisions(&mut field, &mut level, &report, &config);
    assert_eq!(level.enemies.len(), 3);
    assert!(field.bullets.is_empty());
    assert_eq!(field.explosions.len(), 1);
    assert_eq!(level.progress(), (1, 4));
}

#[test]
fn detection_does_not_mutate() {
    let mut rng = seeded_rng();
    let (mut field, level, config) = setup(1, &mut rng);
    let target = level.enemies[1].rect;
    field
        .bullets
        .push(Bullet::player(target.center_x(), target.center_y(), 7.0));
    let before = level.enemies.len();
    let _ = detect_collisions(&field, &level, &config);
    assert_eq!(level.enemies.len(), before);
    assert_eq!(field.bullets.len(), 1);
}

#[test]
fn missed_bullet_is_kept() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    field.bullets.push(Bullet::player(5.0, 400.0, 7.0));
    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report, CollisionReport::default());
    apply_collisions(&mut field, &mut level, &report, &config);
    assert_eq!(field.bullets.len(), 1);
    assert_eq!(level.enemies.len(), 4);
}

#[test]
fn bullets_damage_engaged_boss() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(3, &mut rng);
    level.enemies.clear();
    level.update(0, &mut rng);
    field.boss_engaged = true;

    field.bullets.push(Bullet::player(300.0, 100.0, 7.0));
    field.bullets.push(Bullet::player(310.0, 100.0, 7.0));
    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report.boss_hits, 2);

    apply_collisions(&mut field, &mut level, &report, &config);
    assert_eq!(level.boss().expect("boss").current_hp, 3);
    assert!(field.bullets.is_empty());
    assert!(field.explosions.is_empty());
}

#[test]
fn boss_ignored_until_engaged() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(3, &mut rng);
    level.enemies.clear();
    level.update(0, &mut rng);

    field.bullets.push(Bullet::player(300.0, 100.0, 7.0));
    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report.boss_hits, 0);
    assert!(report.spent_bullets.is_empty());
}

#[test]
fn bullet_spent_on_enemy_does_not_hit_boss() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(3, &mut rng);
    force_boss(&mut level, &config, &mut rng);
    field.boss_engaged = true;
    level.enemies[0].rect = Rect::from_center(300.0, 100.0, 40.0, 32.0);

    field.bullets.push(Bullet::player(300.0, 100.0, 7.0));
    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report.destroyed_enemies, vec![0]);
    assert_eq!(report.spent_bullets, vec![0]);
    assert_eq!(report.boss_hits, 0);

    apply_collisions(&mut field, &mut level, &report, &config);
    assert_eq!(level.boss().expect("boss").current_hp, 5);
}

#[test]
fn boss_defeat_spawns_one_explosion() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(3, &mut rng);
    level.enemies.clear();
    level.update(0, &mut rng);
    field.boss_engaged = true;
    level.boss_mut().expect("boss").current_hp = 1;

    for x in [280.0, 300.0, 320.0] {
        field.bullets.push(Bullet::player(x, 100.0, 7.0));
    }
    let report = detect_collisions(&field, &level, &config);
    assert_eq!(report.boss_hits, 3);
    apply_collisions(&mut field, &mut level, &report, &config);

    assert!(level.boss().expect("boss").is_defeated());
    assert_eq!(field.explosions.len(), 1);
    assert!(!field.boss_engaged);

    level.update(20, &mut rng);
    assert!(level.is_complete());
}

#[test]
fn enemy_at_loss_line_destroys_player() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    let h = level.enemies[2].rect.h;
    level.enemies[2].rect.y = config.loss_line() - h;

    let report = detect_collisions(&field, &level, &config);
    assert!(report.enemy_breached);
    apply_collisions(&mut field, &mut level, &report, &config);
    assert!(!field.player.alive);
    assert_eq!(field.explosions.len(), 1);
}

#[test]
fn enemy_above_loss_line_is_harmless() {
    let mut rng = seeded_rng();
    let (field, mut level, config) = setup(1, &mut rng);
    let h = level.enemies[2].rect.h;
    level.enemies[2].rect.y = config.loss_line() - h - 0.5;
    assert!(!detect_collisions(&field, &level, &config).enemy_breached);
}

#[test]
fn enemy_bullet_hits_player() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    let p = field.player.rect;
    field
        .enemy_bullets
        .push(Bullet::enemy(p.center_x(), p.center_y(), 3.0, 800.0));
    field.enemy_bullets.push(Bullet::enemy(10.0, 10.0, 3.0, 800.0));

    let report = detect_collisions(&field, &level, &config);
    assert!(report.player_shot);
    assert_eq!(report.spent_enemy_bullets, vec![0]);

    apply_collisions(&mut field, &mut level, &report, &config);
    assert!(!field.player.alive);
    assert_eq!(field.enemy_bullets.len(), 1);
}

// ── Tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_moves_bullets_and_player() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    field.bullets.push(Bullet::player(5.0, 400.0, 7.0));
    field.player.steer(galaxy_shooter::input::Steering::RIGHT);
    let x = field.player.rect.x;

    let outcome = tick(&mut field, &mut level, 20, &config, &mut rng);
    assert_eq!(outcome, TickOutcome::default());
    assert_eq!(field.bullets[0].y, 393.0);
    assert_eq!(field.player.rect.x, x + 5.0);
}

#[test]
fn tick_reports_level_completion_once() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    level.enemies.clear();

    let first = tick(&mut field, &mut level, 20, &config, &mut rng);
    assert!(first.level_completed);
    let second = tick(&mut field, &mut level, 40, &config, &mut rng);
    assert!(!second.level_completed);
}

#[test]
fn tick_engages_boss_once_spawned() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(3, &mut rng);
    level.enemies.clear();

    tick(&mut field, &mut level, 20, &config, &mut rng);
    assert_eq!(level.phase(), Phase::BossFight);
    assert!(!field.boss_engaged);

    tick(&mut field, &mut level, 40, &config, &mut rng);
    assert!(field.boss_engaged);
}

#[test]
fn tick_stops_when_player_destroyed() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    let p = field.player.rect;
    field
        .enemy_bullets
        .push(Bullet::enemy(p.center_x(), p.center_y(), 3.0, 800.0));
    field.bullets.push(Bullet::player(5.0, 400.0, 7.0));

    let outcome = tick(&mut field, &mut level, 20, &config, &mut rng);
    assert!(outcome.player_destroyed);
    assert!(!outcome.level_completed);
    assert_eq!(field.bullets[0].y, 400.0);
}

#[test]
fn player_loss_wins_over_completion() {
    let mut rng = seeded_rng();
    let (mut field, mut level, config) = setup(1, &mut rng);
    level.enemies.truncate(1);
    let target = level.enemies[0].rect;
    field
        .bullets
        .push(Bullet::player(target.center_x(), target.center_y(), 7.0));
    let p = field.player.rect;
    field
        .enemy_bullets
        .push(Bullet::enemy(p.center_x(), p.center_y(), 3.0, 800.0));

    let outcome = tick(&mut field, &mut level, 20, &config, &mut rng);
    assert!(outcome.player_destroyed);
    assert!(!outcome.level_completed);
    assert!(!level.is_complete());
}
