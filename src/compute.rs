/// Per-tick gameplay: firing, collision resolution, movement and level
/// progression for one frame of `Playing`.
///
/// Collisions are resolved in two phases.  [`detect_collisions`] only reads
/// the field and produces a [`CollisionReport`]; [`apply_collisions`] then
/// commits every removal, kill, damage and explosion in one step.  The
/// checks run in a fixed order: player bullets vs enemies, player bullets vs
/// boss, enemies past the loss line, enemy bullets vs player.  A bullet spent
/// on an enemy is not available to the boss check.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bullet, Combatant, Explosion, Player};
use crate::progression::Level;

// ── Playfield ────────────────────────────────────────────────────────────────

/// Entities owned by the session rather than by the level.
#[derive(Clone, Debug)]
pub struct Playfield {
    pub player: Player,
    /// Player-owned, travelling up.
    pub bullets: Vec<Bullet>,
    /// Enemy- and boss-owned, travelling down.
    pub enemy_bullets: Vec<Bullet>,
    pub explosions: Vec<Explosion>,
    /// The boss is drawn and collidable only while engaged.
    pub boss_engaged: bool,
}

impl Playfield {
    pub fn new(config: &GameConfig, now_ms: u64) -> Self {
        Playfield {
            player: Player::spawn(config, now_ms),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            explosions: Vec::new(),
            boss_engaged: false,
        }
    }

    /// Fire the player's gun if the cooldown allows it.
    pub fn player_fire(&mut self, now_ms: u64) -> bool {
        match self.player.shoot(now_ms) {
            Some(bullet) => {
                self.bullets.push(bullet);
                true
            }
            None => false,
        }
    }

    /// Explosions keep animating after play stops.
    pub fn update_explosions(&mut self) {
        for explosion in &mut self.explosions {
            explosion.update();
        }
        self.explosions.retain(|e| e.alive);
    }
}

// ── Collision resolution ─────────────────────────────────────────────────────

/// Everything a tick's collision pass decided, before any of it is applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionReport {
    /// Indices into `Playfield::bullets`.
    pub spent_bullets: Vec<usize>,
    /// Indices into `Level::enemies`.
    pub destroyed_enemies: Vec<usize>,
    /// Number of player bullets that struck the boss.
    pub boss_hits: u32,
    /// Indices into `Playfield::enemy_bullets`.
    pub spent_enemy_bullets: Vec<usize>,
    /// An enemy's bottom edge reached the loss line.
    pub enemy_breached: bool,
    /// An enemy bullet struck the player.
    pub player_shot: bool,
}

impl CollisionReport {
    pub fn player_destroyed(&self) -> bool {
        self.enemy_breached || self.player_shot
    }
}

/// Read-only collision pass.
pub fn detect_collisions(field: &Playfield, level: &Level, config: &GameConfig) -> CollisionReport {
    let mut report = CollisionReport::default();

    // ── 1. Player bullets ↔ enemies ──────────────────────────────────────────
    for (bi, bullet) in field.bullets.iter().enumerate() {
        let mut hit = false;
        for (ei, enemy) in level.enemies.iter().enumerate() {
            if report.destroyed_enemies.contains(&ei) {
                continue;
            }
            if enemy.bounds().contains_point(bullet.x, bullet.y) {
                report.destroyed_enemies.push(ei);
                hit = true;
            }
        }
        if hit {
            report.spent_bullets.push(bi);
        }
    }

    // ── 2. Player bullets ↔ boss ─────────────────────────────────────────────
    if field.boss_engaged {
        if let Some(boss) = level.boss().filter(|b| !b.is_defeated()) {
            let rect = boss.bounds();
            for (bi, bullet) in field.bullets.iter().enumerate() {
                if report.spent_bullets.contains(&bi) {
                    continue;
                }
                if rect.contains_point(bullet.x, bullet.y) {
                    report.spent_bullets.push(bi);
                    report.boss_hits += 1;
                }
            }
        }
    }

    // ── 3. Enemy crossing the loss line ──────────────────────────────────────
    let loss_line = config.loss_line();
    report.enemy_breached = level
        .enemies
        .iter()
        .enumerate()
        .filter(|(ei, _)| !report.destroyed_enemies.contains(ei))
        .any(|(_, enemy)| enemy.bounds().bottom() >= loss_line);

    // ── 4. Enemy bullets ↔ player ────────────────────────────────────────────
    if field.player.alive {
        let rect = field.player.bounds();
        for (bi, bullet) in field.enemy_bullets.iter().enumerate() {
            if rect.contains_point(bullet.x, bullet.y) {
                report.spent_enemy_bullets.push(bi);
                report.player_shot = true;
            }
        }
    }

    report
}

/// Commit a [`CollisionReport`].
pub fn apply_collisions(
    field: &mut Playfield,
    level: &mut Level,
    report: &CollisionReport,
    config: &GameConfig,
) {
    for &ei in &report.destroyed_enemies {
        let rect = level.enemies[ei].bounds();
        field
            .explosions
            .push(Explosion::new(rect.center_x(), rect.center_y(), config));
        level.enemies[ei].destroy();
        level.enemy_killed();
    }
    level.enemies.retain(|e| e.alive);

    let bullets = std::mem::take(&mut field.bullets);
    field.bullets = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !report.spent_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();

    if report.boss_hits > 0 {
        let mut defeated_at = None;
        if let Some(boss) = level.boss_mut() {
            for _ in 0..report.boss_hits {
                let was_alive = boss.is_alive();
                if !boss.take_damage(1) && was_alive {
                    let rect = boss.bounds();
                    defeated_at = Some((rect.center_x(), rect.center_y()));
                }
            }
        }
        if let Some((x, y)) = defeated_at {
            field.explosions.push(Explosion::new(x, y, config));
            field.boss_engaged = false;
            level.boss_killed();
        }
    }

    let enemy_bullets = std::mem::take(&mut field.enemy_bullets);
    field.enemy_bullets = enemy_bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !report.spent_enemy_bullets.contains(i))
        .map(|(_, b)| b)
        .collect();

    if report.player_destroyed() && field.player.alive {
        let rect = field.player.bounds();
        field
            .explosions
            .push(Explosion::new(rect.center_x(), rect.center_y(), config));
        field.player.destroy();
    }
}

// ── Tick ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub player_destroyed: bool,
    /// The level reached `Complete` during this tick.
    pub level_completed: bool,
}

/// Advance one `Playing` frame at session time `now_ms`.
pub fn tick<R: Rng + ?Sized>(
    field: &mut Playfield,
    level: &mut Level,
    now_ms: u64,
    config: &GameConfig,
    rng: &mut R,
) -> TickOutcome {
    let was_complete = level.is_complete();

    // ── 1. Enemies try to fire ───────────────────────────────────────────────
    for enemy in &mut level.enemies {
        if let Some(bullet) = enemy.attempt_fire(now_ms, rng) {
            field.enemy_bullets.push(bullet);
        }
    }

    // ── 2. Boss fires and joins the field on first activation ───────────────
    if let Some(boss) = level.boss_mut().filter(|b| !b.is_defeated()) {
        if let Some(bullet) = boss.attempt_fire(now_ms, rng) {
            field.enemy_bullets.push(bullet);
        }
        if !field.boss_engaged {
            field.boss_engaged = true;
            tracing::debug!(boss = boss.name(), "boss engaged");
        }
    }

    // ── 3–6. Collisions ──────────────────────────────────────────────────────
    let report = detect_collisions(field, level, config);
    apply_collisions(field, level, &report, config);

    if report.player_destroyed() {
        tracing::info!(
            level = level.number(),
            breached = report.enemy_breached,
            shot = report.player_shot,
            "player destroyed"
        );
        return TickOutcome {
            player_destroyed: true,
            level_completed: false,
        };
    }

    // ── 7. Movement ──────────────────────────────────────────────────────────
    field.player.update();
    for bullet in field.bullets.iter_mut().chain(field.enemy_bullets.iter_mut()) {
        bullet.update();
    }
    field.bullets.retain(|b| b.alive);
    field.enemy_bullets.retain(|b| b.alive);
    field.update_explosions();

    // ── 8. Level progression ─────────────────────────────────────────────────
    level.update(now_ms, rng);

    TickOutcome {
        player_destroyed: false,
        level_completed: !was_complete && level.is_complete(),
    }
}
