/// Per-level state machine: the enemy wave, then an optional boss, then done.
///
/// A [`Level`] is built once per session and re-initialised by
/// [`Level::spawn_enemies`] / [`Level::reset`] every time it is played.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Boss, Combatant, Enemy};
use crate::levels::LevelDefinition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    SpawningEnemies,
    BossFight,
    Complete,
}

/// Mutable progress for one play-through of a level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelProgress {
    pub total_enemies: usize,
    pub enemies_killed: usize,
    pub phase: Phase,
    pub boss: Option<Boss>,
    pub boss_spawned: bool,
    pub enemies_phase_complete: bool,
}

impl LevelProgress {
    fn fresh(total_enemies: usize) -> Self {
        LevelProgress {
            total_enemies,
            enemies_killed: 0,
            phase: Phase::SpawningEnemies,
            boss: None,
            boss_spawned: false,
            enemies_phase_complete: false,
        }
    }
}

/// Snapshot for menus and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelInfo {
    pub level_number: u32,
    pub level_name: &'static str,
    pub total_enemies: usize,
    pub enemies_killed: usize,
    pub is_complete: bool,
    pub progress_percentage: f32,
    pub is_unlocked: bool,
    pub is_completed: bool,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub definition: LevelDefinition,
    pub enemies: Vec<Enemy>,
    pub progress: LevelProgress,
    config: GameConfig,
}

impl Level {
    /// Level with no enemies spawned yet.
    pub fn new(definition: LevelDefinition, config: &GameConfig) -> Self {
        Level {
            definition,
            enemies: Vec::new(),
            progress: LevelProgress::fresh(0),
            config: config.clone(),
        }
    }

    pub fn number(&self) -> u32 {
        self.definition.number
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn has_boss(&self) -> bool {
        self.definition.has_boss()
    }

    /// Enemy with this level's multipliers applied.  Multipliers affect new
    /// enemies only, never ones already on the field.
    pub fn create_enemy<R: Rng + ?Sized>(&self, x: f32, y: f32, now_ms: u64, rng: &mut R) -> Enemy {
        let mut enemy = Enemy::spawn(x, y, &self.config, now_ms, rng);
        enemy.speed *= self.definition.speed_multiplier;
        enemy.shoot_chance *= self.definition.shoot_chance_multiplier;
        enemy
    }

    /// Clear everything and lay out a fresh wave.  Resets kill counts, phase
    /// and boss state.
    pub fn spawn_enemies<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        let positions = self.definition.enemy_positions(self.config.screen_width);
        let enemies: Vec<Enemy> = positions
            .iter()
            .map(|&(x, y)| self.create_enemy(x, y, now_ms, rng))
            .collect();

        self.progress = LevelProgress::fresh(enemies.len());
        self.enemies = enemies;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        self.spawn_enemies(now_ms, rng);
    }

    fn create_boss<R: Rng + ?Sized>(&self, now_ms: u64, rng: &mut R) -> Option<Boss> {
        self.definition
            .boss
            .map(|kind| Boss::spawn(kind, &self.config, now_ms, rng))
    }

    /// One tick: move the wave, evaluate phase transitions, move the boss.
    pub fn update<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        for enemy in &mut self.enemies {
            enemy.update();
        }

        if self.enemies.is_empty() && !self.progress.enemies_phase_complete {
            self.progress.enemies_phase_complete = true;

            if self.has_boss() && !self.progress.boss_spawned {
                self.progress.boss = self.create_boss(now_ms, rng);
                self.progress.boss_spawned = true;
                self.progress.phase = Phase::BossFight;
                tracing::info!(
                    level = self.number(),
                    boss = self.progress.boss.as_ref().map(|b| b.name()),
                    "wave cleared, boss incoming"
                );
            } else if !self.has_boss() {
                self.progress.phase = Phase::Complete;
                tracing::info!(level = self.number(), "wave cleared, level complete");
            }
        }

        let phase = self.progress.phase;
        if let Some(boss) = self.progress.boss.as_mut() {
            if !boss.is_defeated() {
                boss.update();
            } else if phase != Phase::Complete {
                self.progress.phase = Phase::Complete;
                tracing::info!(level = self.number(), "boss defeated, level complete");
            }
        }
    }

    /// Count a confirmed kill.  Display only; completion is driven by the
    /// wave being empty.
    pub fn enemy_killed(&mut self) {
        if self.progress.enemies_killed < self.progress.total_enemies {
            self.progress.enemies_killed += 1;
        }
    }

    pub fn boss_killed(&mut self) {
        tracing::debug!(level = self.number(), "boss kill registered");
    }

    /// The boss, once it has been spawned.
    pub fn boss(&self) -> Option<&Boss> {
        self.progress.boss.as_ref().filter(|_| self.progress.boss_spawned)
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        if !self.progress.boss_spawned {
            return None;
        }
        self.progress.boss.as_mut()
    }

    pub fn phase(&self) -> Phase {
        self.progress.phase
    }

    /// `(killed, total)`
    pub fn progress(&self) -> (usize, usize) {
        (self.progress.enemies_killed, self.progress.total_enemies)
    }

    pub fn is_complete(&self) -> bool {
        self.progress.phase == Phase::Complete
    }

    pub fn info(&self) -> LevelInfo {
        let (killed, total) = self.progress();
        let progress_percentage = if total > 0 {
            killed as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        LevelInfo {
            level_number: self.number(),
            level_name: self.name(),
            total_enemies: total,
            enemies_killed: killed,
            is_complete: self.is_complete(),
            progress_percentage,
            is_unlocked: true,
            is_completed: false,
        }
    }
}
