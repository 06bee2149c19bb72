/// Runtime tuning loaded from `galaxy_shooter.toml`.
///
/// [`GameConfig::default`] carries the stock values for every constant the
/// engine uses.  A TOML file may override any subset of them; missing keys
/// fall back to the defaults, so a file containing only
/// `level_complete_lockout_ms = 1000` is valid.

use std::path::Path;

use serde::Deserialize;

use crate::error::GameError;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "galaxy_shooter.toml";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "GALAXY_SHOOTER_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Screen & pacing ──────────────────────────────────────────────────────
    pub screen_width: f32,
    pub screen_height: f32,
    pub fps: u32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_fire_cooldown_ms: u64,
    /// Distance from the bottom of the screen to the player's spawn center.
    pub player_spawn_offset: f32,

    // ── Regular enemies ──────────────────────────────────────────────────────
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    pub enemy_shoot_chance: f64,
    pub enemy_bounce_ticks: i32,
    pub enemy_descent: f32,
    pub enemy_fire_cooldown_min_ms: u64,
    pub enemy_fire_cooldown_max_ms: u64,

    // ── Bosses ───────────────────────────────────────────────────────────────
    pub boss_width: f32,
    pub boss_height: f32,
    pub boss_speed: f32,
    pub boss_bounce_ticks: i32,
    pub boss_top: f32,
    pub boss_fire_cooldown_min_ms: u64,
    pub boss_fire_cooldown_max_ms: u64,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    /// Enemy bullets are discarded once their top passes this line.  Kept
    /// separate from `screen_height`; the stock value matches the stock
    /// screen height only by coincidence.
    pub enemy_bullet_floor: f32,

    // ── Effects ──────────────────────────────────────────────────────────────
    pub explosion_frames: usize,
    pub explosion_ticks_per_frame: u32,

    // ── Rules ────────────────────────────────────────────────────────────────
    /// An enemy whose bottom reaches `screen_height - loss_line_offset` ends the run.
    pub loss_line_offset: f32,
    pub game_over_lockout_ms: u64,
    pub level_complete_lockout_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 600.0,
            screen_height: 800.0,
            fps: 50,

            player_width: 48.0,
            player_height: 48.0,
            player_speed: 5.0,
            player_fire_cooldown_ms: 300,
            player_spawn_offset: 130.0,

            enemy_width: 40.0,
            enemy_height: 32.0,
            enemy_speed: 1.0,
            enemy_shoot_chance: 0.002,
            enemy_bounce_ticks: 75,
            enemy_descent: 20.0,
            enemy_fire_cooldown_min_ms: 1000,
            enemy_fire_cooldown_max_ms: 3000,

            boss_width: 120.0,
            boss_height: 90.0,
            boss_speed: 2.0,
            boss_bounce_ticks: 50,
            boss_top: 50.0,
            boss_fire_cooldown_min_ms: 500,
            boss_fire_cooldown_max_ms: 1500,

            bullet_speed: 7.0,
            enemy_bullet_speed: 3.0,
            enemy_bullet_floor: 800.0,

            explosion_frames: 5,
            explosion_ticks_per_frame: 4,

            loss_line_offset: 100.0,
            game_over_lockout_ms: 2000,
            level_complete_lockout_ms: 5000,
        }
    }
}

impl GameConfig {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = toml::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Like [`GameConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, GameError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(GameError::InvalidConfig {
                field: "screen_width/screen_height",
                reason: format!(
                    "screen must have a positive size, got {}x{}",
                    self.screen_width, self.screen_height
                ),
            });
        }
        if self.fps == 0 {
            return Err(GameError::InvalidConfig {
                field: "fps",
                reason: "frame rate must be at least 1".to_string(),
            });
        }
        if self.enemy_fire_cooldown_min_ms > self.enemy_fire_cooldown_max_ms {
            return Err(GameError::InvalidConfig {
                field: "enemy_fire_cooldown_min_ms",
                reason: format!(
                    "min {} exceeds max {}",
                    self.enemy_fire_cooldown_min_ms, self.enemy_fire_cooldown_max_ms
                ),
            });
        }
        if self.boss_fire_cooldown_min_ms > self.boss_fire_cooldown_max_ms {
            return Err(GameError::InvalidConfig {
                field: "boss_fire_cooldown_min_ms",
                reason: format!(
                    "min {} exceeds max {}",
                    self.boss_fire_cooldown_min_ms, self.boss_fire_cooldown_max_ms
                ),
            });
        }
        if self.explosion_frames == 0 || self.explosion_ticks_per_frame == 0 {
            return Err(GameError::InvalidConfig {
                field: "explosion_frames/explosion_ticks_per_frame",
                reason: "explosions need at least one frame and one tick per frame".to_string(),
            });
        }
        Ok(())
    }

    /// Frame duration in milliseconds for the configured frame rate.
    pub fn frame_ms(&self) -> u64 {
        (1000 / self.fps.max(1)) as u64
    }

    /// Y coordinate an enemy's bottom edge must not reach.
    pub fn loss_line(&self) -> f32 {
        self.screen_height - self.loss_line_offset
    }
}
