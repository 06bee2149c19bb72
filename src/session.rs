/// Top-level game state machine.
///
/// ```text
///   MainMenu ──start──▶ Playing ◀──resume── Paused
///      │  ▲               │  ▲  ──pause──▶
///      ▼  │               │  │
///   LevelSelect ──play────┘  └──restart/next── GameOver / LevelComplete
/// ```
///
/// Input arrives as discrete [`InputEvent`]s via [`GameSession::handle_input`];
/// time arrives through [`GameSession::update`], which advances the session
/// clock and, while `Playing`, runs one gameplay tick.

use rand::Rng;

use crate::compute::{self, Playfield};
use crate::config::GameConfig;
use crate::input::{Flow, InputEvent, Steering};
use crate::level_manager::LevelManager;
use crate::menus::{
    GameOverMenu, LevelCompleteMenu, LevelSelectMenu, MainMenu, Menu, MenuAction, PauseMenu,
};
use crate::progression::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    MainMenu,
    LevelSelect,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

/// Boss line of the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct BossHud {
    pub name: &'static str,
    pub current_hp: u32,
    pub max_hp: u32,
    pub hp_fraction: f32,
}

/// Everything the HUD shows during play.
#[derive(Clone, Debug, PartialEq)]
pub struct HudInfo {
    pub level_number: u32,
    pub level_name: &'static str,
    pub enemies_killed: usize,
    pub total_enemies: usize,
    pub enemies_remaining: usize,
    pub boss: Option<BossHud>,
}

pub struct GameSession {
    config: GameConfig,
    state: GameState,
    /// Milliseconds since the session started.
    clock_ms: u64,
    levels: LevelManager,
    field: Option<Playfield>,
    main_menu: MainMenu,
    level_select: LevelSelectMenu,
    pause_menu: PauseMenu,
    game_over: GameOverMenu,
    level_complete: LevelCompleteMenu,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let levels = LevelManager::new(&config);
        let level_select = LevelSelectMenu::new(levels.definitions());
        GameSession {
            state: GameState::MainMenu,
            clock_ms: 0,
            level_select,
            levels,
            field: None,
            main_menu: MainMenu::new(),
            pause_menu: PauseMenu::new(),
            game_over: GameOverMenu::new(config.game_over_lockout_ms),
            level_complete: LevelCompleteMenu::new(config.level_complete_lockout_ms),
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.levels.current_level()
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        self.levels.current_level_mut()
    }

    pub fn playfield(&self) -> Option<&Playfield> {
        self.field.as_ref()
    }

    pub fn playfield_mut(&mut self) -> Option<&mut Playfield> {
        self.field.as_mut()
    }

    pub fn game_over_menu(&self) -> &GameOverMenu {
        &self.game_over
    }

    pub fn level_complete_menu(&self) -> &LevelCompleteMenu {
        &self.level_complete
    }

    pub fn level_select_menu(&self) -> &LevelSelectMenu {
        &self.level_select
    }

    /// The menu drawn over the current state, if any.
    pub fn active_menu(&self) -> Option<&dyn Menu> {
        match self.state {
            GameState::MainMenu => Some(&self.main_menu),
            GameState::LevelSelect => Some(&self.level_select),
            GameState::Paused => Some(&self.pause_menu),
            GameState::GameOver => Some(&self.game_over),
            GameState::LevelComplete => Some(&self.level_complete),
            GameState::Playing => None,
        }
    }

    pub fn hud(&self) -> Option<HudInfo> {
        let level = self.levels.current_level()?;
        let (killed, total) = level.progress();
        let engaged = self.field.as_ref().is_some_and(|f| f.boss_engaged);
        let boss = level
            .boss()
            .filter(|b| engaged && !b.is_defeated())
            .map(|b| BossHud {
                name: b.name(),
                current_hp: b.current_hp,
                max_hp: b.max_hp,
                hp_fraction: b.hp_fraction(),
            });
        Some(HudInfo {
            level_number: level.number(),
            level_name: level.name(),
            enemies_killed: killed,
            total_enemies: total,
            enemies_remaining: level.enemies.len(),
            boss,
        })
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle_input<R: Rng + ?Sized>(&mut self, input: InputEvent, rng: &mut R) -> Flow {
        if input == InputEvent::Quit {
            return Flow::Quit;
        }

        match self.state {
            GameState::MainMenu => match self.main_menu.handle_input(input) {
                Some(MenuAction::StartGame) => self.start_level(0, rng),
                Some(MenuAction::OpenLevelSelect) => self.enter(GameState::LevelSelect),
                Some(MenuAction::QuitGame) => return Flow::Quit,
                _ => {}
            },

            GameState::LevelSelect => match self.level_select.handle_input(input) {
                Some(MenuAction::MainMenu) => self.enter(GameState::MainMenu),
                Some(MenuAction::PlayLevel(index)) => self.start_level(index, rng),
                _ => {}
            },

            GameState::Playing => match input {
                InputEvent::PauseToggle => {
                    self.pause_menu.options_mut().reset();
                    self.enter(GameState::Paused);
                }
                InputEvent::Fire => {
                    let now = self.clock_ms;
                    if let Some(field) = self.field.as_mut() {
                        field.player_fire(now);
                    }
                }
                _ => {}
            },

            GameState::Paused => {
                if input == InputEvent::PauseToggle {
                    self.enter(GameState::Playing);
                    return Flow::Continue;
                }
                match self.pause_menu.handle_input(input) {
                    Some(MenuAction::Resume) => self.enter(GameState::Playing),
                    Some(MenuAction::RestartGame) => self.restart_current(rng),
                    Some(MenuAction::MainMenu) => self.enter(GameState::MainMenu),
                    _ => {}
                }
            }

            GameState::GameOver => match self.game_over.handle_input(input) {
                Some(MenuAction::RestartGame) => self.restart_current(rng),
                Some(MenuAction::MainMenu) => self.enter(GameState::MainMenu),
                _ => {}
            },

            GameState::LevelComplete => match self.level_complete.handle_input(input) {
                Some(MenuAction::NextLevel) => {
                    if self.levels.load_next_level(self.clock_ms, rng).is_some() {
                        self.begin_play();
                    }
                }
                Some(MenuAction::RestartLevel) => self.restart_current(rng),
                Some(MenuAction::OpenLevelSelect) => self.enter(GameState::LevelSelect),
                Some(MenuAction::MainMenu) => self.enter(GameState::MainMenu),
                _ => {}
            },
        }
        Flow::Continue
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Advance the session clock by `dt_ms` and run whatever the current
    /// state does per frame.
    pub fn update<R: Rng + ?Sized>(&mut self, dt_ms: u64, steering: Steering, rng: &mut R) {
        self.clock_ms = self.clock_ms.saturating_add(dt_ms);

        match self.state {
            GameState::Playing => self.tick(steering, rng),
            GameState::GameOver => {
                if let Some(field) = self.field.as_mut() {
                    field.update_explosions();
                }
                self.game_over.update(dt_ms);
            }
            GameState::LevelComplete => {
                if let Some(field) = self.field.as_mut() {
                    field.update_explosions();
                }
                self.level_complete.update(dt_ms);
            }
            GameState::MainMenu | GameState::LevelSelect | GameState::Paused => {}
        }
    }

    fn tick<R: Rng + ?Sized>(&mut self, steering: Steering, rng: &mut R) {
        let now = self.clock_ms;
        let (Some(field), Some(level)) = (self.field.as_mut(), self.levels.current_level_mut())
        else {
            return;
        };

        field.player.steer(steering);
        let outcome = compute::tick(field, level, now, &self.config, rng);

        if outcome.player_destroyed {
            self.game_over.reset_timer();
            self.enter(GameState::GameOver);
        } else if outcome.level_completed {
            let (number, name) = (level.number(), level.name());
            let index = self.levels.current_index();
            let has_next = self.levels.has_next_level();
            self.levels.mark_level_completed(index);
            self.level_complete.set_level_info(number, name, has_next);
            self.enter(GameState::LevelComplete);
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    fn enter(&mut self, next: GameState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }

    /// Load level `index` and start playing it.  A bad index changes nothing.
    pub fn start_level<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) {
        if self.levels.load_level(index, self.clock_ms, rng).is_some() {
            self.begin_play();
        }
    }

    fn restart_current<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let index = self.levels.current_index();
        self.start_level(index, rng);
    }

    /// Fresh player and empty projectile/effect collections for the level
    /// that is already loaded.
    fn begin_play(&mut self) {
        self.field = Some(Playfield::new(&self.config, self.clock_ms));
        self.game_over.reset_timer();
        self.enter(GameState::Playing);
    }
}
