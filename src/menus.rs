/// Menu screens: option lists, cursor movement and the action each option
/// triggers.  Drawing is left to the front-end, which renders any
/// `&dyn Menu` generically.

use crate::input::InputEvent;
use crate::levels::LevelDefinition;

/// What a confirmed menu selection asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    StartGame,
    OpenLevelSelect,
    QuitGame,
    /// 0-based level index.
    PlayLevel(usize),
    MainMenu,
    Resume,
    RestartGame,
    NextLevel,
    RestartLevel,
}

/// Labels plus a wrap-around cursor.
#[derive(Clone, Debug, PartialEq)]
pub struct OptionList {
    labels: Vec<String>,
    selected: usize,
}

impl OptionList {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        OptionList {
            labels: labels.into_iter().map(Into::into).collect(),
            selected: 0,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected).map(String::as_str)
    }

    pub fn up(&mut self) {
        if !self.labels.is_empty() {
            self.selected = (self.selected + self.labels.len() - 1) % self.labels.len();
        }
    }

    pub fn down(&mut self) {
        if !self.labels.is_empty() {
            self.selected = (self.selected + 1) % self.labels.len();
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

pub trait Menu {
    fn title(&self) -> &str;

    fn options(&self) -> &OptionList;

    fn options_mut(&mut self) -> &mut OptionList;

    /// Action for the highlighted option.
    fn execute_selection(&self) -> Option<MenuAction>;

    /// Whether the option list should be shown and accept input.
    fn is_interactive(&self) -> bool {
        true
    }

    fn selected(&self) -> usize {
        self.options().selected()
    }

    fn handle_input(&mut self, input: InputEvent) -> Option<MenuAction> {
        navigate(self, input)
    }
}

/// Standard up/down/confirm handling.
fn navigate<M: Menu + ?Sized>(menu: &mut M, input: InputEvent) -> Option<MenuAction> {
    match input {
        InputEvent::MenuUp => {
            menu.options_mut().up();
            None
        }
        InputEvent::MenuDown => {
            menu.options_mut().down();
            None
        }
        InputEvent::MenuConfirm | InputEvent::Fire => menu.execute_selection(),
        _ => None,
    }
}

// ── Main menu ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MainMenu {
    options: OptionList,
}

impl MainMenu {
    pub fn new() -> Self {
        MainMenu {
            options: OptionList::new(["Start Game", "Select Level", "Quit Game"]),
        }
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu for MainMenu {
    fn title(&self) -> &str {
        "GALAXY SHOOTER"
    }

    fn options(&self) -> &OptionList {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    fn execute_selection(&self) -> Option<MenuAction> {
        match self.options.selected() {
            0 => Some(MenuAction::StartGame),
            1 => Some(MenuAction::OpenLevelSelect),
            2 => Some(MenuAction::QuitGame),
            _ => None,
        }
    }
}

// ── Level select ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LevelSelectMenu {
    options: OptionList,
    descriptions: Vec<String>,
    level_count: usize,
}

impl LevelSelectMenu {
    /// One entry per definition plus a trailing "Back to Main Menu".
    pub fn new<'a>(definitions: impl IntoIterator<Item = &'a LevelDefinition>) -> Self {
        let mut labels = Vec::new();
        let mut descriptions = Vec::new();
        for def in definitions {
            labels.push(def.title());
            descriptions.push(def.description());
        }
        let level_count = labels.len();
        labels.push("Back to Main Menu".to_string());
        descriptions.push("Return to the main menu".to_string());

        LevelSelectMenu {
            options: OptionList::new(labels),
            descriptions,
            level_count,
        }
    }

    /// Description line for option `index`.
    pub fn description(&self, index: usize) -> Option<&str> {
        self.descriptions.get(index).map(String::as_str)
    }
}

impl Menu for LevelSelectMenu {
    fn title(&self) -> &str {
        "SELECT LEVEL"
    }

    fn options(&self) -> &OptionList {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    fn execute_selection(&self) -> Option<MenuAction> {
        let selected = self.options.selected();
        if selected < self.level_count {
            Some(MenuAction::PlayLevel(selected))
        } else {
            Some(MenuAction::MainMenu)
        }
    }
}

// ── Pause ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PauseMenu {
    options: OptionList,
}

impl PauseMenu {
    pub fn new() -> Self {
        PauseMenu {
            options: OptionList::new(["Resume Game", "Restart Game", "Quit to Main Menu"]),
        }
    }
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu for PauseMenu {
    fn title(&self) -> &str {
        "GAME PAUSED"
    }

    fn options(&self) -> &OptionList {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    fn execute_selection(&self) -> Option<MenuAction> {
        match self.options.selected() {
            0 => Some(MenuAction::Resume),
            1 => Some(MenuAction::RestartGame),
            2 => Some(MenuAction::MainMenu),
            _ => None,
        }
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

/// Options stay hidden for `lockout_ms` after the player dies.  Any key
/// during the lockout ends it early.
#[derive(Clone, Debug)]
pub struct GameOverMenu {
    options: OptionList,
    lockout_ms: u64,
    timer_ms: u64,
}

impl GameOverMenu {
    pub fn new(lockout_ms: u64) -> Self {
        GameOverMenu {
            options: OptionList::new(["Restart Game", "Quit to Main Menu"]),
            lockout_ms,
            timer_ms: 0,
        }
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.timer_ms = self.timer_ms.saturating_add(dt_ms);
    }

    pub fn reset_timer(&mut self) {
        self.timer_ms = 0;
        self.options.reset();
    }

    pub fn timer_ms(&self) -> u64 {
        self.timer_ms
    }

    pub fn is_locked(&self) -> bool {
        self.timer_ms < self.lockout_ms
    }
}

impl Menu for GameOverMenu {
    fn title(&self) -> &str {
        "GAME OVER"
    }

    fn options(&self) -> &OptionList {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    fn execute_selection(&self) -> Option<MenuAction> {
        match self.options.selected() {
            0 => Some(MenuAction::RestartGame),
            1 => Some(MenuAction::MainMenu),
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        !self.is_locked()
    }

    fn handle_input(&mut self, input: InputEvent) -> Option<MenuAction> {
        if self.is_locked() {
            self.timer_ms = self.lockout_ms;
            return None;
        }
        navigate(self, input)
    }
}

// ── Level complete ────────────────────────────────────────────────────────────

/// Shown after a level is cleared.  Input is discarded until the lockout
/// timer runs out; there is no way to skip it.
#[derive(Clone, Debug)]
pub struct LevelCompleteMenu {
    options: OptionList,
    level_number: u32,
    level_name: String,
    has_next: bool,
    lockout_ms: u64,
    timer_ms: u64,
    can_proceed: bool,
}

impl LevelCompleteMenu {
    pub fn new(lockout_ms: u64) -> Self {
        LevelCompleteMenu {
            options: OptionList::new(["Restart Level", "Main Menu"]),
            level_number: 1,
            level_name: String::new(),
            has_next: false,
            lockout_ms,
            timer_ms: 0,
            can_proceed: false,
        }
    }

    /// Record the cleared level, restart the lockout and rebuild the options.
    pub fn set_level_info(&mut self, level_number: u32, level_name: &str, has_next: bool) {
        self.level_number = level_number;
        self.level_name = level_name.to_string();
        self.has_next = has_next;
        self.timer_ms = 0;
        self.can_proceed = false;

        self.options = if has_next {
            OptionList::new(["Next Level", "Restart Level", "Select Level", "Main Menu"])
        } else {
            OptionList::new(["Restart Level", "Select Level", "Main Menu"])
        };
    }

    pub fn update(&mut self, dt_ms: u64) {
        if !self.can_proceed {
            self.timer_ms = self.timer_ms.saturating_add(dt_ms);
            if self.timer_ms >= self.lockout_ms {
                self.can_proceed = true;
            }
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.can_proceed
    }

    /// Whole seconds left on the lockout, rounded up for display.
    pub fn seconds_remaining(&self) -> u64 {
        if self.can_proceed {
            return 0;
        }
        let remaining = self.lockout_ms.saturating_sub(self.timer_ms);
        (remaining + 999) / 1000
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn has_next_level(&self) -> bool {
        self.has_next
    }
}

impl Menu for LevelCompleteMenu {
    fn title(&self) -> &str {
        "LEVEL COMPLETE!"
    }

    fn options(&self) -> &OptionList {
        &self.options
    }

    fn options_mut(&mut self) -> &mut OptionList {
        &mut self.options
    }

    fn execute_selection(&self) -> Option<MenuAction> {
        if !self.can_proceed {
            return None;
        }
        match self.options.selected_label()? {
            "Next Level" => Some(MenuAction::NextLevel),
            "Restart Level" => Some(MenuAction::RestartLevel),
            "Select Level" => Some(MenuAction::OpenLevelSelect),
            "Main Menu" => Some(MenuAction::MainMenu),
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        self.can_proceed
    }

    fn handle_input(&mut self, input: InputEvent) -> Option<MenuAction> {
        if !self.can_proceed {
            return None;
        }
        navigate(self, input)
    }
}
