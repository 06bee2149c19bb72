/// Sequences the five levels for one session.
///
/// All levels are constructed up front and live for the whole process.
/// Out-of-range requests are no-ops that leave the current selection alone.

use std::collections::BTreeSet;

use rand::Rng;

use crate::config::GameConfig;
use crate::levels::{catalog, LevelDefinition};
use crate::progression::{Level, LevelInfo};

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressStats {
    pub total_levels: usize,
    pub completed_levels: usize,
    /// 1-based, or 0 when nothing is loaded.
    pub current_level: usize,
    pub completion_percentage: f32,
}

#[derive(Clone, Debug)]
pub struct LevelManager {
    levels: Vec<Level>,
    current_index: usize,
    loaded: bool,
    completed: BTreeSet<usize>,
}

impl LevelManager {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_definitions(catalog(), config)
    }

    pub fn with_definitions(definitions: Vec<LevelDefinition>, config: &GameConfig) -> Self {
        LevelManager {
            levels: definitions
                .into_iter()
                .map(|def| Level::new(def, config))
                .collect(),
            current_index: 0,
            loaded: false,
            completed: BTreeSet::new(),
        }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// 0-based.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_level(&self) -> Option<&Level> {
        if self.loaded {
            self.levels.get(self.current_index)
        } else {
            None
        }
    }

    pub fn current_level_mut(&mut self) -> Option<&mut Level> {
        if self.loaded {
            self.levels.get_mut(self.current_index)
        } else {
            None
        }
    }

    pub fn definitions(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter().map(|level| &level.definition)
    }

    /// Make `index` current and spawn its wave.  `None` for a bad index.
    pub fn load_level<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        now_ms: u64,
        rng: &mut R,
    ) -> Option<&mut Level> {
        if index >= self.levels.len() {
            tracing::warn!(index, count = self.levels.len(), "ignoring out-of-range level index");
            return None;
        }
        self.current_index = index;
        self.loaded = true;

        let level = &mut self.levels[index];
        level.spawn_enemies(now_ms, rng);
        tracing::info!(
            level = level.number(),
            name = level.name(),
            enemies = level.enemies.len(),
            "level loaded"
        );
        Some(level)
    }

    /// Advance to the following level.  `None` when already on the last.
    pub fn load_next_level<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<&mut Level> {
        let next = self.current_index + 1;
        if next >= self.levels.len() {
            return None;
        }
        self.load_level(next, now_ms, rng)
    }

    pub fn has_next_level(&self) -> bool {
        self.current_index + 1 < self.levels.len()
    }

    pub fn restart_current_level<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<&mut Level> {
        let level = self.current_level_mut()?;
        level.reset(now_ms, rng);
        Some(level)
    }

    /// Idempotent.
    pub fn mark_level_completed(&mut self, index: usize) {
        if self.completed.insert(index) {
            tracing::info!(index, "level marked completed");
        }
    }

    pub fn is_level_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    /// Info for `index`, or for the current level when `None`.
    pub fn level_info(&self, index: Option<usize>) -> Option<LevelInfo> {
        let (level, index) = match index {
            Some(i) => (self.levels.get(i)?, i),
            None => (self.current_level()?, self.current_index),
        };
        let mut info = level.info();
        info.is_unlocked = true;
        info.is_completed = self.is_level_completed(index);
        Some(info)
    }

    pub fn all_levels_info(&self) -> Vec<LevelInfo> {
        (0..self.levels.len())
            .filter_map(|i| self.level_info(Some(i)))
            .collect()
    }

    pub fn progress_stats(&self) -> ProgressStats {
        let total = self.levels.len();
        let completed = self.completed.len();
        ProgressStats {
            total_levels: total,
            completed_levels: completed,
            current_level: if self.loaded { self.current_index + 1 } else { 0 },
            completion_percentage: if total > 0 {
                completed as f32 / total as f32 * 100.0
            } else {
                0.0
            },
        }
    }

    /// Forget all completions and unload.  Every level is re-initialised.
    pub fn reset_progress<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) {
        self.completed.clear();
        self.current_index = 0;
        self.loaded = false;
        for level in &mut self.levels {
            level.reset(now_ms, rng);
        }
    }
}
