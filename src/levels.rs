/// Hand-authored level definitions.
///
/// A level is pure data: a formation, two difficulty multipliers and an
/// optional boss.  The enemy count is derived from the formation, so the
/// level-select text and the spawned wave can never disagree.

use crate::entities::BossKind;

/// Rows of evenly spaced enemies, centered horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Formation {
    pub rows: u32,
    pub cols: u32,
    /// Horizontal distance between enemy centers.
    pub spacing: i32,
    /// Vertical distance between rows.
    pub row_spacing: i32,
    /// Center y of the first row.
    pub top: i32,
}

impl Formation {
    pub fn count(&self) -> usize {
        (self.rows * self.cols) as usize
    }

    /// Enemy centers in row-major order.  Deterministic for a given width.
    pub fn positions(&self, screen_width: f32) -> Vec<(f32, f32)> {
        let span = (self.cols as i32 - 1).max(0) * self.spacing;
        let start_x = (screen_width as i32 - span).div_euclid(2);

        let mut positions = Vec::with_capacity(self.count());
        for row in 0..self.rows as i32 {
            let y = self.top + row * self.row_spacing;
            for col in 0..self.cols as i32 {
                let x = start_x + col * self.spacing;
                positions.push((x as f32, y as f32));
            }
        }
        positions
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelDefinition {
    /// 1-based.
    pub number: u32,
    pub name: &'static str,
    /// Short difficulty label shown on the level-select screen.
    pub tier: &'static str,
    pub formation: Formation,
    pub speed_multiplier: f32,
    pub shoot_chance_multiplier: f64,
    pub boss: Option<BossKind>,
}

impl LevelDefinition {
    pub fn enemy_count(&self) -> usize {
        self.formation.count()
    }

    pub fn has_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn enemy_positions(&self, screen_width: f32) -> Vec<(f32, f32)> {
        self.formation.positions(screen_width)
    }

    /// "Level 3: Invasion Force"
    pub fn title(&self) -> String {
        format!("Level {}: {}", self.number, self.name)
    }

    /// One-line summary generated from the definition itself.
    pub fn description(&self) -> String {
        let pace = if self.speed_multiplier <= 1.0 {
            "normal speed".to_string()
        } else {
            format!("{:.1}x speed", self.speed_multiplier)
        };
        let mut text = format!("{} - {} enemies, {}", self.tier, self.enemy_count(), pace);
        if let Some(boss) = self.boss {
            text.push_str(&format!(", boss: {}", boss.name()));
        }
        text
    }
}

/// The five levels, in play order.
pub fn catalog() -> Vec<LevelDefinition> {
    vec![
        LevelDefinition {
            number: 1,
            name: "First Contact",
            tier: "Beginner",
            formation: Formation { rows: 1, cols: 4, spacing: 120, row_spacing: 0, top: 100 },
            speed_multiplier: 1.0,
            shoot_chance_multiplier: 1.0,
            boss: None,
        },
        LevelDefinition {
            number: 2,
            name: "Escalation",
            tier: "Intermediate",
            formation: Formation { rows: 2, cols: 4, spacing: 120, row_spacing: 60, top: 80 },
            speed_multiplier: 1.3,
            shoot_chance_multiplier: 1.5,
            boss: None,
        },
        LevelDefinition {
            number: 3,
            name: "Invasion Force",
            tier: "Advanced",
            formation: Formation { rows: 2, cols: 5, spacing: 100, row_spacing: 60, top: 70 },
            speed_multiplier: 1.4,
            shoot_chance_multiplier: 1.8,
            boss: BossKind::for_level(3),
        },
        LevelDefinition {
            number: 4,
            name: "Massive Assault",
            tier: "Expert",
            formation: Formation { rows: 2, cols: 7, spacing: 80, row_spacing: 60, top: 60 },
            speed_multiplier: 1.6,
            shoot_chance_multiplier: 2.0,
            boss: BossKind::for_level(4),
        },
        LevelDefinition {
            number: 5,
            name: "Final Confrontation",
            tier: "Master",
            formation: Formation { rows: 3, cols: 6, spacing: 90, row_spacing: 55, top: 50 },
            speed_multiplier: 2.2,
            shoot_chance_multiplier: 3.0,
            boss: BossKind::for_level(5),
        },
    ]
}
