/// All game entity types and their per-tick behaviour.
///
/// Positions are world units (the stock playfield is 600×800).  Time is an
/// explicit session clock in milliseconds passed to everything that fires;
/// randomness always comes through an injected `Rng`.

use std::fmt;

use rand::Rng;

use crate::config::GameConfig;
use crate::input::Steering;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box, `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Half-open: the right and bottom edges are outside.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Pull the box back inside `[0, width]`.  Returns which edge was hit.
    fn clamp_horizontal(&mut self, width: f32) -> Option<Edge> {
        if self.left() < 0.0 {
            self.x = 0.0;
            Some(Edge::Left)
        } else if self.right() > width {
            self.x = width - self.w;
            Some(Edge::Right)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Edge {
    Left,
    Right,
}

// ── Sprite identity ───────────────────────────────────────────────────────────

/// Stable key the renderer resolves to a visual.  The core never needs more
/// than this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Spaceship,
    /// Regular enemy art, 1..=5.
    Alien(u8),
    /// Boss art, keyed by the level the boss belongs to.
    Boss(u32),
    Bullet,
    AlienBullet,
    /// Explosion animation frame, 1-based.
    Explosion(usize),
}

impl fmt::Display for SpriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteKey::Spaceship => write!(f, "spaceship"),
            SpriteKey::Alien(n) => write!(f, "alien{}", n),
            SpriteKey::Boss(level) => write!(f, "boss{}", level),
            SpriteKey::Bullet => write!(f, "bullet"),
            SpriteKey::AlienBullet => write!(f, "alien_bullet"),
            SpriteKey::Explosion(n) => write!(f, "exp{}", n),
        }
    }
}

// ── Capability interface ─────────────────────────────────────────────────────

/// Anything that moves on its own, shoots and can be hit.
pub trait Combatant {
    /// Advance one tick of movement.
    fn update(&mut self);

    /// Try to fire at session time `now_ms`.
    fn attempt_fire<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<Bullet>;

    fn bounds(&self) -> Rect;

    fn is_alive(&self) -> bool;
}

/// Cooldown check shared by every shooter.  Strict: firing exactly at the
/// delay boundary is not allowed yet.
fn cooldown_elapsed(now_ms: u64, last_shot_ms: u64, delay_ms: u64) -> bool {
    now_ms.saturating_sub(last_shot_ms) > delay_ms
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A point projectile travelling straight up (player) or down (enemy/boss).
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub owner: BulletOwner,
    /// Enemy bullets die once past this line; unused for player bullets.
    pub floor: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn player(x: f32, y: f32, speed: f32) -> Self {
        Bullet {
            x,
            y,
            speed,
            owner: BulletOwner::Player,
            floor: 0.0,
            alive: true,
        }
    }

    pub fn enemy(x: f32, y: f32, speed: f32, floor: f32) -> Self {
        Bullet {
            x,
            y,
            speed,
            owner: BulletOwner::Enemy,
            floor,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        match self.owner {
            BulletOwner::Player => {
                self.y -= self.speed;
                // bottom edge of a point is the point itself
                if self.y < 0.0 {
                    self.alive = false;
                }
            }
            BulletOwner::Enemy => {
                self.y += self.speed;
                if self.y > self.floor {
                    self.alive = false;
                }
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, 0.0, 0.0)
    }

    pub fn sprite(&self) -> SpriteKey {
        match self.owner {
            BulletOwner::Player => SpriteKey::Bullet,
            BulletOwner::Enemy => SpriteKey::AlienBullet,
        }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

/// Transient frame-indexed animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    /// Current frame, 0-based.
    pub frame: usize,
    pub counter: u32,
    pub frames: usize,
    pub ticks_per_frame: u32,
    pub alive: bool,
}

impl Explosion {
    pub fn new(x: f32, y: f32, config: &GameConfig) -> Self {
        Explosion {
            x,
            y,
            frame: 0,
            counter: 0,
            frames: config.explosion_frames,
            ticks_per_frame: config.explosion_ticks_per_frame,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        let last = self.frames.saturating_sub(1);
        self.counter += 1;

        if self.counter >= self.ticks_per_frame && self.frame < last {
            self.counter = 0;
            self.frame += 1;
        }

        if self.frame >= last && self.counter >= self.ticks_per_frame {
            self.alive = false;
        }
    }

    pub fn sprite(&self) -> SpriteKey {
        SpriteKey::Explosion(self.frame + 1)
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
    pub screen_width: f32,
    pub fire_cooldown_ms: u64,
    pub last_shot_ms: u64,
    pub bullet_speed: f32,
    /// Directional keys held this tick.
    pub steering: Steering,
    pub alive: bool,
}

impl Player {
    /// Player centered horizontally near the bottom.  The fire cooldown
    /// starts running at spawn time.
    pub fn spawn(config: &GameConfig, now_ms: u64) -> Self {
        Player {
            rect: Rect::from_center(
                (config.screen_width / 2.0).floor(),
                config.screen_height - config.player_spawn_offset,
                config.player_width,
                config.player_height,
            ),
            speed: config.player_speed,
            screen_width: config.screen_width,
            fire_cooldown_ms: config.player_fire_cooldown_ms,
            last_shot_ms: now_ms,
            bullet_speed: config.bullet_speed,
            steering: Steering::NONE,
            alive: true,
        }
    }

    pub fn steer(&mut self, steering: Steering) {
        self.steering = steering;
    }

    /// Fire from the ship's nose if the cooldown has run out.
    pub fn shoot(&mut self, now_ms: u64) -> Option<Bullet> {
        if !self.alive || !cooldown_elapsed(now_ms, self.last_shot_ms, self.fire_cooldown_ms) {
            return None;
        }
        self.last_shot_ms = now_ms;
        Some(Bullet::player(
            self.rect.center_x(),
            self.rect.top(),
            self.bullet_speed,
        ))
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    pub fn sprite(&self) -> SpriteKey {
        SpriteKey::Spaceship
    }
}

impl Combatant for Player {
    fn update(&mut self) {
        if !self.alive {
            return;
        }
        self.rect.x += self.steering.axis() * self.speed;
        self.rect.clamp_horizontal(self.screen_width);
    }

    fn attempt_fire<R: Rng + ?Sized>(&mut self, now_ms: u64, _rng: &mut R) -> Option<Bullet> {
        self.shoot(now_ms)
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

// ── Horizontal sweep shared by enemies and bosses ─────────────────────────────

/// Left/right oscillation.  `counter` tracks net travel in ticks; once it
/// exceeds `bounce_ticks` either way the direction flips.
#[derive(Clone, Debug, PartialEq)]
pub struct Sweep {
    pub direction: f32,
    pub counter: i32,
    pub bounce_ticks: i32,
}

impl Sweep {
    fn new(bounce_ticks: i32) -> Self {
        Sweep {
            direction: 1.0,
            counter: 0,
            bounce_ticks,
        }
    }

    /// Move `rect` one step.  Returns true when the travel threshold flipped
    /// the direction this tick.
    fn step(&mut self, rect: &mut Rect, speed: f32, screen_width: f32) -> bool {
        rect.x += self.direction * speed;
        self.counter += self.direction as i32;

        let bounced = self.counter.abs() > self.bounce_ticks;
        if bounced {
            self.direction = -self.direction;
        }

        match rect.clamp_horizontal(screen_width) {
            Some(Edge::Left) => self.direction = 1.0,
            Some(Edge::Right) => self.direction = -1.0,
            None => {}
        }
        bounced
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub speed: f32,
    pub sweep: Sweep,
    pub descent: f32,
    pub screen_width: f32,
    /// Per-tick probability of firing once the cooldown has elapsed.
    pub shoot_chance: f64,
    pub last_shot_ms: u64,
    pub shoot_delay_ms: u64,
    pub cooldown_range_ms: (u64, u64),
    pub bullet_speed: f32,
    pub bullet_floor: f32,
    pub sprite: SpriteKey,
    pub alive: bool,
}

impl Enemy {
    /// Base enemy centered on `(x, y)`.  Level multipliers are applied by the
    /// caller after construction.
    pub fn spawn<R: Rng + ?Sized>(
        x: f32,
        y: f32,
        config: &GameConfig,
        now_ms: u64,
        rng: &mut R,
    ) -> Self {
        let range = (
            config.enemy_fire_cooldown_min_ms,
            config.enemy_fire_cooldown_max_ms,
        );
        Enemy {
            rect: Rect::from_center(x, y, config.enemy_width, config.enemy_height),
            speed: config.enemy_speed,
            sweep: Sweep::new(config.enemy_bounce_ticks),
            descent: config.enemy_descent,
            screen_width: config.screen_width,
            shoot_chance: config.enemy_shoot_chance,
            last_shot_ms: now_ms,
            shoot_delay_ms: rng.gen_range(range.0..=range.1),
            cooldown_range_ms: range,
            bullet_speed: config.enemy_bullet_speed,
            bullet_floor: config.enemy_bullet_floor,
            sprite: SpriteKey::Alien(rng.gen_range(1..=5)),
            alive: true,
        }
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

impl Combatant for Enemy {
    fn update(&mut self) {
        if self.sweep.step(&mut self.rect, self.speed, self.screen_width) {
            self.rect.y += self.descent;
        }
    }

    fn attempt_fire<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<Bullet> {
        if !self.alive || !cooldown_elapsed(now_ms, self.last_shot_ms, self.shoot_delay_ms) {
            return None;
        }
        if rng.gen::<f64>() >= self.shoot_chance {
            return None;
        }
        self.last_shot_ms = now_ms;
        self.shoot_delay_ms = rng.gen_range(self.cooldown_range_ms.0..=self.cooldown_range_ms.1);
        Some(Bullet::enemy(
            self.rect.center_x(),
            self.rect.bottom(),
            self.bullet_speed,
            self.bullet_floor,
        ))
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossKind {
    GuardianDestroyer,
    WarMachine,
    OmegaCommander,
}

impl BossKind {
    /// Boss guarding the given 1-based level, if any.
    pub fn for_level(level_number: u32) -> Option<Self> {
        match level_number {
            3 => Some(BossKind::GuardianDestroyer),
            4 => Some(BossKind::WarMachine),
            5 => Some(BossKind::OmegaCommander),
            _ => None,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            BossKind::GuardianDestroyer => 3,
            BossKind::WarMachine => 4,
            BossKind::OmegaCommander => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BossKind::GuardianDestroyer => "Guardian Destroyer",
            BossKind::WarMachine => "War Machine",
            BossKind::OmegaCommander => "Omega Commander",
        }
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            BossKind::GuardianDestroyer => 5,
            BossKind::WarMachine => 8,
            BossKind::OmegaCommander => 12,
        }
    }

    pub fn sprite(&self) -> SpriteKey {
        SpriteKey::Boss(self.level())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub kind: BossKind,
    pub rect: Rect,
    pub speed: f32,
    pub sweep: Sweep,
    pub screen_width: f32,
    pub max_hp: u32,
    pub current_hp: u32,
    alive: bool,
    pub last_shot_ms: u64,
    pub shoot_delay_ms: u64,
    pub cooldown_range_ms: (u64, u64),
    pub bullet_speed: f32,
    pub bullet_floor: f32,
}

impl Boss {
    /// Boss at full HP, top-centered.
    pub fn spawn<R: Rng + ?Sized>(
        kind: BossKind,
        config: &GameConfig,
        now_ms: u64,
        rng: &mut R,
    ) -> Self {
        let range = (
            config.boss_fire_cooldown_min_ms,
            config.boss_fire_cooldown_max_ms,
        );
        let cx = (config.screen_width / 2.0).floor();
        Boss {
            kind,
            rect: Rect::new(
                cx - config.boss_width / 2.0,
                config.boss_top,
                config.boss_width,
                config.boss_height,
            ),
            speed: config.boss_speed,
            sweep: Sweep::new(config.boss_bounce_ticks),
            screen_width: config.screen_width,
            max_hp: kind.max_hp(),
            current_hp: kind.max_hp(),
            alive: true,
            last_shot_ms: now_ms,
            shoot_delay_ms: rng.gen_range(range.0..=range.1),
            cooldown_range_ms: range,
            bullet_speed: config.enemy_bullet_speed,
            bullet_floor: config.enemy_bullet_floor,
        }
    }

    /// Subtract HP, clamping at zero.  Returns whether the boss is still
    /// alive.  Once defeated, further damage changes nothing.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.current_hp = self.current_hp.saturating_sub(amount);
        if self.current_hp == 0 {
            self.alive = false;
        }
        self.alive
    }

    pub fn is_defeated(&self) -> bool {
        !self.alive
    }

    /// Remaining HP in `0.0..=1.0`.
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.current_hp as f32 / self.max_hp as f32
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn sprite(&self) -> SpriteKey {
        self.kind.sprite()
    }
}

impl Combatant for Boss {
    /// Horizontal bounce only; bosses never descend.
    fn update(&mut self) {
        self.sweep.step(&mut self.rect, self.speed, self.screen_width);
    }

    /// Not probability gated: fires whenever the cooldown has elapsed.
    fn attempt_fire<R: Rng + ?Sized>(&mut self, now_ms: u64, rng: &mut R) -> Option<Bullet> {
        if !self.alive || !cooldown_elapsed(now_ms, self.last_shot_ms, self.shoot_delay_ms) {
            return None;
        }
        self.last_shot_ms = now_ms;
        self.shoot_delay_ms = rng.gen_range(self.cooldown_range_ms.0..=self.cooldown_range_ms.1);
        Some(Bullet::enemy(
            self.rect.center_x(),
            self.rect.bottom(),
            self.bullet_speed,
            self.bullet_floor,
        ))
    }

    fn bounds(&self) -> Rect {
        self.rect
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
