/// Sprite lookup for the renderer.
///
/// The engine only knows [`SpriteKey`]s.  [`SpriteAtlas`] turns a key into
/// glyph art: built-in sprites first, optionally replaced by entries from a
/// TOML overrides file.  Any key that cannot be resolved gets a solid
/// placeholder block instead of failing; the miss is logged once.
///
/// Override file layout:
///
/// ```toml
/// [sprites.boss3]
/// rows = ["/=##=\\", "\\_||_/"]
/// color = [255, 0, 0]
/// ```

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::entities::SpriteKey;
use crate::error::GameError;

/// Default overrides file.
pub const DEFAULT_SPRITES_PATH: &str = "assets/sprites.toml";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rows: Vec<String>,
    pub color: Rgb,
    pub placeholder: bool,
}

impl Sprite {
    fn new(rows: &[&str], color: Rgb) -> Self {
        Sprite {
            rows: rows.iter().map(|r| r.to_string()).collect(),
            color,
            placeholder: false,
        }
    }

    /// Deterministic stand-in for `key`: a solid block in a color picked
    /// from the key alone.
    pub fn placeholder(key: &str) -> Self {
        let (rows, width) = if key.starts_with("boss") { (3, 7) } else { (1, 3) };
        Sprite {
            rows: vec!["█".repeat(width); rows],
            color: placeholder_color(key),
            placeholder: true,
        }
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Boss placeholders are colored by level; everything else is white.
pub fn placeholder_color(key: &str) -> Rgb {
    match key {
        "boss3" => Rgb(255, 0, 0),
        "boss4" => Rgb(255, 165, 0),
        "boss5" => Rgb(128, 0, 128),
        _ => Rgb::WHITE,
    }
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    sprites: HashMap<String, SpriteEntry>,
}

#[derive(Debug, Deserialize)]
struct SpriteEntry {
    rows: Vec<String>,
    color: Option<Rgb>,
}

#[derive(Clone, Debug)]
pub struct SpriteAtlas {
    sprites: HashMap<String, Sprite>,
    warned: HashSet<String>,
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SpriteAtlas {
    /// An atlas with nothing in it; every lookup falls back.
    pub fn empty() -> Self {
        SpriteAtlas {
            sprites: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut atlas = Self::empty();
        let aliens = [
            Rgb(80, 220, 80),
            Rgb(80, 200, 255),
            Rgb(255, 220, 60),
            Rgb(255, 120, 200),
            Rgb(200, 140, 255),
        ];
        let alien_art: [&[&str]; 5] = [
            &["/o\\"],
            &["<O>"],
            &["{@}"],
            &["\\V/"],
            &["[#]"],
        ];
        for (i, (art, color)) in alien_art.iter().zip(aliens).enumerate() {
            atlas.insert(SpriteKey::Alien(i as u8 + 1), Sprite::new(art, color));
        }

        atlas.insert(SpriteKey::Spaceship, Sprite::new(&[" ^ ", "/#\\"], Rgb::WHITE));
        atlas.insert(SpriteKey::Bullet, Sprite::new(&["|"], Rgb(0, 255, 255)));
        atlas.insert(SpriteKey::AlienBullet, Sprite::new(&["!"], Rgb(255, 0, 255)));
        atlas.insert(
            SpriteKey::Boss(3),
            Sprite::new(&["/=###=\\", "<|o o|>", " \\_V_/ "], Rgb(255, 60, 60)),
        );
        atlas.insert(
            SpriteKey::Boss(4),
            Sprite::new(&["[=====]", "|#[O]#|", "/_/ \\_\\"], Rgb(255, 165, 0)),
        );
        atlas.insert(
            SpriteKey::Boss(5),
            Sprite::new(&["<<=@=>>", "|{###}|", " \\\\|// "], Rgb(190, 80, 255)),
        );

        let frames: [&str; 5] = [".", "*", "*#*", "#*#", "."];
        for (i, frame) in frames.into_iter().enumerate() {
            atlas.insert(
                SpriteKey::Explosion(i + 1),
                Sprite::new(&[frame], Rgb(255, 200, 0)),
            );
        }
        atlas
    }

    pub fn insert(&mut self, key: SpriteKey, sprite: Sprite) {
        self.sprites.insert(key.to_string(), sprite);
    }

    /// Layer entries from a TOML overrides file on top of the current atlas.
    /// Unreadable or unparsable files are an error; individual malformed
    /// entries are logged and skipped.  Returns the number applied.
    pub fn apply_overrides(&mut self, path: &Path) -> Result<usize, GameError> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::AssetLoad {
            key: path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.apply_overrides_str(&text)
            .map_err(|reason| GameError::AssetLoad {
                key: path.display().to_string(),
                reason,
            })
    }

    fn apply_overrides_str(&mut self, text: &str) -> Result<usize, String> {
        let file: OverrideFile = toml::from_str(text).map_err(|e| e.to_string())?;
        let mut applied = 0;
        for (key, entry) in file.sprites {
            match validate_entry(&key, &entry) {
                Ok(()) => {
                    let color = entry.color.unwrap_or_else(|| placeholder_color(&key));
                    self.sprites.insert(
                        key,
                        Sprite {
                            rows: entry.rows,
                            color,
                            placeholder: false,
                        },
                    );
                    applied += 1;
                }
                Err(err) => {
                    // drop any built-in too, the override said this key is broken
                    self.sprites.remove(&key);
                    tracing::warn!("{err}");
                }
            }
        }
        Ok(applied)
    }

    /// Sprite for `key`, or a placeholder if none is available.
    pub fn resolve(&mut self, key: SpriteKey) -> Sprite {
        let name = key.to_string();
        if let Some(sprite) = self.sprites.get(&name) {
            return sprite.clone();
        }
        if self.warned.insert(name.clone()) {
            tracing::warn!(key = %name, "sprite not found, using placeholder");
        }
        Sprite::placeholder(&name)
    }
}

fn validate_entry(key: &str, entry: &SpriteEntry) -> Result<(), GameError> {
    if entry.rows.is_empty() || entry.rows.iter().all(|r| r.trim().is_empty()) {
        return Err(GameError::AssetLoad {
            key: key.to_string(),
            reason: "sprite has no visible rows".to_string(),
        });
    }
    Ok(())
}
