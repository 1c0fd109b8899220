//! Axis-aligned overlap tests and the two per-frame collision passes.

use super::goblin::GoblinHorde;
use super::player::{Player, PlayerState};
use super::projectile::ProjectilePool;

/// Axis-aligned box, half-open on both axes: `[x, x+w) × [y, y+h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Half-open interval intersection on each axis; boxes that only
    /// share an edge do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Count attack-box overlaps against the player this frame.
///
/// Gated per goblin on its attacking flag and on the player's pre-damage
/// state; every overlapping attacker lands its own hit, with no
/// shared-frame dedup. The caller applies that many damage events.
pub fn attacking_goblin_hits(player: &Player, horde: &GoblinHorde) -> u32 {
    if player.state == PlayerState::Evasion {
        return 0;
    }

    let player_box = player.rect();
    horde
        .iter()
        .filter(|g| g.attacking && g.attack_box().intersects(&player_box))
        .count() as u32
}

/// Resolve projectile-vs-goblin overlaps.
///
/// Each projectile damages at most the first goblin it overlaps, then is
/// removed; a goblin dropping to zero health is removed the same frame.
pub fn resolve_projectile_hits(projectiles: &mut ProjectilePool, horde: &mut GoblinHorde) {
    let mut p = 0;
    while p < projectiles.len() {
        let shot = projectiles.get(p).rect();
        let hit = horde.iter().position(|g| g.hitbox().intersects(&shot));
        match hit {
            Some(hit) => {
                horde.damage(hit);
                projectiles.remove(p);
            }
            None => p += 1,
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
