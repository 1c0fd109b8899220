//! Projectiles: a bounded pool of unit-velocity shots.

use glam::Vec2;
use smallvec::SmallVec;

use crate::defs::{MAX_PROJECTILES, PROJECTILE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

use super::collision::Rect;
use super::cursor::Cursor;
use super::player::Player;

/// Sub-pixel position is load-bearing: velocity is a unit vector, so a
/// shot advances less than a pixel per frame on each axis.
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub pos: Vec2,
    pub width: i32,
    pub height: i32,
    pub vel: Vec2,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x as i32, self.pos.y as i32, self.width, self.height)
    }
}

/// Owns every live shot. Capacity is fixed at [`MAX_PROJECTILES`] and the
/// storage stays inline; the old linked list's append/count/remove
/// contract maps onto plain index operations with swap-removal.
#[derive(Default)]
pub struct ProjectilePool {
    slots: SmallVec<[Projectile; MAX_PROJECTILES]>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire from the player's center toward the cursor's center.
    ///
    /// Fails (no-op) at the pool cap, and for a degenerate zero-length
    /// aim vector that cannot be normalized.
    pub fn spawn(&mut self, player: &Player, cursor: &Cursor) -> bool {
        if self.slots.len() >= MAX_PROJECTILES {
            return false;
        }
        let Some(vel) = (cursor.center() - player.center()).try_normalize() else {
            return false;
        };
        self.slots.push(Projectile {
            pos: player.center(),
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            vel,
        });
        true
    }

    /// Advance every shot one frame and drop the ones that left the
    /// screen; the count shrinks by exactly the number dropped.
    pub fn advance(&mut self) {
        let mut i = 0;
        while i < self.slots.len() {
            let p = &mut self.slots[i];
            p.pos += p.vel;

            let off = p.pos.x < 0.0
                || p.pos.x + p.width as f32 > SCREEN_WIDTH as f32
                || p.pos.y < 0.0
                || p.pos.y + p.height as f32 > SCREEN_HEIGHT as f32;
            if off {
                self.slots.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Projectile {
        &self.slots[idx]
    }

    pub fn remove(&mut self, idx: usize) {
        self.slots.swap_remove(idx);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.slots.iter()
    }

    /// Insert a shot with explicit position and velocity.
    #[cfg(test)]
    pub(crate) fn push_raw(&mut self, pos: Vec2, vel: Vec2) {
        self.slots.push(Projectile {
            pos,
            width: PROJECTILE_SIZE,
            height: PROJECTILE_SIZE,
            vel,
        });
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
