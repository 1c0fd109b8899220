//! Per-frame entity simulation: player, cursor, projectiles, goblins,
//! and the overlap resolution that couples them.

mod collision;
mod cursor;
mod facing;
mod goblin;
mod player;
mod projectile;

pub use collision::{attacking_goblin_hits, resolve_projectile_hits, Rect};
pub use cursor::Cursor;
pub use facing::Facing;
pub use goblin::{Goblin, GoblinHorde};
pub use player::{Player, PlayerState};
pub use projectile::{Projectile, ProjectilePool};
