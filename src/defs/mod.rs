//! Fixed board/game data shared by every subsystem.
//!
//! One flat module so the tuning numbers live in a single place, the same
//! way the original register maps and gameplay constants did.

/* ── display ──────────────────────────────────────────────────────── */

pub const SCREEN_WIDTH: i32 = 320;
pub const SCREEN_HEIGHT: i32 = 240;

/// RGB565 colors used by the flat-color draws.
pub const BLACK: u16 = 0x0000;
pub const GREEN: u16 = 0x07E0;
pub const RED: u16 = 0xF800;
pub const YELLOW: u16 = 0xFFE0;

/* ── timers ───────────────────────────────────────────────────────── */

/// Interval-timer ticks per millisecond (100 MHz input clock).
pub const TICKS_PER_MS: u32 = 100_000;

pub const SCORE_TICK_MS: u32 = 1_000;
pub const EVASION_MS: u32 = 2_000;
pub const EVASION_COOLDOWN_MS: u32 = 30_000;
pub const HIT_STUN_MS: u32 = 500;

/* ── player ───────────────────────────────────────────────────────── */

pub const PLAYER_START_X: i32 = 100;
pub const PLAYER_START_Y: i32 = 60;
pub const PLAYER_WIDTH: i32 = 10;
pub const PLAYER_HEIGHT: i32 = 10;
pub const PLAYER_HEALTH: i16 = 100;
pub const PLAYER_SPEED: i32 = 5;
pub const PLAYER_ANIM_FRAMES: u8 = 10;
/// Frames between shots (the cooldown counter is set to this + 1).
pub const SHOOT_COOLDOWN_FRAMES: u32 = 25;

/* ── cursor ───────────────────────────────────────────────────────── */

pub const CURSOR_START_X: i32 = 100;
pub const CURSOR_START_Y: i32 = 60;
pub const CURSOR_WIDTH: i32 = 10;
pub const CURSOR_HEIGHT: i32 = 10;
pub const CURSOR_SPEED: i32 = 5;

/* ── projectiles ──────────────────────────────────────────────────── */

pub const PROJECTILE_SIZE: i32 = 2;
pub const MAX_PROJECTILES: usize = 10;

/* ── goblins ──────────────────────────────────────────────────────── */

/// Sprite footprint; the hitbox is a smaller centered box.
pub const GOBLIN_SPRITE_SIZE: i32 = 48;
pub const GOBLIN_ANIM_FRAMES: u8 = 6;
pub const GOBLIN_HEALTH: i16 = 100;
/// Spawned speeds are drawn uniformly from `1..=GOBLIN_MAX_SPEED`.
pub const GOBLIN_MAX_SPEED: i32 = 4;
/// A goblin switches from walking to attacking inside this radius.
pub const GOBLIN_ATTACK_RANGE: f32 = 40.0;

pub const GOBLIN_HITBOX_OFFSET: i32 = 12;
pub const GOBLIN_HITBOX_WIDTH: i32 = 24;
pub const GOBLIN_HITBOX_HEIGHT: i32 = 24;
pub const GOBLIN_ATTACK_BOX_WIDTH: i32 = 16;
pub const GOBLIN_ATTACK_BOX_HEIGHT: i32 = 16;
/// Attack boxes overlap the hitbox edge by this much.
pub const GOBLIN_ATTACK_BOX_PADDING: i32 = 4;
pub const GOBLIN_ATTACK_BOX_Y_OFFSET: i32 = 4;

/// Exclusion margin around the play area edges.
pub const BOUNDARY: i32 = 5;

pub const MAX_GOBLINS: usize = 5;
pub const SPAWN_INTERVAL_FRAMES: u32 = 120;
