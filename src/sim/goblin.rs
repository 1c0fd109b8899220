//! Goblin AI, spawning, and horde bookkeeping.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::defs::{
    BOUNDARY, GOBLIN_ANIM_FRAMES, GOBLIN_ATTACK_BOX_HEIGHT, GOBLIN_ATTACK_BOX_PADDING,
    GOBLIN_ATTACK_BOX_WIDTH, GOBLIN_ATTACK_BOX_Y_OFFSET, GOBLIN_ATTACK_RANGE, GOBLIN_HEALTH,
    GOBLIN_HITBOX_HEIGHT, GOBLIN_HITBOX_OFFSET, GOBLIN_HITBOX_WIDTH, GOBLIN_MAX_SPEED,
    GOBLIN_SPRITE_SIZE, MAX_GOBLINS, SCREEN_HEIGHT, SCREEN_WIDTH, SPAWN_INTERVAL_FRAMES,
};

use super::collision::Rect;
use super::facing::Facing;
use super::player::Player;

pub struct Goblin {
    pub x: i32,
    pub y: i32,
    pub health: i16,
    pub speed: i32,
    /// True while the player is inside [`GOBLIN_ATTACK_RANGE`].
    pub attacking: bool,
    /// One flag per axis, from the sign of the pursuit vector.
    pub facing: Facing,
    /// Dominant pursuit axis; selects the sprite sheet and attack box.
    pub heading: Facing,
    pub current_frame: u8,
    pub frames_in_animation: u8,
}

impl Goblin {
    pub fn spawned(x: i32, y: i32, speed: i32, facing: Facing) -> Self {
        Self {
            x,
            y,
            health: GOBLIN_HEALTH,
            speed,
            attacking: false,
            facing,
            heading: facing.vertical(),
            current_frame: 0,
            frames_in_animation: GOBLIN_ANIM_FRAMES,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x + GOBLIN_SPRITE_SIZE / 2) as f32,
            (self.y + GOBLIN_SPRITE_SIZE / 2) as f32,
        )
    }

    /// Centered sub-box of the sprite used for projectile hits.
    pub fn hitbox(&self) -> Rect {
        Rect::new(
            self.x + GOBLIN_HITBOX_OFFSET,
            self.y + GOBLIN_HITBOX_OFFSET,
            GOBLIN_HITBOX_WIDTH,
            GOBLIN_HITBOX_HEIGHT,
        )
    }

    /// Swing area in front of the current heading. Each box overlaps the
    /// hitbox edge by the padding so point-blank contact still lands.
    pub fn attack_box(&self) -> Rect {
        let hb = self.hitbox();
        if self.heading.contains(Facing::LEFT) {
            Rect::new(
                hb.x - GOBLIN_ATTACK_BOX_WIDTH,
                hb.y + GOBLIN_ATTACK_BOX_Y_OFFSET,
                GOBLIN_ATTACK_BOX_WIDTH + GOBLIN_ATTACK_BOX_PADDING,
                GOBLIN_ATTACK_BOX_HEIGHT,
            )
        } else if self.heading.contains(Facing::RIGHT) {
            Rect::new(
                hb.x + hb.w - GOBLIN_ATTACK_BOX_PADDING,
                hb.y + GOBLIN_ATTACK_BOX_Y_OFFSET,
                GOBLIN_ATTACK_BOX_WIDTH + GOBLIN_ATTACK_BOX_PADDING,
                GOBLIN_ATTACK_BOX_HEIGHT,
            )
        } else if self.heading.contains(Facing::DOWN) {
            Rect::new(
                hb.x,
                hb.y + hb.h - GOBLIN_ATTACK_BOX_PADDING,
                hb.w,
                GOBLIN_ATTACK_BOX_HEIGHT + GOBLIN_ATTACK_BOX_PADDING,
            )
        } else {
            Rect::new(
                hb.x,
                hb.y - GOBLIN_ATTACK_BOX_HEIGHT,
                hb.w,
                GOBLIN_ATTACK_BOX_HEIGHT + GOBLIN_ATTACK_BOX_PADDING,
            )
        }
    }

    /// One AI tick: face the player, pick walk/attack, move.
    fn drive(&mut self, player: &Player) {
        let delta = player.center() - self.center();

        let mut facing = if delta.x > 0.0 { Facing::RIGHT } else { Facing::LEFT };
        facing |= if delta.y < 0.0 { Facing::UP } else { Facing::DOWN };
        self.heading = if delta.x.abs() >= delta.y.abs() {
            facing.horizontal()
        } else {
            facing.vertical()
        };

        let dist = delta.length();
        self.attacking = dist < GOBLIN_ATTACK_RANGE;

        let (mut step_x, mut step_y) = (0, 0);
        if dist > 0.0 {
            let step = delta / dist * self.speed as f32;
            step_x = step.x as i32;
            step_y = step.y as i32;
        }

        // Pursuit that would leave the fenced play area turns into an
        // axis-aligned bounce off the violated edge(s).
        let (next_x, next_y) = (self.x + step_x, self.y + step_y);
        if !in_bounds(next_x, next_y, GOBLIN_SPRITE_SIZE, GOBLIN_SPRITE_SIZE) {
            if next_x <= BOUNDARY {
                facing.insert(Facing::RIGHT);
                facing.remove(Facing::LEFT);
            }
            if next_x + GOBLIN_SPRITE_SIZE + BOUNDARY >= SCREEN_WIDTH {
                facing.remove(Facing::RIGHT);
                facing.insert(Facing::LEFT);
            }
            if next_y <= BOUNDARY {
                facing.insert(Facing::UP);
                facing.remove(Facing::DOWN);
            }
            if next_y + GOBLIN_SPRITE_SIZE + BOUNDARY >= SCREEN_HEIGHT {
                facing.remove(Facing::UP);
                facing.insert(Facing::DOWN);
            }
            // Here the flags mean "which edge", so UP pushes down into
            // the field and DOWN pushes up.
            step_x = if facing.contains(Facing::RIGHT) { self.speed } else { -self.speed };
            step_y = if facing.contains(Facing::UP) { self.speed } else { -self.speed };
        }

        self.x += step_x;
        self.y += step_y;
        self.facing = facing;
        self.current_frame = (self.current_frame + 1) % self.frames_in_animation;
    }
}

/// Play-area membership with the spawn/bounce margin applied.
pub fn in_bounds(x: i32, y: i32, width: i32, height: i32) -> bool {
    x > BOUNDARY
        && x + width + BOUNDARY < SCREEN_WIDTH
        && y > BOUNDARY
        && y + height + BOUNDARY < SCREEN_HEIGHT
}

/// Owns every live goblin plus the spawner that keeps the field stocked.
pub struct GoblinHorde {
    goblins: Vec<Goblin>,
    rng: SmallRng,
    frames_until_spawn: u32,
}

impl GoblinHorde {
    pub fn new(seed: u64) -> Self {
        Self {
            goblins: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            frames_until_spawn: 0,
        }
    }

    /// Drive every goblin one tick, then give the spawner its turn.
    pub fn update(&mut self, player: &Player) {
        for g in &mut self.goblins {
            g.drive(player);
        }

        if self.frames_until_spawn > 0 {
            self.frames_until_spawn -= 1;
        } else if self.goblins.len() < MAX_GOBLINS {
            self.spawn_one();
            self.frames_until_spawn = SPAWN_INTERVAL_FRAMES;
        }
    }

    /// Damage one goblin; removes it (swap-remove) when health runs out.
    /// Returns true if the goblin died.
    pub fn damage(&mut self, idx: usize) -> bool {
        let g = &mut self.goblins[idx];
        g.health -= 1;
        if g.health <= 0 {
            self.goblins.swap_remove(idx);
            true
        } else {
            false
        }
    }

    pub fn push(&mut self, goblin: Goblin) {
        self.goblins.push(goblin);
    }

    pub fn len(&self) -> usize {
        self.goblins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goblins.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Goblin {
        &self.goblins[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goblin> {
        self.goblins.iter()
    }

    fn spawn_one(&mut self) {
        let x = self
            .rng
            .gen_range(BOUNDARY + 1..SCREEN_WIDTH - GOBLIN_SPRITE_SIZE - BOUNDARY);
        let y = self
            .rng
            .gen_range(BOUNDARY + 1..SCREEN_HEIGHT - GOBLIN_SPRITE_SIZE - BOUNDARY);
        let speed = self.rng.gen_range(1..=GOBLIN_MAX_SPEED);
        let facing = match self.rng.gen_range(0..8) {
            0 => Facing::RIGHT,
            1 => Facing::RIGHT | Facing::UP,
            2 => Facing::UP,
            3 => Facing::UP | Facing::LEFT,
            4 => Facing::LEFT,
            5 => Facing::LEFT | Facing::DOWN,
            6 => Facing::DOWN,
            _ => Facing::DOWN | Facing::RIGHT,
        };
        self.goblins.push(Goblin::spawned(x, y, speed, facing));
    }

    #[cfg(test)]
    pub(crate) fn with_goblins(goblins: Vec<Goblin>) -> Self {
        Self {
            goblins,
            rng: SmallRng::seed_from_u64(0),
            frames_until_spawn: u32::MAX,
        }
    }

    #[cfg(test)]
    pub(crate) fn get_mut(&mut self, idx: usize) -> &mut Goblin {
        &mut self.goblins[idx]
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new() // (100, 60), 10x10, center (105, 65)
    }

    #[test]
    fn faces_and_chases_the_player() {
        let mut horde = GoblinHorde::with_goblins(vec![Goblin::spawned(
            200,
            150,
            2,
            Facing::DOWN,
        )]);
        let p = player();

        horde.update(&p);
        let g = horde.get(0);
        // Player center is up-left of the goblin center (224, 174).
        assert!(g.facing.contains(Facing::LEFT) && g.facing.contains(Facing::UP));
        assert_eq!(g.heading, Facing::LEFT); // |dx| > |dy|
        assert!(g.x < 200 && g.y < 150);
        assert!(!g.attacking);
    }

    #[test]
    fn pursuit_step_is_speed_bounded() {
        let mut horde =
            GoblinHorde::with_goblins(vec![Goblin::spawned(200, 150, 3, Facing::DOWN)]);
        let p = player();
        let (x0, y0) = (horde.get(0).x, horde.get(0).y);

        horde.update(&p);
        let g = horde.get(0);
        assert!((g.x - x0).abs() <= 3 && (g.y - y0).abs() <= 3);
    }

    #[test]
    fn close_range_flips_to_attacking() {
        let mut g = Goblin::spawned(0, 0, 1, Facing::DOWN);
        let p = player();
        // Park the goblin center right next to the player center.
        g.x = p.center().x as i32 - GOBLIN_SPRITE_SIZE / 2 + 10;
        g.y = p.center().y as i32 - GOBLIN_SPRITE_SIZE / 2;
        let mut horde = GoblinHorde::with_goblins(vec![g]);

        horde.update(&p);
        assert!(horde.get(0).attacking);
    }

    #[test]
    fn top_edge_bounces_back_into_the_field() {
        // Player directly above pulls the goblin through the fence line;
        // the bounce overrides pursuit and pushes it down instead.
        let mut p = player();
        p.x = 100;
        p.y = 0;
        let mut horde =
            GoblinHorde::with_goblins(vec![Goblin::spawned(100 - 19, BOUNDARY + 1, 4, Facing::UP)]);

        let y0 = horde.get(0).y;
        horde.update(&p);
        let g = horde.get(0);
        assert!(g.y > y0, "bounce should move away from the top edge");
        assert!(g.facing.contains(Facing::UP)); // flag records the edge
    }

    #[test]
    fn animation_counter_wraps() {
        let mut horde =
            GoblinHorde::with_goblins(vec![Goblin::spawned(200, 150, 1, Facing::DOWN)]);
        let p = player();

        for expect in [1, 2, 3, 4, 5, 0, 1] {
            horde.update(&p);
            assert_eq!(horde.get(0).current_frame, expect);
        }
    }

    #[test]
    fn spawner_respects_margin_speed_range_and_cap() {
        let mut horde = GoblinHorde::new(7);
        let p = player();

        // Long enough for the spawner to top up to the cap.
        for _ in 0..(MAX_GOBLINS as u32 * (SPAWN_INTERVAL_FRAMES + 1) + 1) {
            horde.update(&p);
        }
        assert_eq!(horde.len(), MAX_GOBLINS);

        let mut fresh = GoblinHorde::new(42);
        for _ in 0..20 {
            fresh.spawn_one();
        }
        for g in fresh.iter() {
            assert!(in_bounds(g.x, g.y, GOBLIN_SPRITE_SIZE, GOBLIN_SPRITE_SIZE));
            assert!((1..=GOBLIN_MAX_SPEED).contains(&g.speed));
            assert_eq!(g.health, GOBLIN_HEALTH);
            assert_eq!(g.frames_in_animation, GOBLIN_ANIM_FRAMES);
        }
    }

    #[test]
    fn damage_removes_at_zero_health() {
        let mut horde =
            GoblinHorde::with_goblins(vec![Goblin::spawned(200, 150, 1, Facing::DOWN)]);
        horde.get_mut(0).health = 2;

        assert!(!horde.damage(0));
        assert_eq!(horde.len(), 1);
        assert!(horde.damage(0));
        assert!(horde.is_empty());
    }
}
