//! Player pawn and its per-frame state machine.

use glam::Vec2;

use crate::defs::{
    EVASION_COOLDOWN_MS, EVASION_MS, HIT_STUN_MS, PLAYER_ANIM_FRAMES, PLAYER_HEALTH,
    PLAYER_HEIGHT, PLAYER_SPEED, PLAYER_START_X, PLAYER_START_Y, PLAYER_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH, SHOOT_COOLDOWN_FRAMES,
};
use crate::hw::CountdownTimer;
use crate::input::{Key, KeyEvent, MouseEvent};
use crate::timer::TimerService;

use super::collision::Rect;
use super::facing::Facing;

/// Drives animation selection and most of the gameplay gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Moving,
    Shooting,
    /// Reserved for the hit animation; damage currently routes through
    /// the short invulnerability window instead.
    Hurt,
    Evasion,
    /// Terminal. A dead player ignores input and further damage.
    Dead,
}

pub struct Player {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub score: u32,
    pub shoot_cooldown: u32,
    pub health: i16,
    /// Pixels per frame per held axis. Quadrupled (`<< 2`) while evading
    /// so the restore (`>> 2`) reconstructs the base value exactly.
    pub speed: i32,
    /// Directions currently held, tracked from make/break events.
    pub facing: Facing,
    pub state: PlayerState,
    pub evasion_ready: bool,
    pub current_frame: u8,
    pub frames_in_animation: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            x: PLAYER_START_X,
            y: PLAYER_START_Y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            score: 0,
            shoot_cooldown: 0,
            health: PLAYER_HEALTH,
            speed: PLAYER_SPEED,
            facing: Facing::empty(),
            state: PlayerState::Idle,
            evasion_ready: true,
            current_frame: 0,
            frames_in_animation: PLAYER_ANIM_FRAMES,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x + self.width / 2) as f32,
            (self.y + self.height / 2) as f32,
        )
    }

    /// Advance the state machine by one frame.
    ///
    /// `ability` is the shared one-shot channel: while evading it holds
    /// the evasion duration, afterwards the refresh cooldown. The same
    /// expiration signal therefore means different things depending on
    /// the state it arrives in.
    pub fn update<T: CountdownTimer>(
        &mut self,
        key: Option<KeyEvent>,
        mouse: &MouseEvent,
        ability: &mut TimerService<T>,
    ) {
        if self.state == PlayerState::Dead {
            return;
        }

        if let Some(event) = key {
            self.apply_key(event, ability);
        }

        // Each held axis contributes its full step, so a diagonal is the
        // plain sum of two axis moves. Observable behavior; keep it.
        if self.facing.contains(Facing::UP) {
            self.y -= self.speed;
        }
        if self.facing.contains(Facing::DOWN) {
            self.y += self.speed;
        }
        if self.facing.contains(Facing::LEFT) {
            self.x -= self.speed;
        }
        if self.facing.contains(Facing::RIGHT) {
            self.x += self.speed;
        }
        self.keep_evading_or(if self.facing.is_empty() {
            PlayerState::Idle
        } else {
            PlayerState::Moving
        });

        self.clamp_to_screen();

        if ability.expired() {
            if self.state == PlayerState::Evasion {
                // Evasion wore off: restore speed, start the refresh clock.
                self.state = PlayerState::Moving;
                self.speed >>= 2;
                ability.arm_ms(EVASION_COOLDOWN_MS, false);
            } else {
                // The refresh clock elapsed instead.
                self.evasion_ready = true;
            }
        }

        if mouse.left && self.state != PlayerState::Evasion && self.shoot_cooldown == 0 {
            self.state = PlayerState::Shooting;
            self.shoot_cooldown = SHOOT_COOLDOWN_FRAMES + 1;
        }
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }

        self.current_frame = (self.current_frame + 1) % self.frames_in_animation;
    }

    /// Apply one point of damage from an enemy attack.
    ///
    /// Survivors get the short hit-stun flavor of evasion: same speed
    /// boost, same restore-on-expiry path, shorter window.
    pub fn take_hit<T: CountdownTimer>(&mut self, ability: &mut TimerService<T>) {
        if self.state == PlayerState::Dead {
            return;
        }

        self.health = (self.health - 1).max(0);
        if self.health == 0 {
            self.state = PlayerState::Dead;
            return;
        }

        self.shoot_cooldown = 0;
        // Stacked same-frame hits must not double the speed boost, or the
        // restore shift would underscale forever after.
        if self.state != PlayerState::Evasion {
            self.speed <<= 2;
        }
        self.state = PlayerState::Evasion;
        ability.arm_ms(HIT_STUN_MS, false);
    }

    /// Fold one key event into the held-direction flags, or try to start
    /// an evasion.
    fn apply_key<T: CountdownTimer>(&mut self, event: KeyEvent, ability: &mut TimerService<T>) {
        match event.key {
            Key::W => self.set_axis(Facing::UP, Facing::DOWN, event.pressed),
            Key::S => self.set_axis(Facing::DOWN, Facing::UP, event.pressed),
            Key::A => self.set_axis(Facing::LEFT, Facing::RIGHT, event.pressed),
            Key::D => self.set_axis(Facing::RIGHT, Facing::LEFT, event.pressed),
            Key::Space if event.pressed => {
                // A blocked activation changes nothing.
                if self.evasion_ready && self.health > 0 {
                    self.state = PlayerState::Evasion;
                    self.evasion_ready = false;
                    self.speed <<= 2;
                    ability.arm_ms(EVASION_MS, false);
                }
            }
            _ => {}
        }
    }

    /// Opposite directions on one axis are exclusive, last input wins;
    /// the other axis is left alone so diagonals work.
    fn set_axis(&mut self, dir: Facing, opposite: Facing, pressed: bool) {
        if pressed {
            self.facing.insert(dir);
            self.facing.remove(opposite);
        } else {
            self.facing.remove(dir);
        }
    }

    fn keep_evading_or(&mut self, next: PlayerState) {
        if self.state != PlayerState::Evasion {
            self.state = next;
        }
    }

    fn clamp_to_screen(&mut self) {
        self.x = self.x.clamp(0, SCREEN_WIDTH - self.width);
        self.y = self.y.clamp(0, SCREEN_HEIGHT - self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mock::FakeTimer;

    fn press(key: Key) -> Option<KeyEvent> {
        Some(KeyEvent { key, pressed: true })
    }

    fn release(key: Key) -> Option<KeyEvent> {
        Some(KeyEvent { key, pressed: false })
    }

    fn no_mouse() -> MouseEvent {
        MouseEvent::default()
    }

    fn ability() -> TimerService<FakeTimer> {
        TimerService::new(FakeTimer::new())
    }

    #[test]
    fn movement_updates_position_and_state() {
        let mut p = Player::new();
        let mut t = ability();

        p.update(press(Key::D), &no_mouse(), &mut t);
        assert_eq!(p.x, PLAYER_START_X + PLAYER_SPEED);
        assert_eq!(p.state, PlayerState::Moving);
        assert_eq!(p.facing, Facing::RIGHT);

        // Held key keeps moving even on frames with no new report.
        p.update(None, &no_mouse(), &mut t);
        assert_eq!(p.x, PLAYER_START_X + 2 * PLAYER_SPEED);
        assert_eq!(p.state, PlayerState::Moving);

        p.update(release(Key::D), &no_mouse(), &mut t);
        assert_eq!(p.x, PLAYER_START_X + 2 * PLAYER_SPEED);
        assert_eq!(p.state, PlayerState::Idle);
        assert!(p.facing.is_empty());
    }

    #[test]
    fn diagonal_is_the_sum_of_two_axis_moves() {
        let mut p = Player::new();
        let mut t = ability();

        p.update(press(Key::W), &no_mouse(), &mut t);
        p.update(press(Key::D), &no_mouse(), &mut t);
        let (x, y) = (p.x, p.y);

        // Both axes step at full speed; diagonals are faster on purpose.
        p.update(None, &no_mouse(), &mut t);
        assert_eq!((p.x, p.y), (x + PLAYER_SPEED, y - PLAYER_SPEED));
        assert_eq!(p.facing, Facing::UP | Facing::RIGHT);
    }

    #[test]
    fn opposite_direction_wins_the_axis() {
        let mut p = Player::new();
        let mut t = ability();

        p.update(press(Key::A), &no_mouse(), &mut t);
        p.update(press(Key::D), &no_mouse(), &mut t);
        assert_eq!(p.facing, Facing::RIGHT);
    }

    #[test]
    fn position_stays_clamped_under_sustained_input() {
        let mut p = Player::new();
        let mut t = ability();

        for _ in 0..200 {
            p.update(press(Key::D), &no_mouse(), &mut t);
            assert!(p.x >= 0 && p.x <= SCREEN_WIDTH - p.width);
        }
        assert_eq!(p.x, SCREEN_WIDTH - p.width);

        for _ in 0..200 {
            p.update(press(Key::W), &no_mouse(), &mut t);
            assert!(p.y >= 0 && p.y <= SCREEN_HEIGHT - p.height);
        }
        assert_eq!(p.y, 0);
    }

    #[test]
    fn evasion_round_trip_restores_exact_speed() {
        let mut p = Player::new();
        let mut t = ability();
        let base = p.speed;

        p.update(press(Key::Space), &no_mouse(), &mut t);
        assert_eq!(p.state, PlayerState::Evasion);
        assert!(!p.evasion_ready);
        assert_eq!(p.speed, base << 2);

        // Duration elapses while still evading.
        t.hw_mut().fire();
        p.update(None, &no_mouse(), &mut t);
        assert_eq!(p.state, PlayerState::Moving);
        assert_eq!(p.speed, base);

        // The second expiration is the refresh cooldown.
        t.hw_mut().fire();
        p.update(None, &no_mouse(), &mut t);
        assert!(p.evasion_ready);
        assert_eq!(p.speed, base);
    }

    #[test]
    fn evasion_is_sticky_against_movement_and_idle() {
        let mut p = Player::new();
        let mut t = ability();

        p.update(press(Key::Space), &no_mouse(), &mut t);
        let x = p.x;
        p.update(press(Key::D), &no_mouse(), &mut t);
        // Movement still happens (at boosted speed) but evasion holds.
        assert_eq!(p.state, PlayerState::Evasion);
        assert_eq!(p.x, x + (PLAYER_SPEED << 2));

        p.update(None, &no_mouse(), &mut t);
        assert_eq!(p.state, PlayerState::Evasion);
    }

    #[test]
    fn blocked_evasion_leaves_state_untouched() {
        let mut p = Player::new();
        let mut t = ability();

        p.update(press(Key::D), &no_mouse(), &mut t);
        p.evasion_ready = false;
        p.update(press(Key::Space), &no_mouse(), &mut t);
        assert_eq!(p.state, PlayerState::Moving);
        assert_eq!(p.speed, PLAYER_SPEED);
    }

    #[test]
    fn shooting_gates_on_cooldown_and_evasion() {
        let mut p = Player::new();
        let mut t = ability();
        let click = MouseEvent { dx: 0, dy: 0, left: true };

        p.update(None, &click, &mut t);
        assert_eq!(p.state, PlayerState::Shooting);
        assert_eq!(p.shoot_cooldown, SHOOT_COOLDOWN_FRAMES);

        // Held fire during cooldown does not re-trigger.
        p.update(None, &click, &mut t);
        assert_eq!(p.state, PlayerState::Idle);

        // Drain the cooldown; fire works again.
        for _ in 0..SHOOT_COOLDOWN_FRAMES {
            p.update(None, &no_mouse(), &mut t);
        }
        p.update(None, &click, &mut t);
        assert_eq!(p.state, PlayerState::Shooting);

        // Never while evading.
        let mut p = Player::new();
        p.update(press(Key::Space), &no_mouse(), &mut t);
        p.update(None, &click, &mut t);
        assert_eq!(p.state, PlayerState::Evasion);
    }

    #[test]
    fn hit_applies_stun_and_resets_shot_cooldown() {
        let mut p = Player::new();
        let mut t = ability();
        p.shoot_cooldown = 7;

        p.take_hit(&mut t);
        assert_eq!(p.health, PLAYER_HEALTH - 1);
        assert_eq!(p.state, PlayerState::Evasion);
        assert_eq!(p.shoot_cooldown, 0);
        assert_eq!(p.speed, PLAYER_SPEED << 2);
        assert_eq!(
            t.hw_mut().armed,
            Some((HIT_STUN_MS * crate::defs::TICKS_PER_MS, false))
        );
    }

    #[test]
    fn stacked_hits_do_not_stack_the_boost() {
        let mut p = Player::new();
        let mut t = ability();

        p.take_hit(&mut t);
        p.take_hit(&mut t);
        assert_eq!(p.health, PLAYER_HEALTH - 2);
        assert_eq!(p.speed, PLAYER_SPEED << 2);

        t.hw_mut().fire();
        p.update(None, &no_mouse(), &mut t);
        assert_eq!(p.speed, PLAYER_SPEED);
    }

    #[test]
    fn death_is_terminal() {
        let mut p = Player::new();
        let mut t = ability();
        p.health = 1;

        p.take_hit(&mut t);
        assert_eq!(p.state, PlayerState::Dead);
        assert_eq!(p.health, 0);

        // Further damage and input are ignored.
        p.take_hit(&mut t);
        assert_eq!(p.health, 0);
        let x = p.x;
        p.update(press(Key::D), &no_mouse(), &mut t);
        assert_eq!((p.x, p.state), (x, PlayerState::Dead));
    }
}
