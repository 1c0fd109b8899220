//! The frame loop that ties every subsystem together.
//!
//! One iteration is strictly sequential: poll devices, translate, advance
//! the simulation, resolve collisions, render, publish the score. Nothing
//! runs between those phases, so each piece of state has exactly one
//! writer per frame and plain `&mut` threading covers the whole loop.

use crate::defs::SCORE_TICK_MS;
use crate::hw::{CountdownTimer, FrameSink, Ps2Bus, SegmentDisplay};
use crate::input::{KeyEvent, MouseEvent, Ps2Decoder};
use crate::render::{Background, Renderer, SpriteBank};
use crate::score;
use crate::sim::{
    attacking_goblin_hits, resolve_projectile_hits, Cursor, GoblinHorde, Player, PlayerState,
    ProjectilePool,
};
use crate::timer::TimerService;

pub struct Game<M, K, ST, AT, D, H> {
    mouse: Ps2Decoder<M>,
    keyboard: Ps2Decoder<K>,
    score_timer: TimerService<ST>,
    ability_timer: TimerService<AT>,
    renderer: Renderer<D>,
    display: H,
    player: Player,
    cursor: Cursor,
    projectiles: ProjectilePool,
    horde: GoblinHorde,
}

impl<M, K, ST, AT, D, H> Game<M, K, ST, AT, D, H>
where
    M: Ps2Bus,
    K: Ps2Bus,
    ST: CountdownTimer,
    AT: CountdownTimer,
    D: FrameSink,
    H: SegmentDisplay,
{
    pub fn new(
        mouse_bus: M,
        keyboard_bus: K,
        score_channel: ST,
        ability_channel: AT,
        sink: D,
        mut display: H,
        background: Background,
        sprites: SpriteBank,
    ) -> Self {
        let mut mouse = Ps2Decoder::new(mouse_bus);
        let mut keyboard = Ps2Decoder::new(keyboard_bus);
        mouse.reset();
        keyboard.reset();
        // Discard whatever the FIFOs accumulated before we were ready.
        mouse.flush();
        keyboard.flush();

        let mut score_timer = TimerService::new(score_channel);
        let mut ability_timer = TimerService::new(ability_channel);
        score_timer.arm_ms(SCORE_TICK_MS, true);

        let horde = GoblinHorde::new(u64::from(ability_timer.entropy()));

        score::show(&mut display, 0);

        Self {
            mouse,
            keyboard,
            score_timer,
            ability_timer,
            renderer: Renderer::new(sink, background, sprites),
            display,
            player: Player::new(),
            cursor: Cursor::new(),
            projectiles: ProjectilePool::new(),
            horde,
        }
    }

    /// Run forever. The vsync wait inside the renderer paces the loop.
    pub fn run(mut self) -> ! {
        loop {
            self.frame();
        }
    }

    /// Advance exactly one frame.
    pub fn frame(&mut self) {
        let mouse_event = self.poll_mouse();
        let key_event = self.keyboard.poll_packet().map(KeyEvent::decode);

        self.player
            .update(key_event, &mouse_event, &mut self.ability_timer);
        if self.score_timer.expired() && self.player.health > 0 {
            self.player.score += 1;
        }
        self.cursor.update(&mouse_event);

        self.horde.update(&self.player);

        if self.player.state == PlayerState::Shooting {
            // May refuse at the pool cap; the frame just goes shotless.
            self.projectiles.spawn(&self.player, &self.cursor);
        }
        self.projectiles.advance();

        let hits = attacking_goblin_hits(&self.player, &self.horde);
        for _ in 0..hits {
            self.player.take_hit(&mut self.ability_timer);
        }
        resolve_projectile_hits(&mut self.projectiles, &mut self.horde);

        self.renderer
            .refresh(&self.player, &self.cursor, &self.projectiles, &self.horde);
        score::show(&mut self.display, self.player.score);
    }

    /// A frame with no report, a handshake, or a malformed packet all
    /// read as "no mouse input"; malformed packets additionally flush
    /// the FIFO to re-align the stream.
    fn poll_mouse(&mut self) -> MouseEvent {
        match self.mouse.poll_packet() {
            None => MouseEvent::default(),
            Some(packet) => match MouseEvent::decode(packet) {
                Ok(event) => event,
                Err(_) => {
                    self.mouse.flush();
                    MouseEvent::default()
                }
            },
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn horde(&self) -> &GoblinHorde {
        &self.horde
    }

    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    #[cfg(test)]
    fn parts_mut(
        &mut self,
    ) -> (
        &mut Ps2Decoder<M>,
        &mut Ps2Decoder<K>,
        &mut TimerService<ST>,
        &mut TimerService<AT>,
    ) {
        (
            &mut self.mouse,
            &mut self.keyboard,
            &mut self.score_timer,
            &mut self.ability_timer,
        )
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{BLACK, GREEN, SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::hw::mock::{CaptureHex, CaptureSink, FakeTimer, ScriptedPs2};
    use crate::render::Background;
    use crate::score::encode;

    type MockGame = Game<ScriptedPs2, ScriptedPs2, FakeTimer, FakeTimer, CaptureSink, CaptureHex>;

    fn game() -> MockGame {
        Game::new(
            ScriptedPs2::new(),
            ScriptedPs2::new(),
            FakeTimer::new(),
            FakeTimer::new(),
            CaptureSink::new(),
            CaptureHex::new(),
            Background::solid(BLACK),
            SpriteBank::placeholder(),
        )
    }

    /// Same, but with the spawner parked so frames are goblin-free.
    fn quiet_game() -> MockGame {
        let mut g = game();
        g.horde = GoblinHorde::with_goblins(vec![]);
        g
    }

    /// Queue a left-click report with no movement.
    fn queue_click(game: &mut MockGame) {
        let (mouse, _, _, _) = game.parts_mut();
        mouse.bus_mut().push_bytes(&[0x09, 0, 0]);
    }

    /// Queue one held-W window.
    fn queue_w(game: &mut MockGame) {
        let (_, keyboard, _, _) = game.parts_mut();
        keyboard.bus_mut().push_bytes(&[0x1D, 0x1D, 0x1D]);
    }

    #[test]
    fn init_resets_both_devices_and_blanks_the_score() {
        let mut g = game();
        let (mouse, keyboard, _, _) = g.parts_mut();
        assert_eq!(mouse.bus_mut().commands, vec![0xFF, 0xF4]);
        assert_eq!(keyboard.bus_mut().commands, vec![0xFF, 0xF4]);
        assert_eq!(g.display.last, Some(encode(0)));
    }

    #[test]
    fn idle_frame_still_renders_and_swaps() {
        let mut g = quiet_game();
        let swaps_before = g.renderer().sink().swaps;
        g.frame();
        assert_eq!(g.renderer().sink().swaps, swaps_before + 1);
        assert_eq!(g.renderer().sink().pixel(101, 61), GREEN);
    }

    #[test]
    fn score_ticks_only_while_alive() {
        let mut g = quiet_game();

        g.parts_mut().2.hw_mut().fire();
        g.frame();
        assert_eq!(g.player().score, 1);
        assert_eq!(g.display.last, Some(encode(1)));

        g.player.health = 0;
        g.player.state = PlayerState::Dead;
        g.parts_mut().2.hw_mut().fire();
        g.frame();
        assert_eq!(g.player().score, 1);
    }

    #[test]
    fn click_spawns_a_projectile_toward_the_cursor() {
        let mut g = quiet_game();
        // Move the cursor off the player center first so the aim vector
        // is well-defined: +60 in x over two reports.
        let (mouse, _, _, _) = g.parts_mut();
        mouse.bus_mut().push_bytes(&[0x08, 30, 0]);
        g.frame();
        let (mouse, _, _, _) = g.parts_mut();
        mouse.bus_mut().push_bytes(&[0x08, 30, 0]);
        g.frame();
        assert!(g.projectiles().is_empty());

        queue_click(&mut g);
        g.frame();
        assert_eq!(g.player().state, PlayerState::Shooting);
        assert_eq!(g.projectiles().len(), 1);
        let shot = g.projectiles().get(0);
        assert!(shot.vel.x > 0.99); // straight right at the cursor
    }

    #[test]
    fn movement_keys_move_and_never_escape_the_screen() {
        let mut g = quiet_game();
        for _ in 0..120 {
            queue_w(&mut g);
            g.frame();
            let p = g.player();
            assert!(p.x >= 0 && p.x <= SCREEN_WIDTH - p.width);
            assert!(p.y >= 0 && p.y <= SCREEN_HEIGHT - p.height);
        }
        assert_eq!(g.player().y, 0);
    }

    #[test]
    fn malformed_mouse_packet_reads_as_no_input() {
        let mut g = quiet_game();
        let cursor_x = g.cursor().x;
        let (mouse, _, _, _) = g.parts_mut();
        // Alignment bit clear, then stale garbage the flush must eat.
        mouse.bus_mut().push_bytes(&[0x00, 0x55, 0x55, 0x7F, 0x7F]);

        g.frame();
        assert_eq!(g.cursor().x, cursor_x);

        // Stream is re-aligned: the next clean report works.
        let (mouse, _, _, _) = g.parts_mut();
        mouse.bus_mut().push_bytes(&[0x08, 5, 0]);
        g.frame();
        assert_eq!(g.cursor().x, cursor_x + 5);
    }

    #[test]
    fn spawner_populates_the_field_over_time() {
        let mut g = game();
        g.frame();
        assert_eq!(g.horde().len(), 1); // first top-up is immediate
    }
}
