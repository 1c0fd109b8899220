//! On-target entry point: wire the memory-mapped peripherals to the game
//! loop and run until power-off.

use goblin_arena::defs::BLACK;
use goblin_arena::hw::mmio::{
    MmioHex, MmioPixelCtrl, MmioPs2, MmioTimer, HEX3_HEX0_BASE, HEX5_HEX4_BASE, PIXEL_CTRL_BASE,
    PIXEL_SURFACE_1, PIXEL_SURFACE_2, PS2_BASE, PS2_DUAL_BASE, TIMER_2_BASE, TIMER_BASE,
};
use goblin_arena::render::{Background, SpriteBank};
use goblin_arena::Game;

fn main() {
    // SAFETY: these are the board's fixed peripheral addresses and this
    // program is the only thing running on it.
    let (mouse, keyboard, score_timer, ability_timer, pixels, hex) = unsafe {
        (
            MmioPs2::new(PS2_BASE),
            MmioPs2::new(PS2_DUAL_BASE),
            MmioTimer::new(TIMER_BASE),
            MmioTimer::new(TIMER_2_BASE),
            MmioPixelCtrl::new(PIXEL_CTRL_BASE, [PIXEL_SURFACE_1, PIXEL_SURFACE_2]),
            MmioHex::new(HEX3_HEX0_BASE, HEX5_HEX4_BASE),
        )
    };

    let game = Game::new(
        mouse,
        keyboard,
        score_timer,
        ability_timer,
        pixels,
        hex,
        Background::solid(BLACK),
        SpriteBank::placeholder(),
    );
    game.run()
}
