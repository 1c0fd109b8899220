//! Aiming cursor: raw mouse deltas clamped to the screen.

use glam::Vec2;

use crate::defs::{
    CURSOR_HEIGHT, CURSOR_SPEED, CURSOR_START_X, CURSOR_START_Y, CURSOR_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH,
};
use crate::input::MouseEvent;

pub struct Cursor {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            x: CURSOR_START_X,
            y: CURSOR_START_Y,
            width: CURSOR_WIDTH,
            height: CURSOR_HEIGHT,
            speed: CURSOR_SPEED,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.x + self.width / 2) as f32,
            (self.y + self.height / 2) as f32,
        )
    }

    pub fn update(&mut self, mouse: &MouseEvent) {
        self.x = (self.x + mouse.dx).clamp(0, SCREEN_WIDTH - self.width);
        self.y = (self.y + mouse.dy).clamp(0, SCREEN_HEIGHT - self.height);
    }
}
