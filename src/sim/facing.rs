//! Cardinal direction flags.

use bitflags::bitflags;

bitflags! {
    /// Direction-of-travel flags.
    ///
    /// The player carries exactly one bit (last pressed key wins).
    /// A goblin carries one bit per axis, derived each frame from the
    /// sign of its pursuit vector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Facing: u8 {
        const RIGHT = 1 << 0;
        const LEFT  = 1 << 1;
        const DOWN  = 1 << 2;
        const UP    = 1 << 3;
    }
}

impl Facing {
    /// Horizontal component, `RIGHT` on a tie.
    pub fn horizontal(self) -> Facing {
        if self.contains(Facing::LEFT) {
            Facing::LEFT
        } else {
            Facing::RIGHT
        }
    }

    /// Vertical component, `DOWN` on a tie.
    pub fn vertical(self) -> Facing {
        if self.contains(Facing::UP) {
            Facing::UP
        } else {
            Facing::DOWN
        }
    }
}
