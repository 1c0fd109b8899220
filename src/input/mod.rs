//! PS/2 input: byte-stream decoding and translation to game events.

mod decoder;
mod keyboard;
mod mouse;

pub use decoder::Ps2Decoder;
pub use keyboard::{Key, KeyEvent};
pub use mouse::{MouseEvent, MouseStatus, PacketError};
