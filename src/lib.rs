//! Goblin Arena: a polled-hardware arena shooter core.
//!
//! The crate is split along the frame pipeline: [`input`] decodes raw
//! PS/2 byte streams, [`timer`] wraps the countdown channels, [`sim`]
//! advances the entities, [`render`] paints and swaps the double buffer,
//! and [`game`] runs them in order once per vertical sync. All device
//! access goes through the trait seams in [`hw`], which ship with
//! memory-mapped, in-memory, and (in `src/bin/host_sim.rs`) windowed
//! implementations.

pub mod defs;
pub mod game;
pub mod hw;
pub mod input;
pub mod render;
pub mod score;
pub mod sim;
pub mod timer;

pub use game::Game;
