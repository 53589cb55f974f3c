//! Rules engine and adversarial search for 8x8 Dama (Turkish draughts):
//! board model, forced-capture move generation with flying kings, leg-wise
//! move commitment for interactive play, and a fixed-depth alpha-beta engine.

pub mod engine;
pub mod logic;
