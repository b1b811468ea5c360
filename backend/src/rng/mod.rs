//! Deterministic random number generation
//!
//! Uses xorshift64* for fast, seeded generation. Every random draw the
//! simulator makes goes through the [`RandomSource`] trait so that ticks can
//! be replayed exactly under test.

mod source;
mod xorshift;

pub use source::{RandomSource, SequenceSource};
pub use xorshift::RngManager;
