//! Shared formatting helpers

pub mod money;

pub use money::format_currency;
