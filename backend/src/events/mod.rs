//! Market events module
//!
//! The fixed catalog of named market events and the rules for applying one
//! to a loan.
//!
//! # Components
//!
//! - **types**: Event definitions, impact classes and the default catalog
//! - **handler**: Effect rules (perturbation bands, clamping)
//! - **insight**: Canned insight phrases keyed by resulting status
//!
//! # Example
//!
//! ```rust
//! use covenant_guard_core::events::{default_catalog, EventImpact};
//!
//! let catalog = default_catalog();
//! assert_eq!(catalog[0].code, "CRASH");
//! assert_eq!(catalog[0].impact(), EventImpact::Adverse);
//! ```

pub mod handler;
pub mod insight;
pub mod types;

pub use handler::{AppliedEffect, ConfigError, ImpactBands};
pub use insight::{insight_for, phrase_count};
pub use types::{default_catalog, EventImpact, MarketEvent};
