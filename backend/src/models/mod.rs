//! Domain models for the portfolio risk engine

pub mod covenant;
pub mod event;
pub mod loan;
pub mod portfolio;

// Re-exports
pub use covenant::{classify, Covenant, RiskStatus};
pub use event::{Event, EventLog, LoadSource};
pub use loan::Loan;
pub use portfolio::Portfolio;
