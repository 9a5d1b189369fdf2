//! Wildfire preparedness ledger.
//!
//! Three independent in-memory stores, each owning its own state:
//!
//! - [`PropertyRegistry`]: property records keyed by auto-incrementing id,
//!   with an owner index and owner-only updates
//! - [`RiskAssessor`]: regional risk factors and per-property risk scores
//! - [`AlertDistributor`]: alerts, contact preferences and
//!   delivery/acknowledgment receipts
//!
//! [`Firewatch`] bundles the three behind async locks for callers that share
//! one ledger between tasks.
//!
//! Time and caller identity are never read from the environment: every
//! mutating call takes a [`TxContext`].
//!
//! # Example
//!
//! ```
//! use firewatch::{PropertyRegistry, RiskAssessor, RiskFactors, Timestamp, TxContext};
//!
//! let ctx = TxContext::new("ST1OWNER", 100, Timestamp::from_secs(1_625_097_600));
//!
//! let mut registry = PropertyRegistry::new();
//! let id = registry.register(&ctx, "123 Forest Lane", 2500, "Residential");
//!
//! let mut risk = RiskAssessor::new();
//! let score = risk.assess(&ctx, id, RiskFactors::new(30, 15, 20, 5), "CA-SB");
//! assert_eq!(score, 20);
//! assert!(!risk.is_high_risk(id));
//! ```

pub mod alert;
pub mod config;
pub mod property;
pub mod risk;
pub mod service;
pub mod types;

// Re-export main types
pub use alert::AlertDistributor;
pub use config::{FirewatchConfig, GeneralConfig, RiskConfig};
pub use property::PropertyRegistry;
pub use risk::RiskAssessor;
pub use service::Firewatch;
pub use types::*;
