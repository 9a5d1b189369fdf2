//! Core types shared by the firewatch stores.
//!
//! Identities, timestamps and the transaction context are supplied by the
//! caller; nothing in this crate reads a wall clock or an ambient sender.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the web dashboard.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Identifier assigned to a registered property. Starts at 1.
pub type PropertyId = u64;

/// Identifier assigned to a created alert. Starts at 1.
pub type AlertId = u64;

/// A caller identity (the transaction sender).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Principal {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Seconds since the Unix epoch, as reported by the ledger's block time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Offset by `secs`, clamping at `u64::MAX`.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Convert to a calendar time for display. `None` if out of chrono's range.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

/// The injected execution context for a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    /// Who is calling
    pub sender: Principal,
    /// Current block height
    pub block_height: u64,
    /// Current block time
    pub block_time: Timestamp,
}

impl TxContext {
    pub fn new(sender: impl Into<Principal>, block_height: u64, block_time: Timestamp) -> Self {
        Self {
            sender: sender.into(),
            block_height,
            block_time,
        }
    }

    /// Same block, different sender.
    pub fn with_sender(&self, sender: impl Into<Principal>) -> Self {
        Self {
            sender: sender.into(),
            ..self.clone()
        }
    }

    /// Same sender, advanced to a later block.
    pub fn at(&self, block_height: u64, block_time: Timestamp) -> Self {
        Self {
            block_height,
            block_time,
            ..self.clone()
        }
    }
}

// =============================================================================
// Property registration
// =============================================================================

/// A registered parcel or structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Only this principal may update the record
    pub owner: Principal,
    /// Street address or parcel description
    pub location: String,
    /// Floor area
    pub size: u64,
    /// e.g. "Residential", "Cabin"
    pub structure_type: String,
    /// Block time at registration
    pub registration_date: Timestamp,
}

/// Property ids registered by one owner, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct OwnerProperties {
    pub property_ids: Vec<PropertyId>,
}

// =============================================================================
// Risk assessment
// =============================================================================

/// Base risk and seasonal scaling for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RegionalRiskFactor {
    pub base_risk: i64,
    /// Percentage applied to the raw score (10 = 10%)
    pub seasonal_multiplier: i64,
}

/// Site observations that feed the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub vegetation_density: i64,
    pub slope: i64,
    pub weather_risk: i64,
    /// Non-positive distances contribute nothing
    pub distance_to_water: i64,
}

impl RiskFactors {
    pub fn new(vegetation_density: i64, slope: i64, weather_risk: i64, distance_to_water: i64) -> Self {
        Self {
            vegetation_density,
            slope,
            weather_risk,
            distance_to_water,
        }
    }
}

/// The latest assessment for a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_score: i64,
    pub assessment_date: Timestamp,
    pub factors: RiskFactors,
}

// =============================================================================
// Alerts
// =============================================================================

/// A broadcast hazard notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// e.g. "evacuation", "warning"
    pub alert_type: String,
    pub severity: u32,
    pub message: String,
    pub affected_regions: BTreeSet<String>,
    /// Block time at creation
    pub timestamp: Timestamp,
    pub expiration: Timestamp,
}

impl Alert {
    /// Active strictly before its expiration.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.expiration > now
    }

    pub fn covers(&self, region: &str) -> bool {
        self.affected_regions.contains(region)
    }
}

/// How a property wants to be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AlertContact {
    pub primary_contact: String,
    pub secondary_contact: String,
    /// e.g. "email", "sms", "app"
    pub notification_methods: BTreeSet<String>,
    pub last_updated: Timestamp,
}

/// Delivery and acknowledgment state for one (alert, property) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AlertReceipt {
    pub delivered: bool,
    pub delivery_timestamp: Timestamp,
    pub acknowledged: bool,
    pub acknowledgment_timestamp: Option<Timestamp>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error types for firewatch operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FirewatchError {
    /// No property with this id
    #[error("Property not found: {0}")]
    PropertyNotFound(PropertyId),

    /// Caller does not own the property
    #[error("Caller {caller} is not the owner of property {property_id}")]
    Unauthorized {
        property_id: PropertyId,
        caller: Principal,
    },

    /// No alert with this id
    #[error("Alert not found: {0}")]
    AlertNotFound(AlertId),

    /// Nothing was ever delivered for this pair
    #[error("No receipt for alert {alert_id} at property {property_id}")]
    ReceiptNotFound {
        alert_id: AlertId,
        property_id: PropertyId,
    },

    /// Receipt exists but delivery was not confirmed
    #[error("Alert {alert_id} was not delivered to property {property_id}")]
    NotDelivered {
        alert_id: AlertId,
        property_id: PropertyId,
    },

    /// Configuration could not be parsed or is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FirewatchError {
    /// Numeric error code as reported by the ledger contracts.
    ///
    /// Codes are scoped per operation: 1 is the missing-record case,
    /// 2 the precondition failure that follows it.
    pub fn code(&self) -> u32 {
        match self {
            Self::PropertyNotFound(_) | Self::AlertNotFound(_) | Self::ReceiptNotFound { .. } => 1,
            Self::Unauthorized { .. } | Self::NotDelivered { .. } => 2,
            Self::Config(_) => 100,
        }
    }
}

pub type Result<T> = std::result::Result<T, FirewatchError>;
