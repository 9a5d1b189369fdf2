//! Shared access to the three stores.
//!
//! [`Firewatch`] holds each store behind its own lock so one handle can be
//! cloned into several tasks. Every method is a single state transition on
//! one store; reads return owned copies.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::alert::AlertDistributor;
use crate::config::FirewatchConfig;
use crate::property::PropertyRegistry;
use crate::risk::RiskAssessor;
use crate::types::*;

/// Cloneable handle over a property registry, risk assessor and alert
/// distributor.
#[derive(Clone)]
pub struct Firewatch {
    config: Arc<FirewatchConfig>,
    properties: Arc<RwLock<PropertyRegistry>>,
    risk: Arc<RwLock<RiskAssessor>>,
    alerts: Arc<RwLock<AlertDistributor>>,
}

impl Firewatch {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(FirewatchConfig::default())
    }

    pub fn with_config(config: FirewatchConfig) -> Self {
        let risk = RiskAssessor::with_config(config.risk.clone());
        Self {
            config: Arc::new(config),
            properties: Arc::new(RwLock::new(PropertyRegistry::new())),
            risk: Arc::new(RwLock::new(risk)),
            alerts: Arc::new(RwLock::new(AlertDistributor::new())),
        }
    }

    pub fn config(&self) -> &FirewatchConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    pub async fn register_property(
        &self,
        ctx: &TxContext,
        location: impl Into<String>,
        size: u64,
        structure_type: impl Into<String>,
    ) -> PropertyId {
        let mut properties = self.properties.write().await;
        properties.register(ctx, location, size, structure_type)
    }

    pub async fn update_property(
        &self,
        ctx: &TxContext,
        property_id: PropertyId,
        location: impl Into<String>,
        size: u64,
        structure_type: impl Into<String>,
    ) -> Result<()> {
        let mut properties = self.properties.write().await;
        properties.update(ctx, property_id, location, size, structure_type)
    }

    pub async fn get_property(&self, property_id: PropertyId) -> Option<Property> {
        let properties = self.properties.read().await;
        properties.get(property_id).cloned()
    }

    pub async fn get_owner_properties(&self, owner: &Principal) -> Option<OwnerProperties> {
        let properties = self.properties.read().await;
        properties.get_by_owner(owner).cloned()
    }

    // -------------------------------------------------------------------------
    // Risk
    // -------------------------------------------------------------------------

    pub async fn set_regional_risk(
        &self,
        region: impl Into<String>,
        base_risk: i64,
        seasonal_multiplier: i64,
    ) {
        let mut risk = self.risk.write().await;
        risk.set_regional_risk(region, base_risk, seasonal_multiplier);
    }

    pub async fn assess_property_risk(
        &self,
        ctx: &TxContext,
        property_id: PropertyId,
        factors: RiskFactors,
        region: &str,
    ) -> i64 {
        let mut risk = self.risk.write().await;
        risk.assess(ctx, property_id, factors, region)
    }

    pub async fn get_property_risk(&self, property_id: PropertyId) -> Option<RiskAssessment> {
        let risk = self.risk.read().await;
        risk.get(property_id).cloned()
    }

    pub async fn is_high_risk(&self, property_id: PropertyId) -> bool {
        let risk = self.risk.read().await;
        risk.is_high_risk(property_id)
    }

    pub async fn high_risk_properties(&self) -> Vec<PropertyId> {
        let risk = self.risk.read().await;
        risk.high_risk_properties()
    }

    // -------------------------------------------------------------------------
    // Alerts
    // -------------------------------------------------------------------------

    pub async fn set_alert_contacts<I, S>(
        &self,
        ctx: &TxContext,
        property_id: PropertyId,
        primary_contact: impl Into<String>,
        secondary_contact: impl Into<String>,
        notification_methods: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut alerts = self.alerts.write().await;
        alerts.set_contacts(
            ctx,
            property_id,
            primary_contact,
            secondary_contact,
            notification_methods,
        );
    }

    pub async fn create_alert<I, S>(
        &self,
        ctx: &TxContext,
        alert_type: impl Into<String>,
        severity: u32,
        message: impl Into<String>,
        affected_regions: I,
        duration_secs: u64,
    ) -> AlertId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut alerts = self.alerts.write().await;
        alerts.create_alert(ctx, alert_type, severity, message, affected_regions, duration_secs)
    }

    pub async fn record_alert_delivery(
        &self,
        ctx: &TxContext,
        alert_id: AlertId,
        property_id: PropertyId,
    ) -> Result<()> {
        let mut alerts = self.alerts.write().await;
        alerts.record_delivery(ctx, alert_id, property_id)
    }

    pub async fn acknowledge_alert(
        &self,
        ctx: &TxContext,
        alert_id: AlertId,
        property_id: PropertyId,
    ) -> Result<()> {
        let mut alerts = self.alerts.write().await;
        alerts.acknowledge(ctx, alert_id, property_id)
    }

    pub async fn active_alerts_for_region(&self, region: &str, now: Timestamp) -> Vec<AlertId> {
        let alerts = self.alerts.read().await;
        alerts.active_alerts_for_region(region, now)
    }

    pub async fn get_alert_contacts(&self, property_id: PropertyId) -> Option<AlertContact> {
        let alerts = self.alerts.read().await;
        alerts.get_contacts(property_id).cloned()
    }

    pub async fn get_alert(&self, alert_id: AlertId) -> Option<Alert> {
        let alerts = self.alerts.read().await;
        alerts.get_alert(alert_id).cloned()
    }

    pub async fn get_alert_receipt(
        &self,
        alert_id: AlertId,
        property_id: PropertyId,
    ) -> Option<AlertReceipt> {
        let alerts = self.alerts.read().await;
        alerts.get_receipt(alert_id, property_id).cloned()
    }
}

impl Default for Firewatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TxContext {
        TxContext::new("ST1OWNER", 100, Timestamp(1_625_097_600))
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ledger = Firewatch::new();
        let other = ledger.clone();

        let id = ledger
            .register_property(&ctx(), "123 Forest Lane", 2500, "Residential")
            .await;
        let property = other.get_property(id).await.unwrap();
        assert_eq!(property.location, "123 Forest Lane");
    }

    #[tokio::test]
    async fn test_concurrent_registrations_get_unique_ids() {
        let ledger = Firewatch::new();

        let mut handles = Vec::new();
        for i in 0..8u64 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger
                    .register_property(&ctx(), format!("{i} Canyon Road"), 1000 + i, "Cabin")
                    .await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<_>>());

        let owned = ledger
            .get_owner_properties(&Principal::from("ST1OWNER"))
            .await
            .unwrap();
        assert_eq!(owned.property_ids.len(), 8);
    }

    #[tokio::test]
    async fn test_owner_update_and_risk_flow() {
        let ledger = Firewatch::new();
        let id = ledger
            .register_property(&ctx(), "123 Forest Lane", 2500, "Residential")
            .await;

        let err = ledger
            .update_property(&ctx().with_sender("ST2OTHER"), id, "x", 1, "y")
            .await
            .unwrap_err();
        assert_eq!(err.code(), 2);
        ledger
            .update_property(&ctx(), id, "123 Forest Lane", 3000, "Residential")
            .await
            .unwrap();
        assert_eq!(ledger.get_property(id).await.unwrap().size, 3000);

        ledger.set_regional_risk("HIGH-RISK", 80, 20).await;
        let score = ledger
            .assess_property_risk(&ctx(), id, RiskFactors::new(40, 30, 40, 1), "HIGH-RISK")
            .await;
        assert_eq!(score, 82);
        assert!(ledger.is_high_risk(id).await);
        assert_eq!(ledger.high_risk_properties().await, vec![id]);
        assert_eq!(ledger.get_property_risk(id).await.unwrap().risk_score, 82);
    }

    #[tokio::test]
    async fn test_config_reaches_risk_store() {
        let mut config = FirewatchConfig::default();
        config.risk.default_base_risk = 250;
        let ledger = Firewatch::with_config(config);

        // 250 + 0 + 0 + 0 + 0 = 250; 250 * 10 / 100 = 25
        let score = ledger
            .assess_property_risk(&ctx(), 1, RiskFactors::default(), "NEW-REGION")
            .await;
        assert_eq!(score, 25);
        assert_eq!(ledger.config().risk.default_base_risk, 250);
    }
}
