//! Alert distribution and acknowledgment.
//!
//! Alerts are created once and never modified. Delivery to a property is
//! recorded as a receipt keyed by `(alert, property)`; a property can only
//! acknowledge an alert whose delivery was recorded.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::types::*;

/// In-memory alert store.
#[derive(Debug, Default)]
pub struct AlertDistributor {
    /// Alerts by id, ascending
    alerts: BTreeMap<AlertId, Alert>,
    /// Contact preferences by property
    contacts: HashMap<PropertyId, AlertContact>,
    /// Receipts by (alert, property)
    receipts: HashMap<(AlertId, PropertyId), AlertReceipt>,
    /// Last id handed out (0 = none yet)
    last_id: AlertId,
}

impl AlertDistributor {
    /// Create an empty distributor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property's contact preferences.
    pub fn set_contacts<I, S>(
        &mut self,
        ctx: &TxContext,
        property_id: PropertyId,
        primary_contact: impl Into<String>,
        secondary_contact: impl Into<String>,
        notification_methods: I,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let contact = AlertContact {
            primary_contact: primary_contact.into(),
            secondary_contact: secondary_contact.into(),
            notification_methods: notification_methods.into_iter().map(Into::into).collect(),
            last_updated: ctx.block_time,
        };

        debug!(
            property_id,
            methods = ?contact.notification_methods,
            "Set alert contacts"
        );
        self.contacts.insert(property_id, contact);
    }

    /// Create an alert expiring `duration_secs` after the current block time.
    pub fn create_alert<I, S>(
        &mut self,
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
        let id = self.last_id + 1;
        self.last_id = id;

        let affected_regions: BTreeSet<String> =
            affected_regions.into_iter().map(Into::into).collect();
        let alert = Alert {
            alert_type: alert_type.into(),
            severity,
            message: message.into(),
            affected_regions,
            timestamp: ctx.block_time,
            expiration: ctx.block_time.saturating_add(duration_secs),
        };

        info!(
            alert_id = id,
            alert_type = %alert.alert_type,
            severity,
            regions = ?alert.affected_regions,
            expiration = %alert.expiration,
            "Created alert"
        );

        self.alerts.insert(id, alert);
        id
    }

    /// Record that an alert reached a property.
    ///
    /// A repeated delivery resets the receipt, clearing any acknowledgment.
    pub fn record_delivery(
        &mut self,
        ctx: &TxContext,
        alert_id: AlertId,
        property_id: PropertyId,
    ) -> Result<()> {
        if !self.alerts.contains_key(&alert_id) {
            warn!(alert_id, property_id, "Delivery recorded for unknown alert");
            return Err(FirewatchError::AlertNotFound(alert_id));
        }

        self.receipts.insert(
            (alert_id, property_id),
            AlertReceipt {
                delivered: true,
                delivery_timestamp: ctx.block_time,
                acknowledged: false,
                acknowledgment_timestamp: None,
            },
        );

        debug!(alert_id, property_id, "Recorded alert delivery");
        Ok(())
    }

    /// Mark a delivered alert as acknowledged by the property.
    pub fn acknowledge(
        &mut self,
        ctx: &TxContext,
        alert_id: AlertId,
        property_id: PropertyId,
    ) -> Result<()> {
        let receipt = match self.receipts.get_mut(&(alert_id, property_id)) {
            Some(receipt) => receipt,
            None => {
                warn!(alert_id, property_id, "Acknowledgment without receipt");
                return Err(FirewatchError::ReceiptNotFound {
                    alert_id,
                    property_id,
                });
            }
        };

        if !receipt.delivered {
            warn!(alert_id, property_id, "Acknowledgment of undelivered alert");
            return Err(FirewatchError::NotDelivered {
                alert_id,
                property_id,
            });
        }

        receipt.acknowledged = true;
        receipt.acknowledgment_timestamp = Some(ctx.block_time);

        info!(
            alert_id,
            property_id,
            caller = %ctx.sender,
            "Alert acknowledged"
        );
        Ok(())
    }

    /// Ids of alerts covering `region` that have not expired at `now`,
    /// ascending.
    pub fn active_alerts_for_region(&self, region: &str, now: Timestamp) -> Vec<AlertId> {
        self.alerts
            .iter()
            .filter(|(_, alert)| alert.is_active_at(now) && alert.covers(region))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn get_contacts(&self, property_id: PropertyId) -> Option<&AlertContact> {
        self.contacts.get(&property_id)
    }

    pub fn get_alert(&self, alert_id: AlertId) -> Option<&Alert> {
        self.alerts.get(&alert_id)
    }

    pub fn get_receipt(&self, alert_id: AlertId, property_id: PropertyId) -> Option<&AlertReceipt> {
        self.receipts.get(&(alert_id, property_id))
    }
}
