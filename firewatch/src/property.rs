//! Property registration.
//!
//! Records are keyed by an auto-incrementing id and indexed by owner.
//! Only the recorded owner may change a record after registration.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::types::*;

/// In-memory property registry.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    /// Records by id
    properties: HashMap<PropertyId, Property>,
    /// Index by owner, in registration order
    by_owner: HashMap<Principal, OwnerProperties>,
    /// Last id handed out (0 = none yet)
    last_id: PropertyId,
}

impl PropertyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a property owned by the caller and return its id.
    pub fn register(
        &mut self,
        ctx: &TxContext,
        location: impl Into<String>,
        size: u64,
        structure_type: impl Into<String>,
    ) -> PropertyId {
        let id = self.last_id + 1;
        self.last_id = id;

        let property = Property {
            owner: ctx.sender.clone(),
            location: location.into(),
            size,
            structure_type: structure_type.into(),
            registration_date: ctx.block_time,
        };

        info!(
            property_id = id,
            owner = %property.owner,
            location = %property.location,
            "Registered property"
        );

        self.properties.insert(id, property);
        self.by_owner
            .entry(ctx.sender.clone())
            .or_default()
            .property_ids
            .push(id);

        id
    }

    /// Overwrite the mutable fields of a property owned by the caller.
    pub fn update(
        &mut self,
        ctx: &TxContext,
        property_id: PropertyId,
        location: impl Into<String>,
        size: u64,
        structure_type: impl Into<String>,
    ) -> Result<()> {
        let property = match self.properties.get_mut(&property_id) {
            Some(property) => property,
            None => {
                warn!(property_id, caller = %ctx.sender, "Update of unknown property");
                return Err(FirewatchError::PropertyNotFound(property_id));
            }
        };

        if property.owner != ctx.sender {
            warn!(
                property_id,
                caller = %ctx.sender,
                owner = %property.owner,
                "Update rejected: caller is not the owner"
            );
            return Err(FirewatchError::Unauthorized {
                property_id,
                caller: ctx.sender.clone(),
            });
        }

        property.location = location.into();
        property.size = size;
        property.structure_type = structure_type.into();

        debug!(property_id, "Updated property");
        Ok(())
    }

    /// Get a property by id.
    pub fn get(&self, property_id: PropertyId) -> Option<&Property> {
        self.properties.get(&property_id)
    }

    /// Get the ids registered by an owner.
    pub fn get_by_owner(&self, owner: &Principal) -> Option<&OwnerProperties> {
        self.by_owner.get(owner)
    }

    /// Number of registered properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The most recently assigned id, or 0 if none.
    pub fn last_id(&self) -> PropertyId {
        self.last_id
    }
}
