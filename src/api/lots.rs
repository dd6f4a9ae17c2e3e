//! Wrappers for host inventory and the my-spot scheduling/pricing endpoints.

use super::types::{
    Availability, AvailabilityCreate, Lot, LotCreate, PricingCreate, PricingRule, Role, UserUpdate,
};
use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Create a lot with its first spot. The backend upgrades a driver to a
    /// seller on the first listing, so the cached role is bumped to match.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn create_lot(&self, lot: &LotCreate) -> Result<Lot, ApiError> {
        let created = self.post_json("/lots/", lot).await?;
        if self.store().user().map(|user| user.role) == Some(Role::Driver) {
            self.store().update_user(UserUpdate {
                role: Some(Role::SellerC2b),
                ..UserUpdate::default()
            });
        }
        Ok(created)
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn my_lots(&self) -> Result<Vec<Lot>, ApiError> {
        self.get_json("/lots/my-lots").await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn lot_details(&self, lot_id: &str) -> Result<Lot, ApiError> {
        self.get_json(&format!("/lots/{lot_id}")).await
    }

    /// Set the base rate for a lot (simple C2B pricing).
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn set_pricing(&self, pricing: &PricingCreate) -> Result<PricingRule, ApiError> {
        self.post_json("/my-spot/pricing", pricing).await
    }

    /// Open an availability window for a spot.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn set_availability(
        &self,
        availability: &AvailabilityCreate,
    ) -> Result<Vec<Availability>, ApiError> {
        self.post_json("/my-spot/availability", availability).await
    }
}
