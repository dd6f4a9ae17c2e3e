//! Wrappers for host payout account setup and lookup.

use super::types::PayoutAccount;
use super::ApiClient;
use crate::error::ApiError;
use serde::Serialize;

#[derive(Serialize)]
struct PayoutAccountCreate {
    account_type: &'static str,
    details: PayoutDetails,
}

#[derive(Serialize)]
struct PayoutDetails {
    upi_id: String,
}

impl ApiClient {
    /// Register a UPI payout account for the current host.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn setup_payout_account(&self, upi_id: &str) -> Result<PayoutAccount, ApiError> {
        self.post_json(
            "/api/financials/account",
            &PayoutAccountCreate {
                account_type: "upi",
                details: PayoutDetails {
                    upi_id: upi_id.to_string(),
                },
            },
        )
        .await
    }

    /// Look up the payout account; `Ok(None)` when none has been set up.
    ///
    /// # Errors
    /// Propagates transport and backend errors other than 404.
    pub async fn payout_account(&self) -> Result<Option<PayoutAccount>, ApiError> {
        self.get_optional_json("/api/financials/account").await
    }
}
