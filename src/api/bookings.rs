//! Wrappers for driver search, booking, booking history and the host-side QR
//! scan verification.

use super::types::{
    BookingCreate, BookingResponse, BookingSummary, ScanRequest, ScanResponse, SearchQuery,
    SearchResult,
};
use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Search available spots around a coordinate for a time window.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn search_availability(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, ApiError> {
        self.get_json_query("/api/search/availability", query).await
    }

    /// Create a pending booking and receive the payment order handle.
    ///
    /// # Errors
    /// Propagates transport and backend errors (400 when the window is gone).
    pub async fn create_booking(
        &self,
        booking: &BookingCreate,
    ) -> Result<BookingResponse, ApiError> {
        self.post_json("/api/book/", booking).await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn my_bookings(&self) -> Result<Vec<BookingSummary>, ApiError> {
        self.get_json("/api/my-bookings").await
    }

    /// Verify a driver's entry QR code against the host's bookings.
    ///
    /// # Errors
    /// Propagates transport and backend errors (404 for an unknown code).
    pub async fn scan(&self, qr_code: &str) -> Result<ScanResponse, ApiError> {
        self.post_json(
            "/api/scan",
            &ScanRequest {
                qr_code: qr_code.to_string(),
            },
        )
        .await
    }
}
