//! Request and response types for the ParkEase backend API. Bodies are owned by
//! the backend; these mirror the JSON contracts the client depends on.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    #[serde(rename = "DRIVER")]
    Driver,
    #[serde(rename = "SELLER_C2B")]
    SellerC2b,
    #[serde(rename = "OPERATOR_B2B")]
    OperatorB2b,
}

impl Role {
    /// Sellers get the host surfaces (listings, scanning, payouts).
    #[must_use]
    pub fn is_seller(self) -> bool {
        matches!(self, Role::SellerC2b | Role::OperatorB2b)
    }
}

/// User profile as returned by the backend and cached in the session store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub email: Option<String>,
    pub profile_picture_url: Option<String>,
    pub default_vehicle_plate: Option<String>,
    pub bio: Option<String>,
    pub work: Option<String>,
    pub location: Option<String>,
    pub languages: Option<String>,
    pub school: Option<String>,
    pub interests: Option<Vec<String>>,
}

/// Partial profile fields shallow-merged into the cached [`User`].
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub profile_picture_url: Option<String>,
    pub default_vehicle_plate: Option<String>,
    pub bio: Option<String>,
    pub work: Option<String>,
    pub location: Option<String>,
    pub languages: Option<String>,
    pub school: Option<String>,
    pub interests: Option<Vec<String>>,
}

impl User {
    /// Shallow-merge: only fields present in the update are replaced.
    pub fn merge(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.profile_picture_url.is_some() {
            self.profile_picture_url = update.profile_picture_url;
        }
        if update.default_vehicle_plate.is_some() {
            self.default_vehicle_plate = update.default_vehicle_plate;
        }
        if update.bio.is_some() {
            self.bio = update.bio;
        }
        if update.work.is_some() {
            self.work = update.work;
        }
        if update.location.is_some() {
            self.location = update.location;
        }
        if update.languages.is_some() {
            self.languages = update.languages;
        }
        if update.school.is_some() {
            self.school = update.school;
        }
        if update.interests.is_some() {
            self.interests = update.interests;
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub otp: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Legacy one-shot signup payload, superseded by verify-otp plus profile update.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupRequest {
    pub phone: String,
    pub otp: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Wire payload for `PATCH /auth/profile`. The password field is only set when
/// finalizing a signup; it never lands in the cached profile.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_vehicle_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Preferences {
    pub currency: String,
    pub language: String,
    pub timezone: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notifications {
    pub email_messages: bool,
    pub sms_messages: bool,
    pub push_reminders: bool,
    pub email_promotions: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    #[default]
    #[serde(rename = "CAR")]
    Car,
    #[serde(rename = "TWO_WHEELER")]
    TwoWheeler,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LotCreate {
    pub name: String,
    pub address: String,
    pub spot_type: VehicleType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Lot {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateType {
    #[serde(rename = "HOURLY")]
    Hourly,
    #[serde(rename = "FLAT")]
    Flat,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingCreate {
    pub lot_id: String,
    pub rate: f64,
    pub rate_type: RateType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: String,
    pub lot_id: String,
    pub name: String,
    pub rate: f64,
    pub rate_type: RateType,
    pub is_active: bool,
    pub priority: i32,
}

/// Availability window times are ISO-8601 strings; the backend interprets the
/// intent in IST.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailabilityCreate {
    pub spot_id: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Availability {
    pub id: String,
    pub spot_id: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchQuery {
    pub lat: f64,
    pub long: f64,
    pub start_time: String,
    pub end_time: String,
    pub vehicle_type: VehicleType,
    pub radius_meters: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    pub lot_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price: f64,
    pub rate_type: RateType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingCreate {
    pub lot_id: String,
    pub vehicle_type: VehicleType,
    pub start_time: String,
    pub end_time: String,
}

/// Pending booking plus the payment order handle the checkout widget needs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: String,
    pub lot_name: String,
    pub address: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub qr_code_data: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanRequest {
    pub qr_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub message: String,
    pub driver_name: Option<String>,
    pub vehicle_plate: Option<String>,
    pub time_remaining: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutAccount {
    pub id: String,
    pub account_type: String,
    pub details: serde_json::Value,
    pub is_active: bool,
}
