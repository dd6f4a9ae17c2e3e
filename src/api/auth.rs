//! Wrappers for the auth and account-settings endpoints. These forward
//! arguments and parse responses; the auth flow decides what to do with the
//! outcomes, including writing tokens into the session store.

use super::types::{
    LoginRequest, MessageResponse, Notifications, OtpRequest, OtpVerifyRequest, Preferences,
    ProfileUpdate, SignupRequest, TokenResponse, User,
};
use super::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Start signup for a phone number. A 409 means the phone already has an
    /// account and the caller should switch to the login-OTP branch.
    ///
    /// # Errors
    /// Propagates transport and backend errors, including the 409 conflict.
    pub async fn register_with_phone(&self, phone: &str) -> Result<MessageResponse, ApiError> {
        self.post_json(
            "/auth/register-with-phone",
            &OtpRequest {
                phone: phone.to_string(),
            },
        )
        .await
    }

    /// Request a login OTP for an existing account.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn request_login_otp(&self, phone: &str) -> Result<MessageResponse, ApiError> {
        self.post_json(
            "/auth/login-request-otp",
            &OtpRequest {
                phone: phone.to_string(),
            },
        )
        .await
    }

    /// Verify a phone OTP. Authenticates, creating a minimal account for a
    /// phone the backend has never seen.
    ///
    /// # Errors
    /// Propagates transport and backend errors (400 for a bad or expired code).
    pub async fn verify_otp(
        &self,
        phone: &str,
        otp: &str,
        name: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.post_json(
            "/auth/verify-otp",
            &OtpVerifyRequest {
                phone: phone.to_string(),
                otp: otp.to_string(),
                name: name.to_string(),
            },
        )
        .await
    }

    /// Legacy one-shot signup. Kept for backends that still expose it; the
    /// current flow finalizes via [`ApiClient::update_profile`] instead.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn signup(&self, request: &SignupRequest) -> Result<TokenResponse, ApiError> {
        self.post_json("/auth/signup", request).await
    }

    /// Email/password login for the alternate entry point.
    ///
    /// # Errors
    /// Propagates transport and backend errors (401 for bad credentials).
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        self.post_json(
            "/auth/login-with-password",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Authenticated partial profile update; returns the updated profile.
    ///
    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.patch_json("/auth/profile", update).await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn preferences(&self) -> Result<Preferences, ApiError> {
        self.get_json("/auth/settings/preferences").await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn update_preferences(
        &self,
        preferences: &Preferences,
    ) -> Result<Preferences, ApiError> {
        self.put_json("/auth/settings/preferences", preferences).await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn notifications(&self) -> Result<Notifications, ApiError> {
        self.get_json("/auth/settings/notifications").await
    }

    /// # Errors
    /// Propagates transport and backend errors.
    pub async fn update_notifications(
        &self,
        notifications: &Notifications,
    ) -> Result<Notifications, ApiError> {
        self.put_json("/auth/settings/notifications", notifications)
            .await
    }
}
