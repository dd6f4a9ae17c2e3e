//! The login-or-signup state machine. One controller drives phone entry, OTP
//! verification (branching into signup or login), progressive profile
//! collection, and the email/password alternate entry point. All network calls
//! go through the [`ApiClient`]; successful authentication writes straight into
//! the session store.
//!
//! Flow overview: Start dispatches a signup OTP; a conflict reroutes to the
//! login-OTP branch. Verifying the code authenticates (creating the account for
//! a new phone) and either completes the flow (login) or continues through
//! profile details and password creation (signup).

pub mod password;
pub mod phone;

pub use password::meets_password_policy;
pub use phone::normalize_phone;

use crate::api::types::{ProfileUpdate, UserUpdate};
use crate::api::ApiClient;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::debug;

/// Name sent with verify-otp before the real name has been collected.
const PLACEHOLDER_NAME: &str = "New User";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpBranch {
    Signup,
    Login,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStep {
    Start,
    OtpEntry { branch: OtpBranch },
    ProfileDetails,
    CreatePassword,
    EmailLogin,
    Complete,
}

/// Controller for the auth dialog. Owns the transient form fields and the
/// current step; the UI renders from the accessors and calls the submit
/// methods. One request per step may be in flight at a time.
pub struct AuthFlow {
    api: Arc<ApiClient>,
    step: AuthStep,
    phone: String,
    code: String,
    name: String,
    email: String,
    password: String,
    confirmation: String,
    terms_accepted: bool,
    error: Option<String>,
    busy: bool,
}

impl AuthFlow {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            step: AuthStep::Start,
            phone: String::new(),
            code: String::new(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirmation: String::new(),
            terms_accepted: false,
            error: None,
            busy: false,
        }
    }

    #[must_use]
    pub fn step(&self) -> AuthStep {
        self.step
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Phone in its current form; normalized once dispatch succeeds.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_confirmation(&mut self, confirmation: impl Into<String>) {
        self.confirmation = confirmation.into();
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    /// Switch from Start to the email/password entry point.
    pub fn begin_email_login(&mut self) {
        if self.step == AuthStep::Start {
            self.error = None;
            self.step = AuthStep::EmailLogin;
        }
    }

    /// Normalize the phone and dispatch an OTP. A conflict means the phone
    /// already has an account; the flow switches to the login branch.
    pub async fn submit_phone(&mut self) {
        if self.step != AuthStep::Start || self.busy {
            return;
        }
        self.error = None;

        let normalized = match normalize_phone(&self.phone) {
            Ok(normalized) => normalized,
            Err(err) => {
                self.error = Some(err.to_string());
                return;
            }
        };

        self.dispatch_otp(normalized).await;
    }

    /// Re-run dispatch for the already-normalized phone to get a fresh code.
    pub async fn resend_code(&mut self) {
        let AuthStep::OtpEntry { .. } = self.step else {
            return;
        };
        if self.busy {
            return;
        }
        self.error = None;
        let phone = self.phone.clone();
        self.dispatch_otp(phone).await;
    }

    async fn dispatch_otp(&mut self, normalized: String) {
        self.busy = true;
        match self.api.register_with_phone(&normalized).await {
            Ok(_) => {
                self.phone = normalized;
                self.step = AuthStep::OtpEntry {
                    branch: OtpBranch::Signup,
                };
            }
            Err(err) if err.is_conflict() => {
                debug!("Phone already registered, switching to login OTP");
                match self.api.request_login_otp(&normalized).await {
                    Ok(_) => {
                        self.phone = normalized;
                        self.step = AuthStep::OtpEntry {
                            branch: OtpBranch::Login,
                        };
                    }
                    Err(_) => {
                        self.error = Some("Failed to send OTP. Please try again.".to_string());
                    }
                }
            }
            Err(_) => {
                self.error = Some("Failed to send OTP. Please try again.".to_string());
            }
        }
        self.busy = false;
    }

    /// Verify the entered code. Success authenticates immediately; the signup
    /// branch continues to profile details, the login branch completes.
    pub async fn submit_otp(&mut self) {
        let AuthStep::OtpEntry { branch } = self.step else {
            return;
        };
        if self.busy {
            return;
        }
        if self.code.trim().is_empty() {
            self.error = Some("Please enter the OTP.".to_string());
            return;
        }

        self.busy = true;
        let name = if self.name.trim().is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            self.name.trim().to_string()
        };
        match self.api.verify_otp(&self.phone, self.code.trim(), &name).await {
            Ok(token) => {
                self.api
                    .store()
                    .set_auth(SecretString::from(token.access_token), token.user);
                self.code.clear();
                self.error = None;
                self.step = match branch {
                    OtpBranch::Signup => AuthStep::ProfileDetails,
                    OtpBranch::Login => AuthStep::Complete,
                };
            }
            Err(_) => {
                self.error = Some("Invalid OTP. Please try again.".to_string());
            }
        }
        self.busy = false;
    }

    /// Advance past profile details. No network call; both fields required.
    pub fn submit_profile(&mut self) {
        if self.step != AuthStep::ProfileDetails {
            return;
        }
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            self.error = Some("Name and email are required.".to_string());
            return;
        }
        self.error = None;
        self.step = AuthStep::CreatePassword;
    }

    /// Finalize the account with an authenticated profile update carrying the
    /// collected name, email and password.
    pub async fn submit_password(&mut self) {
        if self.step != AuthStep::CreatePassword || self.busy {
            return;
        }
        if !meets_password_policy(&self.password) {
            self.error = Some(
                "Password must be at least 6 characters with a digit and a lowercase letter."
                    .to_string(),
            );
            return;
        }
        if self.password != self.confirmation {
            self.error = Some("Passwords do not match.".to_string());
            return;
        }
        if !self.terms_accepted {
            self.error = Some("Please accept the terms to continue.".to_string());
            return;
        }

        self.busy = true;
        let update = ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            password: Some(self.password.clone()),
            ..ProfileUpdate::default()
        };
        match self.api.update_profile(&update).await {
            Ok(user) => {
                self.api.store().update_user(UserUpdate {
                    name: Some(user.name),
                    email: user.email,
                    role: Some(user.role),
                    ..UserUpdate::default()
                });
                self.password.clear();
                self.confirmation.clear();
                self.error = None;
                self.step = AuthStep::Complete;
            }
            Err(err) => {
                // Collected fields stay put so the user can retry.
                self.error = Some(err.to_string());
            }
        }
        self.busy = false;
    }

    /// Email/password login for the alternate entry point.
    pub async fn submit_email_login(&mut self) {
        if self.step != AuthStep::EmailLogin || self.busy {
            return;
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required.".to_string());
            return;
        }

        self.busy = true;
        match self
            .api
            .login_with_password(self.email.trim(), &self.password)
            .await
        {
            Ok(token) => {
                self.api
                    .store()
                    .set_auth(SecretString::from(token.access_token), token.user);
                self.password.clear();
                self.error = None;
                self.step = AuthStep::Complete;
            }
            Err(_) => {
                self.error = Some("Invalid credentials.".to_string());
            }
        }
        self.busy = false;
    }

    /// Step to the immediately preceding state without network calls.
    pub fn back(&mut self) {
        self.error = None;
        self.step = match self.step {
            AuthStep::OtpEntry { .. } | AuthStep::EmailLogin => AuthStep::Start,
            AuthStep::ProfileDetails => AuthStep::OtpEntry {
                branch: OtpBranch::Signup,
            },
            AuthStep::CreatePassword => AuthStep::ProfileDetails,
            step @ (AuthStep::Start | AuthStep::Complete) => step,
        };
    }

    /// Reset to Start, dropping every transient field. Sensitive values never
    /// survive a closed dialog.
    pub fn close(&mut self) {
        self.step = AuthStep::Start;
        self.phone.clear();
        self.code.clear();
        self.name.clear();
        self.email.clear();
        self.password.clear();
        self.confirmation.clear();
        self.terms_accepted = false;
        self.error = None;
        self.busy = false;
    }
}

impl std::fmt::Debug for AuthFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthFlow")
            .field("step", &self.step)
            .field("phone", &self.phone)
            .field("code", &"***")
            .field("password", &"***")
            .field("busy", &self.busy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::session::{MemorySessionStorage, SessionStore};
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn flow_against(base_url: &str) -> Result<AuthFlow> {
        let config = AppConfig {
            api_base_url: base_url.to_string(),
            maps_api_key: String::new(),
            payment_public_key: String::new(),
        };
        let store = std::sync::Arc::new(SessionStore::new(Box::new(MemorySessionStorage::new())));
        let api = std::sync::Arc::new(ApiClient::new(&config, store)?);
        Ok(AuthFlow::new(api))
    }

    #[tokio::test]
    async fn invalid_phone_stays_in_start_without_network() -> Result<()> {
        // Unroutable base URL: any request would fail loudly.
        let mut flow = flow_against("http://127.0.0.1:9")?;
        flow.set_phone("12345");
        flow.submit_phone().await;

        assert_eq!(flow.step(), AuthStep::Start);
        assert!(flow.error().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn conflict_switches_to_login_branch() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let mut flow = flow_against(&server.uri())?;

        Mock::given(method("POST"))
            .and(path("/auth/register-with-phone"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"detail": "Already registered"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login-request-otp"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OTP sent"})))
            .mount(&server)
            .await;

        flow.set_phone("9876543210");
        flow.submit_phone().await;

        assert_eq!(
            flow.step(),
            AuthStep::OtpEntry {
                branch: OtpBranch::Login
            }
        );
        assert_eq!(flow.phone(), "+919876543210");
        assert!(flow.error().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_otp_request_stays_in_start() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let mut flow = flow_against(&server.uri())?;

        Mock::given(method("POST"))
            .and(path("/auth/register-with-phone"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login-request-otp"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        flow.set_phone("9876543210");
        flow.submit_phone().await;

        assert_eq!(flow.step(), AuthStep::Start);
        assert!(flow.error().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn invalid_otp_keeps_otp_entry_state() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let mut flow = flow_against(&server.uri())?;

        Mock::given(method("POST"))
            .and(path("/auth/verify-otp"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Invalid or expired OTP"})),
            )
            .mount(&server)
            .await;

        flow.step = AuthStep::OtpEntry {
            branch: OtpBranch::Signup,
        };
        flow.phone = "+919876543210".to_string();
        flow.set_code("000000");
        flow.submit_otp().await;

        assert_eq!(
            flow.step(),
            AuthStep::OtpEntry {
                branch: OtpBranch::Signup
            }
        );
        assert!(flow.error().is_some());
        assert!(!flow.api.store().is_authenticated());
        Ok(())
    }

    #[test]
    fn profile_details_advances_without_network() {
        let mut flow = flow_against("http://127.0.0.1:9").expect("flow");
        flow.step = AuthStep::ProfileDetails;

        flow.submit_profile();
        assert_eq!(flow.step(), AuthStep::ProfileDetails);
        assert!(flow.error().is_some());

        flow.set_name("Asha");
        flow.set_email("asha@example.com");
        flow.submit_profile();
        assert_eq!(flow.step(), AuthStep::CreatePassword);
        assert!(flow.error().is_none());
    }

    #[tokio::test]
    async fn weak_password_is_rejected_before_any_request() -> Result<()> {
        let mut flow = flow_against("http://127.0.0.1:9")?;
        flow.step = AuthStep::CreatePassword;
        flow.set_name("Asha");
        flow.set_email("asha@example.com");
        flow.set_password("ABC123");
        flow.set_confirmation("ABC123");
        flow.set_terms_accepted(true);

        flow.submit_password().await;
        assert_eq!(flow.step(), AuthStep::CreatePassword);
        assert!(flow.error().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn mismatched_confirmation_blocks_submit() -> Result<()> {
        let mut flow = flow_against("http://127.0.0.1:9")?;
        flow.step = AuthStep::CreatePassword;
        flow.set_password("abc123");
        flow.set_confirmation("abc124");
        flow.set_terms_accepted(true);

        flow.submit_password().await;
        assert_eq!(flow.step(), AuthStep::CreatePassword);
        assert_eq!(flow.error(), Some("Passwords do not match."));
        Ok(())
    }

    #[test]
    fn back_steps_to_preceding_state() {
        let mut flow = flow_against("http://127.0.0.1:9").expect("flow");

        flow.step = AuthStep::CreatePassword;
        flow.back();
        assert_eq!(flow.step(), AuthStep::ProfileDetails);
        flow.back();
        assert_eq!(
            flow.step(),
            AuthStep::OtpEntry {
                branch: OtpBranch::Signup
            }
        );
        flow.back();
        assert_eq!(flow.step(), AuthStep::Start);
        flow.back();
        assert_eq!(flow.step(), AuthStep::Start);
    }

    #[test]
    fn close_drops_sensitive_fields() {
        let mut flow = flow_against("http://127.0.0.1:9").expect("flow");
        flow.step = AuthStep::CreatePassword;
        flow.set_phone("+919876543210");
        flow.set_code("123456");
        flow.set_password("abc123");
        flow.set_confirmation("abc123");
        flow.set_terms_accepted(true);

        flow.close();
        assert_eq!(flow.step(), AuthStep::Start);
        assert!(flow.phone.is_empty());
        assert!(flow.code.is_empty());
        assert!(flow.password.is_empty());
        assert!(flow.confirmation.is_empty());
        assert!(!flow.terms_accepted);
    }

    #[test]
    fn email_login_only_starts_from_start() {
        let mut flow = flow_against("http://127.0.0.1:9").expect("flow");
        flow.begin_email_login();
        assert_eq!(flow.step(), AuthStep::EmailLogin);

        flow.step = AuthStep::ProfileDetails;
        flow.begin_email_login();
        assert_eq!(flow.step(), AuthStep::ProfileDetails);
    }
}
