//! Application state management for Gatehouse.
//!
//! This module contains the core `App` struct that ties the session gate,
//! the route guard, and the backend client together, plus the login form
//! state (field values, touched tracking, and the password reveal timer).

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use crate::api::AuthClient;
use crate::auth::validate::{self, Credentials, ValidationReport};
use crate::auth::{SessionGate, SessionRecord, SessionStore, SessionToken};
use crate::config::{Config, Environment};
use crate::routes::{self, Destination, DEFAULT_PROTECTED};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
/// 254 chars is the practical upper bound for addresses.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// How long a revealed password stays visible before auto-hiding.
pub const PASSWORD_REVEAL_MS: u64 = 750;

// ============================================================================
// Login Form
// ============================================================================

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// State of the login form.
///
/// Validation is re-run on every edit; the submit control stays disabled
/// until both fields have been touched and both currently validate. The
/// password reveal deadline lives here so that leaving the screen (or
/// toggling again) always cancels it.
pub struct LoginForm {
    pub email: String,
    pub password: String,
    email_touched: bool,
    password_touched: bool,
    pub focus: LoginFocus,
    /// Alert-style message from a failed sign-in attempt.
    pub alert: Option<String>,
    /// True while the backend call is in flight; submit is disabled.
    pub submitting: bool,
    reveal_until: Option<Instant>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            email_touched: false,
            password_touched: false,
            focus: LoginFocus::Email,
            alert: None,
            submitting: false,
            reveal_until: None,
        }
    }
}

impl LoginForm {
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            LoginFocus::Email => {
                if self.email.chars().count() < MAX_EMAIL_LENGTH && !c.is_control() {
                    self.email.push(c);
                    self.email_touched = true;
                }
            }
            LoginFocus::Password => {
                if self.password.chars().count() < MAX_PASSWORD_LENGTH && !c.is_control() {
                    self.password.push(c);
                    self.password_touched = true;
                }
            }
            LoginFocus::Button => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            LoginFocus::Email => {
                if self.email.pop().is_some() {
                    self.email_touched = true;
                }
            }
            LoginFocus::Password => {
                if self.password.pop().is_some() {
                    self.password_touched = true;
                }
            }
            LoginFocus::Button => {}
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            LoginFocus::Email => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Email,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            LoginFocus::Email => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Email,
            LoginFocus::Button => LoginFocus::Password,
        };
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Current per-field validation, re-computed on demand.
    pub fn report(&self) -> ValidationReport {
        validate::validate(&self.credentials())
    }

    /// Show a field's error only once the user has touched it.
    pub fn visible_error(&self, focus: LoginFocus) -> Option<String> {
        let report = self.report();
        match focus {
            LoginFocus::Email if self.email_touched => {
                report.email.map(|e| e.to_string())
            }
            LoginFocus::Password if self.password_touched => {
                report.password.map(|e| e.to_string())
            }
            _ => None,
        }
    }

    /// Submit is enabled only when every field has been touched at least
    /// once and everything currently validates. Untouched defaults are
    /// never submittable, and an in-flight submission disables the control.
    pub fn is_submittable(&self) -> bool {
        self.email_touched
            && self.password_touched
            && self.report().is_valid()
            && !self.submitting
    }

    /// Toggle password visibility. Turning it on arms the auto-hide
    /// deadline; turning it off (or re-toggling) replaces the old deadline,
    /// so a stale one can never fire.
    pub fn toggle_reveal(&mut self, now: Instant) {
        self.reveal_until = match self.reveal_until {
            Some(_) => None,
            None => Some(now + Duration::from_millis(PASSWORD_REVEAL_MS)),
        };
    }

    pub fn password_revealed(&self, now: Instant) -> bool {
        matches!(self.reveal_until, Some(deadline) if now < deadline)
    }

    /// Called every event-loop tick; hides the password once the deadline
    /// passes.
    pub fn tick(&mut self, now: Instant) {
        if matches!(self.reveal_until, Some(deadline) if now >= deadline) {
            self.reveal_until = None;
        }
    }

    /// Cancel any pending reveal. Called whenever the login screen is torn
    /// down so no deadline outlives the field it belongs to.
    pub fn cancel_reveal(&mut self) {
        self.reveal_until = None;
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    pub config: Config,
    pub environment: Environment,
    pub gate: SessionGate,
    pub api: AuthClient,
    pub screen: Destination,
    pub login: LoginForm,
    /// Dev-only session inspector overlay (F12).
    pub show_inspector: bool,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::load().context("Failed to load config")?;
        let environment = Environment::detect();

        let data_dir = config.data_dir()?;
        let gate = SessionGate::new(SessionStore::new(data_dir));
        // App-start lifecycle: drop anything stale left over from a
        // previous run before the first screen renders.
        gate.purge_expired();

        let api = AuthClient::new(config.backend_url())?;

        let mut login = LoginForm::default();
        if let Some(ref email) = config.last_email {
            login.email = email.clone();
        }

        Ok(Self {
            config,
            environment,
            gate,
            api,
            screen: Destination::Home,
            login,
            show_inspector: false,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    /// The session shown on protected screens, if any.
    pub fn session(&self) -> Option<SessionRecord> {
        self.gate.current()
    }

    /// Navigate with the route guard applied. The gate is re-queried on
    /// every call; a stale session is purged after the (read-only) query
    /// observes it.
    pub fn navigate(&mut self, requested: Destination) {
        let authenticated = self.gate.is_authenticated();
        if !authenticated {
            self.gate.purge_expired();
        }

        let landed = routes::resolve(requested, authenticated);
        if landed != requested {
            debug!(?requested, ?landed, "navigation redirected");
        }

        if self.screen == Destination::Login && landed != Destination::Login {
            // Login screen teardown: the reveal timer must not outlive it.
            self.login.cancel_reveal();
        }
        self.screen = landed;
    }

    /// Arm a login attempt from the input handler. Only flips the
    /// `submitting` flag; the event loop draws one frame with the control
    /// disabled and then runs `submit_login`, so the in-flight state is
    /// visible before the backend call suspends.
    pub fn request_login(&mut self) {
        if self.login.is_submittable() {
            self.login.submitting = true;
            self.login.alert = None;
        }
    }

    /// True when a requested login still needs its backend call.
    pub fn login_in_flight(&self) -> bool {
        self.screen == Destination::Login && self.login.submitting
    }

    /// Perform the armed login attempt. Suspends on the backend call; the
    /// `submitting` flag set by `request_login` keeps the control disabled
    /// for the duration.
    pub async fn submit_login(&mut self) {
        if !self.login.submitting {
            return;
        }

        if !self.environment.is_production() {
            // Never log the password, even in development.
            debug!(email = %self.login.email, "submitting login form");
        }

        let credentials = self.login.credentials();
        let outcome = self.api.login(&credentials).await;
        self.login.submitting = false;

        match outcome {
            Ok(response) => {
                let token = SessionToken::bearer(response.access_token);
                match self.gate.sign_in(token, response.user) {
                    Ok(()) => {
                        info!("login successful");
                        self.config.last_email = Some(credentials.email);
                        if let Err(e) = self.config.save() {
                            error!(error = %e, "failed to save config");
                        }
                        self.login = LoginForm::default();
                        self.navigate(DEFAULT_PROTECTED);
                    }
                    Err(e) => {
                        error!(error = %e, "sign-in failed");
                        self.fail_login(format!(
                            "An error occurred while trying to login. Please try again! ({})",
                            e
                        ));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "login request failed");
                self.fail_login(e.to_string());
            }
        }
    }

    /// Rebuild the form from defaults so no residual field state survives a
    /// failed attempt, then surface the alert.
    fn fail_login(&mut self, message: String) {
        self.login = LoginForm::default();
        self.login.alert = Some(message);
    }

    pub fn sign_out(&mut self) {
        self.gate.sign_out();
        info!("signed out");
        self.navigate(Destination::Home);
    }

    pub fn toggle_inspector(&mut self) {
        // Inspector is a development affordance only.
        if !self.environment.is_production() {
            self.show_inspector = !self.show_inspector;
        }
    }

    /// Per-tick housekeeping from the event loop.
    pub fn tick(&mut self, now: Instant) {
        if self.screen == Destination::Login {
            self.login.tick(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut LoginForm, focus: LoginFocus, text: &str) {
        form.focus = focus;
        for c in text.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn untouched_form_is_not_submittable() {
        let form = LoginForm::default();
        assert!(!form.is_submittable());
    }

    #[test]
    fn form_with_prefilled_email_is_not_submittable_until_touched() {
        // last_email prefill counts as an untouched default.
        let mut form = LoginForm {
            email: "user@example.com".to_string(),
            ..LoginForm::default()
        };
        type_into(&mut form, LoginFocus::Password, "abcd");
        assert!(!form.is_submittable());
    }

    #[test]
    fn touched_and_valid_form_is_submittable() {
        let mut form = LoginForm::default();
        type_into(&mut form, LoginFocus::Email, "user@example.com");
        type_into(&mut form, LoginFocus::Password, "abcd");
        assert!(form.report().is_valid());
        assert!(form.is_submittable());
    }

    #[test]
    fn touched_but_invalid_form_is_not_submittable() {
        let mut form = LoginForm::default();
        type_into(&mut form, LoginFocus::Email, "user@example.com");
        type_into(&mut form, LoginFocus::Password, "abc");
        assert!(!form.is_submittable());
    }

    #[test]
    fn submitting_flag_disables_the_control() {
        let mut form = LoginForm::default();
        type_into(&mut form, LoginFocus::Email, "user@example.com");
        type_into(&mut form, LoginFocus::Password, "abcd");
        form.submitting = true;
        assert!(!form.is_submittable());
    }

    #[test]
    fn field_errors_surface_only_after_touch() {
        let mut form = LoginForm::default();
        assert_eq!(form.visible_error(LoginFocus::Email), None);

        type_into(&mut form, LoginFocus::Email, "x");
        form.backspace();
        assert_eq!(
            form.visible_error(LoginFocus::Email),
            Some("Please specify an email.".to_string())
        );
    }

    fn test_app(dir: &tempfile::TempDir) -> App {
        App {
            config: Config::default(),
            environment: Environment::Production,
            gate: SessionGate::new(SessionStore::new(dir.path().to_path_buf())),
            api: AuthClient::new(None).expect("stub client"),
            screen: Destination::Login,
            login: LoginForm::default(),
            show_inspector: false,
        }
    }

    #[tokio::test]
    async fn armed_login_disables_the_control_until_the_call_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        type_into(&mut app.login, LoginFocus::Email, "user@example.com");
        type_into(&mut app.login, LoginFocus::Password, "abcd");

        app.request_login();

        // The event loop draws one frame in this window; the control must
        // already be disabled and the attempt still pending.
        assert!(app.login.submitting);
        assert!(app.login_in_flight());
        assert!(!app.login.is_submittable());

        app.submit_login().await;
        assert!(!app.login_in_flight());
        assert!(app.is_authenticated());
        assert_eq!(app.screen, Destination::Dashboard);
    }

    #[test]
    fn request_login_ignores_an_unsubmittable_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        type_into(&mut app.login, LoginFocus::Email, "user@example.com");
        type_into(&mut app.login, LoginFocus::Password, "abc");

        app.request_login();
        assert!(!app.login_in_flight());
    }

    #[tokio::test]
    async fn submit_without_an_armed_request_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = test_app(&dir);
        app.submit_login().await;
        assert!(!app.is_authenticated());
        assert_eq!(app.screen, Destination::Login);
    }

    #[test]
    fn reveal_auto_hides_after_the_deadline() {
        let mut form = LoginForm::default();
        let now = Instant::now();

        form.toggle_reveal(now);
        assert!(form.password_revealed(now));

        let later = now + Duration::from_millis(PASSWORD_REVEAL_MS + 1);
        form.tick(later);
        assert!(!form.password_revealed(later));
    }

    #[test]
    fn re_toggling_cancels_the_reveal() {
        let mut form = LoginForm::default();
        let now = Instant::now();

        form.toggle_reveal(now);
        form.toggle_reveal(now);
        assert!(!form.password_revealed(now));
    }

    #[test]
    fn teardown_cancels_a_pending_reveal() {
        let mut form = LoginForm::default();
        let now = Instant::now();

        form.toggle_reveal(now);
        form.cancel_reveal();
        assert!(!form.password_revealed(now));
    }
}
