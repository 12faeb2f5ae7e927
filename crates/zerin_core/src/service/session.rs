//! Session manager: the authentication and view state machine.
//!
//! # Responsibility
//! - Drive the `LoggedOut -> AwaitingPin -> Authenticated` flow, including
//!   cold-start re-entry and the admin/user panel sub-states.
//! - Validate registration and enrollment input before touching the
//!   directory.
//!
//! # Invariants
//! - Every transition is checked against the legal-transition table; illegal
//!   requests are rejected with `SessionError::IllegalTransition` and leave
//!   the state unchanged.
//! - No failure here is fatal; every error leaves the session in a state the
//!   caller can retry from.
//! - Pin verification compares against the persisted session snapshot, not
//!   a directory re-fetch.

use crate::collab::Announcer;
use crate::model::user::{NewUser, Tier, User, UserPatch};
use crate::repo::kv::{KvStore, StoreError, StoreResult};
use crate::repo::user_repo::UserDirectory;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authenticated sub-states (the visible panel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Main,
    Admin,
    UserPanel,
}

/// Session states. Authenticated carries the active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    AwaitingPin,
    Authenticated(Panel),
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::AwaitingPin => "awaiting_pin",
            Self::Authenticated(Panel::Main) => "authenticated/main",
            Self::Authenticated(Panel::Admin) => "authenticated/admin",
            Self::Authenticated(Panel::UserPanel) => "authenticated/user_panel",
        }
    }
}

/// Which credential the login form submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMethod {
    Password,
    Pin,
}

/// Self-service registration input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub pin: String,
    pub mobile: String,
}

/// Admin enrollment input. The requested tier is applied after registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentForm {
    pub name: String,
    pub email: String,
    pub pin: String,
    pub mobile: String,
    pub tier: Tier,
}

/// Recoverable session-flow failures with user-facing messages.
#[derive(Debug)]
pub enum SessionError {
    /// A required registration/enrollment field was left empty.
    MissingFields,
    /// The pin is not exactly four characters.
    PinLength,
    /// Email plus the submitted credential did not match an active account.
    InvalidCredentials(LoginMethod),
    /// Pin re-entry did not match the session snapshot.
    WrongPin,
    /// The requested action is not legal in the current state.
    IllegalTransition {
        state: &'static str,
        action: &'static str,
    },
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields => write!(f, "please fill in all fields"),
            Self::PinLength => write!(f, "the pin must be exactly 4 digits"),
            Self::InvalidCredentials(LoginMethod::Password) => {
                write!(f, "wrong email or password")
            }
            Self::InvalidCredentials(LoginMethod::Pin) => write!(f, "wrong email or pin"),
            Self::WrongPin => write!(f, "wrong pin, please try again"),
            Self::IllegalTransition { state, action } => {
                write!(f, "`{action}` is not allowed while the session is `{state}`")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Tracks the current user and drives the auth -> pin -> main flow.
pub struct SessionManager<'a, S: KvStore> {
    directory: UserDirectory<'a, S>,
    announcer: &'a dyn Announcer,
    state: SessionState,
}

impl<'a, S: KvStore> SessionManager<'a, S> {
    pub fn new(kv: &'a S, announcer: &'a dyn Announcer) -> Self {
        Self {
            directory: UserDirectory::new(kv),
            announcer,
            state: SessionState::LoggedOut,
        }
    }

    /// The current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Directory access for admin flows (listing, tier/status edits,
    /// deletion).
    pub fn directory(&self) -> &UserDirectory<'a, S> {
        &self.directory
    }

    /// The persisted session snapshot, if any.
    pub fn current_user(&self) -> StoreResult<Option<User>> {
        self.directory.current_user()
    }

    /// Cold start: a persisted session snapshot demands pin re-entry, never
    /// direct authentication.
    pub fn resume(&mut self) -> StoreResult<SessionState> {
        self.state = if self.directory.current_user()?.is_some() {
            SessionState::AwaitingPin
        } else {
            SessionState::LoggedOut
        };
        info!(
            "event=session_resume module=session status=ok state={}",
            self.state.name()
        );
        Ok(self.state)
    }

    /// Registers a new account and moves to pin confirmation.
    pub fn register(&mut self, form: RegistrationForm) -> Result<User, SessionError> {
        self.require(SessionState::LoggedOut, "register")?;

        if form.name.is_empty()
            || form.email.is_empty()
            || form.password.is_empty()
            || form.pin.is_empty()
            || form.mobile.is_empty()
        {
            return Err(SessionError::MissingFields);
        }
        if form.pin.chars().count() != 4 {
            return Err(SessionError::PinLength);
        }

        let user = self.directory.register(NewUser {
            email: form.email,
            password: Some(form.password),
            pin: form.pin,
            mobile: form.mobile,
            name: form.name,
            ..NewUser::default()
        })?;
        self.directory.set_current_user(Some(&user))?;
        self.state = SessionState::AwaitingPin;

        Ok(user)
    }

    /// Attempts a login with email plus one credential.
    ///
    /// A password-method success authenticates directly; a pin-method
    /// success still requires `verify_pin` before the session opens.
    pub fn login(
        &mut self,
        email: &str,
        password: Option<&str>,
        pin: Option<&str>,
        method: LoginMethod,
    ) -> Result<User, SessionError> {
        self.require(SessionState::LoggedOut, "login")?;

        let Some(user) = self.directory.login(email, password, pin)? else {
            return Err(SessionError::InvalidCredentials(method));
        };

        self.directory.set_current_user(Some(&user))?;
        self.state = match method {
            LoginMethod::Password => {
                self.welcome(&user);
                SessionState::Authenticated(Panel::Main)
            }
            LoginMethod::Pin => SessionState::AwaitingPin,
        };
        info!(
            "event=session_login module=session status=ok state={}",
            self.state.name()
        );

        Ok(user)
    }

    /// Confirms re-entry with the session snapshot's pin.
    ///
    /// On mismatch the state stays `AwaitingPin`; the caller clears the pin
    /// input and the user may retry indefinitely.
    pub fn verify_pin(&mut self, candidate: &str) -> Result<User, SessionError> {
        self.require(SessionState::AwaitingPin, "verify_pin")?;

        let Some(user) = self.directory.verify_pin(candidate)? else {
            info!("event=pin_verify module=session status=denied");
            return Err(SessionError::WrongPin);
        };

        self.state = SessionState::Authenticated(Panel::Main);
        self.welcome(&user);
        info!("event=pin_verify module=session status=ok");

        Ok(user)
    }

    /// Switches between authenticated panels.
    pub fn open_panel(&mut self, panel: Panel) -> Result<(), SessionError> {
        match self.state {
            SessionState::Authenticated(_) => {
                self.state = SessionState::Authenticated(panel);
                Ok(())
            }
            state => Err(SessionError::IllegalTransition {
                state: state.name(),
                action: "open_panel",
            }),
        }
    }

    /// Clears the persisted snapshot and returns to `LoggedOut`.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::LoggedOut {
            return Err(SessionError::IllegalTransition {
                state: self.state.name(),
                action: "logout",
            });
        }

        self.directory.set_current_user(None)?;
        self.state = SessionState::LoggedOut;
        info!("event=session_logout module=session status=ok");
        Ok(())
    }

    /// Admin enrollment: registers an account and applies the requested
    /// tier through a follow-up directory patch.
    ///
    /// Only legal from the admin panel.
    pub fn enroll(&mut self, form: EnrollmentForm) -> Result<User, SessionError> {
        self.require(SessionState::Authenticated(Panel::Admin), "enroll")?;

        if form.name.is_empty() || form.email.is_empty() || form.pin.is_empty() {
            return Err(SessionError::MissingFields);
        }

        let mut user = self.directory.register(NewUser {
            email: form.email,
            pin: form.pin,
            mobile: form.mobile,
            name: form.name,
            ..NewUser::default()
        })?;

        // `register` always yields FREE; lift to the requested tier.
        if form.tier != user.tier {
            self.directory
                .update_user(&user.id, &UserPatch::tier(form.tier))?;
            user.tier = form.tier;
        }

        self.announcer.announce(&format!(
            "{} has been enrolled in the core database.",
            user.name
        ));

        Ok(user)
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::IllegalTransition {
                state: self.state.name(),
                action,
            })
        }
    }

    fn welcome(&self, user: &User) {
        self.announcer
            .announce(&format!("Welcome {}. How can I help you?", user.name));
    }
}
