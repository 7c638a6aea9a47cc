//! Password recovery flow.
//!
//! ```text
//! LoggedOut --start--> AwaitingEmail --submit_email--> AwaitingCode
//!     ^                      ^                              |
//!     |                      +------- countdown hits 0 -----+
//!     |                                                     | submit_code
//!     +------------- submit_new_password --- AwaitingNewPassword
//! ```
//!
//! Each step's inputs live inside the state variant that owns them and are
//! only reachable through the matching `*_entry_mut` accessor, so input
//! meant for one step can never change another step's data. `cancel` returns
//! to [`RecoveryState::LoggedOut`] from anywhere and drops every field.
//!
//! Time is driven externally: callers invoke [`RecoveryFlow::tick`] once per
//! elapsed second, or [`RecoveryFlow::advance`] with a batch of seconds.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::validation::validate_email;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 4;

/// Seconds a verification code stays valid.
pub const CODE_TTL_SECS: u32 = 600;

/// Title of the blocking dialog shown for a wrong code.
pub const INCORRECT_CODE_TITLE: &str = "Código Incorreto";

const LAST_SLOT: usize = CODE_LENGTH - 1;

/// Errors surfaced by the recovery step handlers.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("Insira um email válido.")]
    InvalidEmail,
    #[error("Digite os 4 dígitos do código.")]
    IncompleteCode,
    /// Wrong code; shown as a blocking dialog rather than inline.
    #[error("Código incorreto. Verifique e tente novamente.")]
    IncorrectCode,
    #[error("Preencha os campos de senha.")]
    EmptyPassword,
    #[error("As senhas não coincidem!")]
    PasswordMismatch,
    /// The action belongs to a step other than the current one.
    #[error("Ação indisponível nesta etapa.")]
    WrongStep,
}

impl RecoveryError {
    /// Whether the error must be acknowledged in a modal dialog.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::IncorrectCode)
    }
}

/// Notable transitions reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryEvent {
    /// The countdown ran out; the flow went back to the email step.
    CodeExpired,
    /// A new password was accepted; the flow is over.
    PasswordReset,
}

impl RecoveryEvent {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::CodeExpired => "Código expirado! Solicite um novo código.",
            Self::PasswordReset => "Senha alterada com sucesso!",
        }
    }
}

/// A 4-digit verification code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Mint a random code.
    #[must_use]
    pub fn generate() -> Self {
        let value: u32 = rand::rng().random_range(0..10_000);
        Self(format!("{value:04}"))
    }

    /// Parse a code made of exactly four ASCII digits.
    ///
    /// # Errors
    ///
    /// Returns `RecoveryError::IncompleteCode` for anything else.
    pub fn parse(value: &str) -> Result<Self, RecoveryError> {
        let value = value.trim();
        if value.len() == CODE_LENGTH && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_owned()))
        } else {
            Err(RecoveryError::IncompleteCode)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode([REDACTED])")
    }
}

impl TryFrom<String> for VerificationCode {
    type Error = RecoveryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VerificationCode> for String {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

/// Keys with special meaning in the code inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CodeKey {
    Backspace,
    ArrowLeft,
    ArrowRight,
    #[serde(other)]
    Other,
}

/// Email step input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub email: String,
}

/// Code step: four single-digit slots, the focused slot and the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    email: String,
    expected: VerificationCode,
    digits: [Option<char>; CODE_LENGTH],
    focus: usize,
    seconds_remaining: u32,
}

impl CodeEntry {
    fn new(email: String, expected: VerificationCode) -> Self {
        Self {
            email,
            expected,
            digits: [None; CODE_LENGTH],
            focus: 0,
            seconds_remaining: CODE_TTL_SECS,
        }
    }

    /// Handle text typed into slot `index`.
    ///
    /// Multi-character and non-digit text is ignored. Empty text clears the
    /// slot. A digit is stored and focus moves to the next slot, except on
    /// the last one. Returns whether anything changed.
    pub fn input(&mut self, index: usize, text: &str) -> bool {
        let mut chars = text.chars();
        let value = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => return false,
        };
        let Some(slot) = self.digits.get_mut(index) else {
            return false;
        };
        *slot = value;
        self.focus = if value.is_some() && index < LAST_SLOT {
            index + 1
        } else {
            index
        };
        true
    }

    /// Handle a key press in slot `index`. Only focus can change.
    pub fn key_down(&mut self, index: usize, key: CodeKey) {
        let Some(slot) = self.digits.get(index) else {
            return;
        };
        match key {
            CodeKey::Backspace if slot.is_none() && index > 0 => self.focus = index - 1,
            CodeKey::ArrowLeft if index > 0 => self.focus = index - 1,
            CodeKey::ArrowRight if index < LAST_SLOT => self.focus = index + 1,
            _ => {}
        }
    }

    /// The typed code, if all four slots are filled.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.digits.iter().copied().collect()
    }

    /// Slot contents for display; empty slots are empty strings.
    #[must_use]
    pub fn digits(&self) -> Vec<String> {
        self.digits
            .iter()
            .map(|d| d.map(String::from).unwrap_or_default())
            .collect()
    }

    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The code the user is expected to type.
    #[must_use]
    pub const fn expected(&self) -> &VerificationCode {
        &self.expected
    }
}

/// New password step input.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordEntry {
    email: String,
    pub new_password: String,
    pub confirmation: String,
}

impl PasswordEntry {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Debug for PasswordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordEntry")
            .field("email", &self.email)
            .field("new_password", &"[REDACTED]")
            .field("confirmation", &"[REDACTED]")
            .finish()
    }
}

/// Current step and the inputs it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "entry", rename_all = "snake_case")]
pub enum RecoveryState {
    #[default]
    LoggedOut,
    AwaitingEmail(EmailEntry),
    AwaitingCode(CodeEntry),
    AwaitingNewPassword(PasswordEntry),
}

impl RecoveryState {
    /// Step number as shown in the UI; `0` when no recovery is in progress.
    #[must_use]
    pub const fn step_number(&self) -> u8 {
        match self {
            Self::LoggedOut => 0,
            Self::AwaitingEmail(_) => 1,
            Self::AwaitingCode(_) => 2,
            Self::AwaitingNewPassword(_) => 3,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::AwaitingEmail(_) => "awaiting_email",
            Self::AwaitingCode(_) => "awaiting_code",
            Self::AwaitingNewPassword(_) => "awaiting_new_password",
        }
    }
}

/// The recovery state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryFlow {
    state: RecoveryState,
}

impl RecoveryFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RecoveryState::LoggedOut,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &RecoveryState {
        &self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, RecoveryState::LoggedOut)
    }

    /// Countdown of the code step, or the full TTL in any other step.
    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        match &self.state {
            RecoveryState::AwaitingCode(entry) => entry.seconds_remaining,
            _ => CODE_TTL_SECS,
        }
    }

    /// Enter the email step.
    ///
    /// # Errors
    ///
    /// `WrongStep` if a recovery is already in progress.
    pub fn start(&mut self) -> Result<(), RecoveryError> {
        match self.state {
            RecoveryState::LoggedOut => {
                self.state = RecoveryState::AwaitingEmail(EmailEntry::default());
                Ok(())
            }
            _ => Err(RecoveryError::WrongStep),
        }
    }

    pub fn email_entry_mut(&mut self) -> Option<&mut EmailEntry> {
        match &mut self.state {
            RecoveryState::AwaitingEmail(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn code_entry_mut(&mut self) -> Option<&mut CodeEntry> {
        match &mut self.state {
            RecoveryState::AwaitingCode(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn password_entry_mut(&mut self) -> Option<&mut PasswordEntry> {
        match &mut self.state {
            RecoveryState::AwaitingNewPassword(entry) => Some(entry),
            _ => None,
        }
    }

    /// Submit the entered email; `code` is the one that was sent to it.
    ///
    /// # Errors
    ///
    /// `InvalidEmail` when the email fails validation (state unchanged),
    /// `WrongStep` outside the email step.
    pub fn submit_email(&mut self, code: VerificationCode) -> Result<(), RecoveryError> {
        let RecoveryState::AwaitingEmail(entry) = &mut self.state else {
            return Err(RecoveryError::WrongStep);
        };
        validate_email(&entry.email).map_err(|_| RecoveryError::InvalidEmail)?;

        let email = std::mem::take(&mut entry.email);
        self.state = RecoveryState::AwaitingCode(CodeEntry::new(email, code));
        Ok(())
    }

    /// One second elapsed.
    ///
    /// Reaching zero sends the flow back to the email step, keeping the
    /// email, and reports [`RecoveryEvent::CodeExpired`]. No effect outside
    /// the code step.
    pub fn tick(&mut self) -> Option<RecoveryEvent> {
        let RecoveryState::AwaitingCode(entry) = &mut self.state else {
            return None;
        };
        entry.seconds_remaining = entry.seconds_remaining.saturating_sub(1);
        if entry.seconds_remaining > 0 {
            return None;
        }
        let email = std::mem::take(&mut entry.email);
        self.state = RecoveryState::AwaitingEmail(EmailEntry { email });
        Some(RecoveryEvent::CodeExpired)
    }

    /// Apply `seconds` ticks at once.
    pub fn advance(&mut self, seconds: u64) -> Option<RecoveryEvent> {
        let RecoveryState::AwaitingCode(entry) = &mut self.state else {
            return None;
        };
        if seconds == 0 {
            return None;
        }
        if seconds < u64::from(entry.seconds_remaining) {
            // Fits in u32 because it is below a u32 value.
            entry.seconds_remaining -= u32::try_from(seconds).unwrap_or(0);
            return None;
        }
        entry.seconds_remaining = 1;
        self.tick()
    }

    /// Check the typed code.
    ///
    /// # Errors
    ///
    /// `IncompleteCode` if a slot is empty, `IncorrectCode` if it does not
    /// match (state and countdown unchanged), `WrongStep` outside the code
    /// step.
    pub fn submit_code(&mut self) -> Result<(), RecoveryError> {
        let RecoveryState::AwaitingCode(entry) = &mut self.state else {
            return Err(RecoveryError::WrongStep);
        };
        let typed = entry.code().ok_or(RecoveryError::IncompleteCode)?;
        if typed != entry.expected.as_str() {
            return Err(RecoveryError::IncorrectCode);
        }
        let email = std::mem::take(&mut entry.email);
        self.state = RecoveryState::AwaitingNewPassword(PasswordEntry {
            email,
            ..PasswordEntry::default()
        });
        Ok(())
    }

    /// Confirm the new password, completing the flow.
    ///
    /// # Errors
    ///
    /// `EmptyPassword` or `PasswordMismatch` (state unchanged), `WrongStep`
    /// outside the password step.
    pub fn submit_new_password(&mut self) -> Result<RecoveryEvent, RecoveryError> {
        let RecoveryState::AwaitingNewPassword(entry) = &self.state else {
            return Err(RecoveryError::WrongStep);
        };
        if entry.new_password.is_empty() || entry.confirmation.is_empty() {
            return Err(RecoveryError::EmptyPassword);
        }
        if entry.new_password != entry.confirmation {
            return Err(RecoveryError::PasswordMismatch);
        }
        self.state = RecoveryState::LoggedOut;
        Ok(RecoveryEvent::PasswordReset)
    }

    /// Abandon the flow from any step.
    pub fn cancel(&mut self) {
        self.state = RecoveryState::LoggedOut;
    }
}

/// Render seconds as `m:ss`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
