//! Password recovery held in the admin session.
//!
//! The flow itself lives in `buffet_simone_core::recovery`. This module
//! stores it between requests together with the instant the countdown was
//! last brought up to date, and turns wall-clock time into the whole-second
//! ticks the flow expects.

use buffet_simone_core::recovery::{
    RecoveryEvent, RecoveryFlow, RecoveryState, VerificationCode, format_countdown,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Recovery flow plus its clock, as kept under the `recovery` session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverySession {
    flow: RecoveryFlow,
    last_tick: DateTime<Utc>,
}

impl RecoverySession {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            flow: RecoveryFlow::new(),
            last_tick: now,
        }
    }

    #[must_use]
    pub const fn flow(&self) -> &RecoveryFlow {
        &self.flow
    }

    pub const fn flow_mut(&mut self) -> &mut RecoveryFlow {
        &mut self.flow
    }

    /// Apply the whole seconds elapsed since the last update.
    ///
    /// Only the code step counts down; in any other step the clock is just
    /// moved to `now`, so the countdown starts from the moment the code was
    /// issued. Sub-second remainders carry over to the next call.
    pub fn catch_up(&mut self, now: DateTime<Utc>) -> Option<RecoveryEvent> {
        if !matches!(self.flow.state(), RecoveryState::AwaitingCode(_)) {
            self.last_tick = now;
            return None;
        }
        let elapsed = (now - self.last_tick).num_seconds();
        let Ok(seconds) = u64::try_from(elapsed) else {
            // Clock went backwards.
            self.last_tick = now;
            return None;
        };
        if seconds == 0 {
            return None;
        }
        self.last_tick += TimeDelta::seconds(elapsed);
        self.flow.advance(seconds)
    }
}

/// Hands out verification codes.
///
/// No email is sent; the code is only written to the debug log. A fixed
/// code can be configured for demos and tests.
#[derive(Debug, Clone, Default)]
pub struct CodeIssuer {
    fixed: Option<VerificationCode>,
}

impl CodeIssuer {
    #[must_use]
    pub const fn new(fixed: Option<VerificationCode>) -> Self {
        Self { fixed }
    }

    #[must_use]
    pub fn issue(&self) -> VerificationCode {
        self.fixed.clone().unwrap_or_else(VerificationCode::generate)
    }

    /// Stand-in for sending the code by email.
    pub fn deliver(&self, email: &str, code: &VerificationCode) {
        tracing::debug!(
            email,
            code = code.as_str(),
            "Recovery code issued (delivery simulated)"
        );
    }
}

/// What the recovery screen renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoveryView {
    pub step: &'static str,
    pub step_number: u8,
    pub email: String,
    /// The four code slots; empty outside the code step.
    pub digits: Vec<String>,
    pub focus: usize,
    pub seconds_remaining: u32,
    /// `m:ss`.
    pub countdown: String,
    /// The code ran out during this request.
    pub expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl RecoveryView {
    /// Render `session`, reporting `event` if one just happened.
    #[must_use]
    pub fn new(session: &RecoverySession, event: Option<RecoveryEvent>) -> Self {
        let flow = session.flow();
        let state = flow.state();
        let (email, digits, focus) = match state {
            RecoveryState::LoggedOut => (String::new(), Vec::new(), 0),
            RecoveryState::AwaitingEmail(entry) => (entry.email.clone(), Vec::new(), 0),
            RecoveryState::AwaitingCode(entry) => {
                (entry.email().to_owned(), entry.digits(), entry.focus())
            }
            RecoveryState::AwaitingNewPassword(entry) => (entry.email().to_owned(), Vec::new(), 0),
        };
        let seconds_remaining = flow.seconds_remaining();

        Self {
            step: state.name(),
            step_number: state.step_number(),
            email,
            digits,
            focus,
            seconds_remaining,
            countdown: format_countdown(seconds_remaining),
            expired: event == Some(RecoveryEvent::CodeExpired),
            message: event.map(RecoveryEvent::message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::recovery::CODE_TTL_SECS;
    use chrono::TimeZone;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn at_code_step(now: DateTime<Utc>) -> RecoverySession {
        let mut session = RecoverySession::new(now);
        session.flow_mut().start().unwrap();
        session.flow_mut().email_entry_mut().unwrap().email = "simone@buffet.com".into();
        let code = CodeIssuer::new(Some(VerificationCode::parse("2468").unwrap())).issue();
        session.flow_mut().submit_email(code).unwrap();
        session
    }

    #[test]
    fn test_countdown_follows_wall_clock() {
        let mut session = at_code_step(t0());
        assert_eq!(session.catch_up(t0() + TimeDelta::seconds(90)), None);
        assert_eq!(session.flow().seconds_remaining(), CODE_TTL_SECS - 90);

        let view = RecoveryView::new(&session, None);
        assert_eq!(view.countdown, "8:30");
        assert_eq!(view.step_number, 2);
        assert_eq!(view.digits, vec![String::new(); 4]);
    }

    #[test]
    fn test_sub_second_remainder_carries_over() {
        let mut session = at_code_step(t0());
        session.catch_up(t0() + TimeDelta::milliseconds(700));
        assert_eq!(session.flow().seconds_remaining(), CODE_TTL_SECS);
        session.catch_up(t0() + TimeDelta::milliseconds(1400));
        assert_eq!(session.flow().seconds_remaining(), CODE_TTL_SECS - 1);
    }

    #[test]
    fn test_expiry_returns_to_email_step() {
        let mut session = at_code_step(t0());
        let event = session.catch_up(t0() + TimeDelta::seconds(601));
        assert_eq!(event, Some(RecoveryEvent::CodeExpired));

        let view = RecoveryView::new(&session, event);
        assert_eq!(view.step, "awaiting_email");
        assert_eq!(view.email, "simone@buffet.com");
        assert!(view.expired);
        assert_eq!(view.message, Some("Código expirado! Solicite um novo código."));
    }

    #[test]
    fn test_time_outside_code_step_does_not_count() {
        let mut session = RecoverySession::new(t0());
        session.flow_mut().start().unwrap();
        session.flow_mut().email_entry_mut().unwrap().email = "simone@buffet.com".into();
        // An hour on the email step.
        let later = t0() + TimeDelta::hours(1);
        assert_eq!(session.catch_up(later), None);

        session
            .flow_mut()
            .submit_email(VerificationCode::parse("1111").unwrap())
            .unwrap();
        assert_eq!(session.catch_up(later + TimeDelta::seconds(5)), None);
        assert_eq!(session.flow().seconds_remaining(), CODE_TTL_SECS - 5);
    }

    #[test]
    fn test_backwards_clock_is_ignored() {
        let mut session = at_code_step(t0());
        assert_eq!(session.catch_up(t0() - TimeDelta::seconds(30)), None);
        assert_eq!(session.flow().seconds_remaining(), CODE_TTL_SECS);
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = at_code_step(t0());
        let json = serde_json::to_value(&session).unwrap();
        let back: RecoverySession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_fixed_code_issuer() {
        let issuer = CodeIssuer::new(Some(VerificationCode::parse("0007").unwrap()));
        assert_eq!(issuer.issue().as_str(), "0007");
        assert_eq!(issuer.issue().as_str(), "0007");
        assert_eq!(CodeIssuer::default().issue().as_str().len(), 4);
    }
}
