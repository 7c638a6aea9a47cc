//! Password recovery endpoints.
//!
//! Every request loads the flow from the session, brings its countdown up to
//! date, applies one action and stores it back. If the code expired in the
//! meantime the action is skipped and the view reports `expired`.

use axum::{Json, extract::State};
use buffet_simone_core::recovery::{CodeKey, RecoveryError, RecoveryEvent};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::services::{RecoverySession, RecoveryView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CodeInputForm {
    pub index: usize,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CodeKeyForm {
    pub index: usize,
    pub key: CodeKey,
}

/// Optionally carries the whole code, filling all four slots before the check.
#[derive(Debug, Default, Deserialize)]
pub struct CodeForm {
    pub code: Option<String>,
}

#[derive(Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirmation: String,
}

impl std::fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordForm([REDACTED])")
    }
}

type ActionResult = std::result::Result<Option<RecoveryEvent>, AppError>;
type Action<'a> = Box<dyn FnOnce(&mut RecoverySession) -> ActionResult + Send + 'a>;

/// Load, catch up, act, save.
///
/// The flow is saved even when the action fails so countdown progress is
/// not lost.
async fn apply(session: &Session, action: Action<'_>) -> Result<Json<RecoveryView>> {
    let now = Utc::now();
    let mut recovery = session
        .get::<RecoverySession>(session_keys::RECOVERY)
        .await?
        .unwrap_or_else(|| RecoverySession::new(now));

    let outcome = match recovery.catch_up(now) {
        Some(expired) => {
            tracing::info!("Recovery code expired");
            Ok(Some(expired))
        }
        None => action(&mut recovery),
    };

    session.insert(session_keys::RECOVERY, &recovery).await?;
    let event = outcome?;
    Ok(Json(RecoveryView::new(&recovery, event)))
}

/// GET /admin/recovery
pub async fn show(session: Session) -> Result<Json<RecoveryView>> {
    apply(&session, Box::new(|_| Ok(None))).await
}

/// Leave the login screen for the email step.
///
/// POST /admin/recovery/start
pub async fn start(session: Session) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(|recovery| {
            recovery.flow_mut().start()?;
            Ok(None)
        }),
    )
    .await
}

/// Submit the email and send it a code.
///
/// POST /admin/recovery/email
#[instrument(skip(state, session, form))]
pub async fn email(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<EmailForm>,
) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(move |recovery| {
            let flow = recovery.flow_mut();
            let entry = flow.email_entry_mut().ok_or(RecoveryError::WrongStep)?;
            entry.email = form.email.trim().to_owned();

            let code = state.codes().issue();
            flow.submit_email(code.clone())?;
            state.codes().deliver(form.email.trim(), &code);
            Ok(None)
        }),
    )
    .await
}

/// Type into one code slot.
///
/// POST /admin/recovery/code/input
pub async fn code_input(
    session: Session,
    Json(form): Json<CodeInputForm>,
) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(move |recovery| {
            let entry = recovery
                .flow_mut()
                .code_entry_mut()
                .ok_or(RecoveryError::WrongStep)?;
            entry.input(form.index, &form.text);
            Ok(None)
        }),
    )
    .await
}

/// Key press in one code slot.
///
/// POST /admin/recovery/code/key
pub async fn code_key(
    session: Session,
    Json(form): Json<CodeKeyForm>,
) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(move |recovery| {
            let entry = recovery
                .flow_mut()
                .code_entry_mut()
                .ok_or(RecoveryError::WrongStep)?;
            entry.key_down(form.index, form.key);
            Ok(None)
        }),
    )
    .await
}

/// Check the typed code.
///
/// POST /admin/recovery/code
pub async fn code(session: Session, form: Option<Json<CodeForm>>) -> Result<Json<RecoveryView>> {
    let typed = form.and_then(|Json(form)| form.code);
    apply(
        &session,
        Box::new(move |recovery| {
            let flow = recovery.flow_mut();
            if let Some(typed) = typed {
                let entry = flow.code_entry_mut().ok_or(RecoveryError::WrongStep)?;
                for (index, digit) in typed.trim().chars().enumerate() {
                    entry.input(index, &digit.to_string());
                }
            }
            if let Err(e) = flow.submit_code() {
                tracing::warn!(error = %e, "Recovery code rejected");
                return Err(e.into());
            }
            Ok(None)
        }),
    )
    .await
}

/// Set the new password, ending the flow.
///
/// POST /admin/recovery/password
pub async fn password(
    session: Session,
    Json(form): Json<PasswordForm>,
) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(move |recovery| {
            let flow = recovery.flow_mut();
            let entry = flow.password_entry_mut().ok_or(RecoveryError::WrongStep)?;
            entry.new_password = form.new_password;
            entry.confirmation = form.confirmation;

            let event = flow.submit_new_password()?;
            // The configured pair is not changed; there is no password store.
            tracing::info!("Recovery completed");
            Ok(Some(event))
        }),
    )
    .await
}

/// Abandon the flow from any step.
///
/// POST /admin/recovery/cancel
pub async fn cancel(session: Session) -> Result<Json<RecoveryView>> {
    apply(
        &session,
        Box::new(|recovery| {
            recovery.flow_mut().cancel();
            Ok(None)
        }),
    )
    .await
}
