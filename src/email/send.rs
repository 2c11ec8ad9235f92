//! email.send — deliver the staged draft over SMTP.
//!
//! Takes no arguments: the draft staged by `email.prepare` for this session
//! is the only input. Failures never escape as faults; they come back as a
//! `success=false` output with the draft left staged for retry.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::email::message::build_message;
use crate::executor::{CallScope, ToolContext};
use crate::status::StatusEvent;

#[derive(Serialize)]
struct Output {
    success: bool,
    message: String,
    completed_at: Option<String>,
}

pub async fn execute(ctx: ToolContext, scope: CallScope, _input: Vec<u8>) -> Result<Vec<u8>> {
    // Staged-draft check strictly precedes the credential check
    let Some(draft) = ctx.mailroom.staged(&scope.session_id).await else {
        scope
            .sink
            .emit(StatusEvent::error("Error: No email prepared"));
        return finish(Output {
            success: false,
            message: "No email has been prepared. Call the 'email.prepare' tool first."
                .to_string(),
            completed_at: None,
        });
    };

    if ctx.smtp.password.is_empty() {
        scope
            .sink
            .emit(StatusEvent::error("Error: SMTP password is not set"));
        return finish(Output {
            success: false,
            message: "SMTP password is not set. Set the ATTACHE_SMTP_PASSWORD environment \
                      variable or the [smtp] password in the config file."
                .to_string(),
            completed_at: None,
        });
    }

    let outcome: Result<()> = async {
        scope
            .sink
            .emit(StatusEvent::in_progress("Connecting to SMTP server"));
        let message = build_message(&draft, &ctx.smtp)?;
        scope.sink.emit(StatusEvent::in_progress("Sending email"));
        ctx.relay.submit(message).await?;
        Ok(())
    }
    .await;

    match outcome {
        Ok(()) => {
            let completed_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
            ctx.mailroom.clear(&scope.session_id).await;
            scope.sink.emit(StatusEvent::complete(format!(
                "Email sent successfully at {completed_at}"
            )));
            finish(Output {
                success: true,
                message: format!("Message sent successfully at {completed_at}."),
                completed_at: Some(completed_at),
            })
        }
        Err(e) => {
            // Draft stays staged so the caller may retry without re-preparing
            scope.sink.emit(StatusEvent::error(format!("Error: {e}")));
            finish(Output {
                success: false,
                message: format!("Email could not be sent: {e}"),
                completed_at: None,
            })
        }
    }
}

fn finish(output: Output) -> Result<Vec<u8>> {
    serde_json::to_vec(&output).context("Failed to serialize output")
}

pub fn input_schema() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({"type": "object"})).unwrap_or_default()
}
