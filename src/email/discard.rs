//! email.discard — drop the staged draft, if any.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::executor::{CallScope, ToolContext};
use crate::status::StatusEvent;

#[derive(Serialize)]
struct Output {
    success: bool,
    message: String,
}

pub async fn execute(ctx: ToolContext, scope: CallScope, _input: Vec<u8>) -> Result<Vec<u8>> {
    scope
        .sink
        .emit(StatusEvent::in_progress("Discarding prepared email"));

    // Clearing an already-empty slot still succeeds
    ctx.mailroom.clear(&scope.session_id).await;

    scope
        .sink
        .emit(StatusEvent::complete("Prepared email discarded"));

    serde_json::to_vec(&Output {
        success: true,
        message: "The prepared email has been discarded. Take no further action unless the \
                  user asks to prepare a new email."
            .to_string(),
    })
    .context("Failed to serialize output")
}

pub fn input_schema() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({"type": "object"})).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::staging::DraftEmail;
    use crate::executor::testing::{scope_with_sink, test_context, RecordingSink};
    use crate::status::StatusKind;
    use std::sync::Arc;

    async fn run(ctx: &crate::executor::ToolContext, sink: Arc<RecordingSink>) -> serde_json::Value {
        let scope = scope_with_sink("s1", sink);
        let raw = execute(ctx.clone(), scope, Vec::new()).await.unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_discard_clears_staged_draft() {
        let ctx = test_context();
        ctx.mailroom
            .stage(
                "s1",
                DraftEmail {
                    subject: "Hi".to_string(),
                    body: "b".to_string(),
                    recipients: "a@x.com".to_string(),
                },
            )
            .await;
        let sink = Arc::new(RecordingSink::new());

        let output = run(&ctx, sink.clone()).await;
        assert_eq!(output["success"], true);
        assert!(output["message"]
            .as_str()
            .unwrap()
            .starts_with("The prepared email has been discarded."));
        assert!(ctx.mailroom.staged("s1").await.is_none());

        let events = sink.events();
        assert_eq!(events[0].description, "Discarding prepared email");
        assert_eq!(events[0].status, StatusKind::InProgress);
        assert_eq!(events[1].description, "Prepared email discarded");
        assert!(events[1].done);
    }

    #[tokio::test]
    async fn test_discard_on_empty_slot_still_succeeds() {
        let ctx = test_context();

        for _ in 0..2 {
            let output = run(&ctx, Arc::new(RecordingSink::new())).await;
            assert_eq!(output["success"], true);
        }
        assert!(ctx.mailroom.staged("s1").await.is_none());
    }
}
