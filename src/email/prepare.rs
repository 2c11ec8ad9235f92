//! email.prepare — stage a draft for a later `email.send`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::email::staging::{normalize_recipients, DraftEmail};
use crate::executor::{CallScope, ToolContext};
use crate::status::StatusEvent;

#[derive(Deserialize)]
struct Input {
    /// Subject line
    subject: String,
    /// Body text; may contain markup such as `<br>`
    body: String,
    /// Recipient address(es), comma-separated if multiple
    recipients: String,
}

#[derive(Serialize)]
struct Output {
    success: bool,
    message: String,
    recipients: String,
}

pub async fn execute(ctx: ToolContext, scope: CallScope, input: Vec<u8>) -> Result<Vec<u8>> {
    let input: Input = serde_json::from_slice(&input).context("Invalid JSON input")?;

    scope.sink.emit(StatusEvent::in_progress("Preparing email"));

    let recipients = normalize_recipients(&input.recipients);
    let draft = DraftEmail {
        subject: input.subject.clone(),
        body: input.body.clone(),
        recipients: recipients.clone(),
    };
    ctx.mailroom.stage(&scope.session_id, draft).await;

    scope.sink.emit(StatusEvent::complete("Email prepared"));

    let message = format!(
        "Email prepared for sending:\n\
         TO: {recipients}\n\
         SUBJECT: {subject}\n\
         BODY: {body}\n\
         \n\
         Signature will be automatically appended.\n\
         \n\
         Present the prepared email to the user, ask them to review its details, \
         and confirm whether to send it to the recipients.\n\
         To send the email, call the 'email.send' tool.\n\
         To discard this email and start over, call the 'email.discard' tool.",
        subject = input.subject,
        body = input.body,
    );

    serde_json::to_vec(&Output {
        success: true,
        message,
        recipients,
    })
    .context("Failed to serialize output")
}

pub fn input_schema() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "type": "object",
        "properties": {
            "subject": {"type": "string"},
            "body": {"type": "string"},
            "recipients": {"type": "string"}
        },
        "required": ["subject", "body", "recipients"]
    }))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::testing::{scope_with_sink, test_context, RecordingSink};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_prepare_stages_normalized_draft() {
        let ctx = test_context();
        let sink = Arc::new(RecordingSink::new());
        let scope = scope_with_sink("s1", sink.clone());

        let input = serde_json::to_vec(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello<br>World",
            "recipients": "['a@x.com', 'b@x.com']"
        }))
        .unwrap();

        let raw = execute(ctx.clone(), scope, input).await.unwrap();
        let output: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(output["success"], true);
        assert_eq!(output["recipients"], "a@x.com, b@x.com");

        let staged = ctx.mailroom.staged("s1").await.unwrap();
        assert_eq!(staged.subject, "Hi");
        assert_eq!(staged.body, "Hello<br>World");
        assert_eq!(staged.recipients, "a@x.com, b@x.com");

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "Preparing email");
        assert!(!events[0].done);
        assert_eq!(events[1].description, "Email prepared");
        assert!(events[1].done);
    }

    #[tokio::test]
    async fn test_prepare_result_names_the_follow_ups() {
        let ctx = test_context();
        let scope = scope_with_sink("s1", Arc::new(RecordingSink::new()));

        let input = serde_json::to_vec(&serde_json::json!({
            "subject": "Hi",
            "body": "Hello",
            "recipients": "a@x.com"
        }))
        .unwrap();

        let raw = execute(ctx, scope, input).await.unwrap();
        let output: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        let message = output["message"].as_str().unwrap();
        assert!(message.contains("TO: a@x.com"));
        assert!(message.contains("SUBJECT: Hi"));
        assert!(message.contains("BODY: Hello"));
        assert!(message.contains("Signature will be automatically appended"));
        assert!(message.contains("'email.send'"));
        assert!(message.contains("'email.discard'"));
    }

    #[tokio::test]
    async fn test_prepare_overwrites_previous_draft() {
        let ctx = test_context();

        for subject in ["First", "Second"] {
            let input = serde_json::to_vec(&serde_json::json!({
                "subject": subject,
                "body": "b",
                "recipients": "a@x.com"
            }))
            .unwrap();
            let scope = scope_with_sink("s1", Arc::new(RecordingSink::new()));
            execute(ctx.clone(), scope, input).await.unwrap();
        }

        assert_eq!(ctx.mailroom.staged("s1").await.unwrap().subject, "Second");
    }

    #[tokio::test]
    async fn test_prepare_rejects_bad_input() {
        let ctx = test_context();
        let scope = scope_with_sink("s1", Arc::new(RecordingSink::new()));
        let result = execute(ctx, scope, b"not json".to_vec()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_input_schema_is_valid_json() {
        let schema: serde_json::Value = serde_json::from_slice(&input_schema()).unwrap();
        assert_eq!(schema["required"][0], "subject");
    }
}
