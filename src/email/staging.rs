//! Staged drafts — one email slot per session.
//!
//! A draft is created only by `email.prepare` and destroyed by exactly one
//! of: successful `email.send`, explicit `email.discard`, or overwrite by a
//! later `email.prepare`.

use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// An email composed but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEmail {
    pub subject: String,
    /// Stored unmodified; may contain markup. The configured signature is
    /// appended at send time, not here.
    pub body: String,
    /// Comma-joined address list, already normalized.
    pub recipients: String,
}

/// Holds zero-or-one staged draft per session key.
///
/// An empty session id is a valid key: callers that never set one share a
/// single slot, which is the single-conversation deployment.
pub struct Mailroom {
    slots: Mutex<HashMap<String, DraftEmail>>,
}

impl Mailroom {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Stage a draft, replacing any previous draft for the session without
    /// warning. Returns true when an existing draft was overwritten.
    pub async fn stage(&self, session_id: &str, draft: DraftEmail) -> bool {
        let replaced = self
            .slots
            .lock()
            .await
            .insert(session_id.to_string(), draft)
            .is_some();
        if replaced {
            debug!("Replaced staged draft for session '{session_id}'");
        }
        replaced
    }

    /// Clone the staged draft for the session, if any.
    pub async fn staged(&self, session_id: &str) -> Option<DraftEmail> {
        self.slots.lock().await.get(session_id).cloned()
    }

    /// Clear the slot. Returns true when a draft was present.
    pub async fn clear(&self, session_id: &str) -> bool {
        self.slots.lock().await.remove(session_id).is_some()
    }
}

impl Default for Mailroom {
    fn default() -> Self {
        Self::new()
    }
}

/// Undo the stringified-list artifact common in LLM-supplied recipient
/// strings: enclosing `[` `]` are stripped and every `'`/`"` removed,
/// leaving a comma-joined address string.
pub fn normalize_recipients(raw: &str) -> String {
    raw.trim_matches(|c| c == '[' || c == ']')
        .replace(['\'', '"'], "")
}
