//! Email staging tools — prepare, send, or discard one draft per session.
//!
//! SMTP settings come from the `[smtp]` section of the service config; the
//! password may also arrive via `ATTACHE_SMTP_PASSWORD`.

pub mod discard;
pub mod message;
pub mod prepare;
pub mod relay;
pub mod send;
pub mod staging;

use crate::registry::{make_tool, Registry};

/// Register email tools with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(make_tool(
        "email.prepare",
        "email",
        "Prepare an email for later sending. Input: {\"subject\": \"Subject line\", \"body\": \"Body text, may contain <br> markup\", \"recipients\": \"a@x.com, b@x.com\"}. Stages one draft per session until email.send or email.discard.",
        prepare::input_schema(),
        "low",
        false,
        false,
        5000,
    ));
    reg.register_tool(make_tool(
        "email.send",
        "email",
        "Send the previously prepared email via SMTP. Input: {}. Requires a draft staged with email.prepare; on failure the draft is kept so send can be retried.",
        send::input_schema(),
        "medium",
        true,
        false,
        30000,
    ));
    reg.register_tool(make_tool(
        "email.discard",
        "email",
        "Discard the previously prepared email. Input: {}. Always succeeds, even when nothing is staged.",
        discard::input_schema(),
        "low",
        false,
        true,
        5000,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_email_tools() {
        let mut reg = Registry::new();
        register_tools(&mut reg);
        assert_eq!(reg.tool_count(), 3);

        let send = reg.get_tool("email.send").unwrap();
        assert_eq!(send.namespace, "email");
        assert_eq!(send.risk_level, "medium");
        assert!(send.requires_confirmation);
        assert!(!send.input_schema.is_empty());

        let discard = reg.get_tool("email.discard").unwrap();
        assert!(discard.idempotent);
    }
}
