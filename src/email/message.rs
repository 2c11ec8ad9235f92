//! MIME assembly for staged drafts.
//!
//! Bodies are authored with light markup (`<br>` line breaks, HTML
//! entities). The wire message carries two alternatives: a plain-text
//! downgrade first, then the markup form, so minimal readers show the
//! plain part.

use anyhow::{bail, Context, Result};
use lettre::message::{Mailbox, MultiPart};
use lettre::Message;

use crate::config::SmtpSettings;
use crate::email::staging::DraftEmail;

/// Decode the entity set that shows up in model-authored bodies.
pub fn decode_entities(text: &str) -> String {
    // `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Turn a markup body into its plain-text alternative.
pub fn downgrade_markup(markup: &str) -> String {
    let text = markup
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n");
    decode_entities(&text)
}

/// Produce the `(plain, markup)` alternative pair for a body, appending
/// the configured signature when one is set. The signature join is
/// `<br><br>` in markup, which downgrades to a blank line in plain text.
pub fn render_alternatives(body: &str, signature: &str) -> (String, String) {
    let markup = if signature.is_empty() {
        body.to_string()
    } else {
        format!("{body}<br><br>{signature}")
    };
    let plain = downgrade_markup(&markup);
    (plain, markup)
}

/// Assemble the full MIME message for a draft.
pub fn build_message(draft: &DraftEmail, smtp: &SmtpSettings) -> Result<Message> {
    let from = Mailbox::new(
        Some(smtp.from_name.clone()),
        smtp.from_address.parse().context("Invalid from address")?,
    );

    let mut builder = Message::builder().from(from).subject(&draft.subject);

    let mut recipients = 0;
    for address in draft.recipients.split(',') {
        let address = address.trim();
        if address.is_empty() {
            continue;
        }
        let mailbox: Mailbox = address
            .parse()
            .with_context(|| format!("Invalid recipient address '{address}'"))?;
        builder = builder.to(mailbox);
        recipients += 1;
    }
    if recipients == 0 {
        bail!("No recipient addresses given");
    }

    let (plain, markup) = render_alternatives(&draft.body, &smtp.signature);
    builder
        .multipart(MultiPart::alternative_plain_html(plain, markup))
        .context("Failed to assemble MIME message")
}
