//! Translation tools backed by the DeepL API.
//!
//! The API key comes from the `[deepl]` section of the service config or
//! the `ATTACHE_DEEPL_API_KEY` environment variable.

pub mod client;
pub mod languages;
pub mod text;

use crate::registry::{make_tool, Registry};

/// Register translation tools with the registry.
pub fn register_tools(reg: &mut Registry) {
    reg.register_tool(make_tool(
        "translate.text",
        "translate",
        "Translate text using the DeepL API. Input: {\"text\": \"Hello\", \"target_lang\": \"DE\"}. Use translate.languages for the supported target codes.",
        text::input_schema(),
        "low",
        false,
        true,
        15000,
    ));
    reg.register_tool(make_tool(
        "translate.languages",
        "translate",
        "List the language codes supported by the DeepL API. Input: {}. Static table, no network call.",
        languages::input_schema(),
        "low",
        false,
        true,
        5000,
    ));
}
