//! DeepL API client.

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::debug;

use crate::config::DeeplSettings;

/// Thin client for the DeepL v2 translate endpoint.
pub struct Translator {
    api_key: String,
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<TranslatedSegment>,
}

#[derive(Deserialize)]
struct TranslatedSegment {
    text: String,
}

impl Translator {
    pub fn new(settings: DeeplSettings) -> Self {
        Self {
            api_key: settings.api_key,
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            endpoint: settings.endpoint,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Translate `text` into `target_lang`.
    ///
    /// Returns `Ok(None)` when the response carries no translations; that is
    /// an absence, not a fault. `Err` is reserved for transport and HTTP
    /// failures. One request, no retries.
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<Option<String>> {
        if !self.is_available() {
            bail!("DeepL API key not configured");
        }

        let form = [
            ("auth_key", self.api_key.as_str()),
            ("text", text),
            ("target_lang", target_lang),
        ];

        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("DeepL API error {status}: {body}");
        }

        let body: TranslateResponse = response.json().await?;
        debug!(
            "DeepL returned {} translation segment(s)",
            body.translations.len()
        );
        Ok(first_translation(body))
    }
}

fn first_translation(response: TranslateResponse) -> Option<String> {
    response.translations.into_iter().next().map(|s| s.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_translation_picks_first_segment() {
        let response: TranslateResponse =
            serde_json::from_str(r#"{"translations": [{"text": "Hallo"}, {"text": "Welt"}]}"#)
                .unwrap();
        assert_eq!(first_translation(response), Some("Hallo".to_string()));
    }

    #[test]
    fn test_empty_translations_is_absence_not_fault() {
        let response: TranslateResponse =
            serde_json::from_str(r#"{"translations": []}"#).unwrap();
        assert_eq!(first_translation(response), None);
    }

    #[test]
    fn test_missing_translations_field_is_absence() {
        let response: TranslateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(first_translation(response), None);
    }

    #[test]
    fn test_extra_response_fields_ignored() {
        let response: TranslateResponse = serde_json::from_str(
            r#"{"translations": [{"text": "Hallo", "detected_source_language": "EN"}]}"#,
        )
        .unwrap();
        assert_eq!(first_translation(response), Some("Hallo".to_string()));
    }

    #[tokio::test]
    async fn test_translate_without_key_errors() {
        let translator = Translator::new(DeeplSettings::default());
        assert!(!translator.is_available());
        assert!(translator.translate("Hello", "DE").await.is_err());
    }
}
