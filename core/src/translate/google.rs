//! Google Translate backend over the public `translate_a/single` endpoint.

use std::time::Duration;

use serde_json::Value;

use super::{TranslationError, Translator};

const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com";

/// Per-call timeout. The pipeline blocks on each request, so an unbounded
/// call would stall the whole run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct GoogleTranslator {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Point the backend at a different host. Used by tests to run against a
    /// local mock server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build translation client");
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for GoogleTranslator {
    fn name(&self) -> &'static str {
        "Google"
    }

    fn translate(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let url = format!(
            "{}/translate_a/single",
            self.endpoint.trim_end_matches('/')
        );

        let payload: Value = self
            .client
            .get(url)
            .query(&[
                ("client", "gtx"),
                ("dt", "t"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("q", text),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        parse_gtx_payload(&payload).ok_or(TranslationError::EmptyResult)
    }
}

/// The endpoint answers with nested arrays; the first element holds the
/// translated sentence segments, each as `[translated, source, ...]`.
fn parse_gtx_payload(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;

    let mut out = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(Value::as_str) {
            out.push_str(piece);
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn start_server(rt: &tokio::runtime::Runtime, template: ResponseTemplate) -> MockServer {
        rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/translate_a/single"))
                .respond_with(template)
                .mount(&server)
                .await;
            server
        })
    }

    #[test]
    fn parses_multi_segment_payload() {
        let payload = json!([
            [
                ["Острый ", "A sharp ", null],
                ["клинок", "blade", null]
            ],
            null,
            "en"
        ]);
        assert_eq!(
            parse_gtx_payload(&payload).as_deref(),
            Some("Острый клинок")
        );
    }

    #[test]
    fn empty_payload_is_none() {
        assert_eq!(parse_gtx_payload(&json!([[], null, "en"])), None);
        assert_eq!(parse_gtx_payload(&json!({})), None);
    }

    #[test]
    fn translates_against_mock_endpoint() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let template = ResponseTemplate::new(200)
            .set_body_json(json!([[["Меч", "Sword", null, null, 10]], null, "en"]));
        let server = start_server(&rt, template);

        let mut translator = GoogleTranslator::with_endpoint(server.uri());
        let out = translator.translate("Sword", "en", "ru").unwrap();
        assert_eq!(out, "Меч");
    }

    #[test]
    fn propagates_http_failures_as_errors() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = start_server(&rt, ResponseTemplate::new(503));

        let mut translator = GoogleTranslator::with_endpoint(server.uri());
        let result = translator.translate("Sword", "en", "ru");
        assert!(matches!(result, Err(TranslationError::Http(_))));
    }

    #[test]
    fn sends_language_pair_and_text() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/translate_a/single"))
                .and(query_param("sl", "en"))
                .and(query_param("tl", "ru"))
                .and(query_param("q", "Iron Sword"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    [["Железный меч", "Iron Sword", null]],
                    null,
                    "en"
                ])))
                .mount(&server)
                .await;
            server
        });

        let mut translator = GoogleTranslator::with_endpoint(server.uri());
        let out = translator.translate("Iron Sword", "en", "ru").unwrap();
        assert_eq!(out, "Железный меч");
    }
}
