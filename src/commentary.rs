//! Post-game commentary
//!
//! One request per finished round: the final score goes to a text-generation
//! service, a short quip comes back. Every failure maps to a fixed fallback
//! line, and a missing API key short-circuits to one without any request.

use serde::{Deserialize, Serialize};

use crate::error::CommentaryError;

pub const FALLBACK_NO_KEY: &str =
    "No API key configured, so the booger lab is closed today! (Great flicking though!)";
pub const FALLBACK_NETWORK: &str = "Bad reception - the booger signal got lost in transit.";
pub const FALLBACK_EMPTY: &str = "Booger analysis complete! What a score!";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Where commentary comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl CommentaryConfig {
    /// Key baked in at build time from `GEMINI_API_KEY`
    pub fn from_build_env() -> Self {
        Self {
            api_key: option_env!("GEMINI_API_KEY")
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
            ..Self::default()
        }
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn endpoint_url(&self) -> String {
        format!("{}/{}:generateContent", ENDPOINT, self.model)
    }
}

/// Prompt for a finished round
pub fn build_prompt(score: u64) -> String {
    format!(
        "The user just finished a game called \"Booger Blaster\" where they flick boogers at bugs. \
         Their score was {score}.\n\n\
         Please provide a short, humorous, and slightly gross commentary on their performance. \
         Include a random \"Did you know?\" fact about nasal mucus or insects. \
         Keep it under 2 sentences."
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// JSON body for the generate call
pub fn request_body(score: u64) -> Result<String, CommentaryError> {
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: Some(build_prompt(score)),
            }],
        }],
        generation_config: GenerationConfig {
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        },
    };
    serde_json::to_string(&request).map_err(|e| CommentaryError::Malformed(e.to_string()))
}

/// Pull the text out of a generate response
pub fn parse_response(json: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse =
        serde_json::from_str(json).map_err(|e| CommentaryError::Malformed(e.to_string()))?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(CommentaryError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Text to show for a request outcome
pub fn resolve(result: Result<String, CommentaryError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Commentary unavailable: {}", e);
            e.fallback_text().to_string()
        }
    }
}

/// Ask the service for a quip (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_commentary(
    config: &CommentaryConfig,
    score: u64,
) -> Result<String, CommentaryError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

    let key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(CommentaryError::MissingCredential)?;
    let js_err = |e: JsValue| CommentaryError::Network(format!("{:?}", e));

    let headers = Headers::new().map_err(js_err)?;
    headers.set("Content-Type", "application/json").map_err(js_err)?;
    headers.set("x-goog-api-key", key).map_err(js_err)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&request_body(score)?));

    let request =
        Request::new_with_str_and_init(&config.endpoint_url(), &opts).map_err(js_err)?;
    let window = web_sys::window().ok_or_else(|| CommentaryError::Network("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;

    if !response.ok() {
        return Err(CommentaryError::Status(response.status()));
    }

    let body = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .ok_or_else(|| CommentaryError::Malformed("body is not text".into()))?;
    parse_response(&body)
}
