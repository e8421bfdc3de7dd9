// Gemini-backed smart search parser and insight provider

use crate::catalog::LOCATIONS;
use crate::config::GeminiConfig;
use crate::model::{Category, Language, SearchCriteria};
use crate::search::{InsightProvider, SearchError, SearchParser};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn generate(&self, prompt: String, json_output: bool) -> Result<String, SearchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SearchError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if json_output {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiResponseError {
                status_code: status.as_u16(),
                message,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
        payload
            .first_text()
            .ok_or_else(|| SearchError::MalformedResponse("no candidate text".to_string()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize, Serialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Serialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.clone())
    }
}

// Shape the model is asked to answer with; `type` may be "all"
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCriteria {
    location: Option<String>,
    max_price: Option<f64>,
    #[serde(rename = "type")]
    category: Option<String>,
    amenities: Option<Vec<String>>,
    guests: Option<u32>,
}

impl From<RawCriteria> for SearchCriteria {
    fn from(raw: RawCriteria) -> Self {
        SearchCriteria {
            location: raw.location.filter(|l| !l.trim().is_empty()),
            // zero means "no ceiling" in model answers
            max_price: raw.max_price.filter(|p| *p > 0.0),
            category: raw.category.as_deref().and_then(Category::parse),
            amenities: raw.amenities.unwrap_or_default(),
            guests: raw.guests.filter(|g| *g > 0),
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub(crate) fn parse_criteria(text: &str) -> Result<Option<SearchCriteria>, SearchError> {
    let body = strip_code_fence(text);
    if body.is_empty() || body == "null" {
        return Ok(None);
    }
    let raw: RawCriteria =
        serde_json::from_str(body).map_err(|e| SearchError::MalformedResponse(e.to_string()))?;
    let criteria = SearchCriteria::from(raw);
    Ok((!criteria.is_empty()).then_some(criteria))
}

// Catalog locations are unaccented, so the model is told to answer with the
// catalog spelling ("Da Lat" for "Đà Lạt")
fn criteria_prompt(query: &str) -> String {
    format!(
        "Extract travel search criteria from this query: \"{query}\".\n\
         Answer with a JSON object with the optional fields \
         location (string), maxPrice (number, USD), \
         type (one of flight, hotel, train, bus, tour, car, all), \
         amenities (array of strings) and guests (integer). \
         When the location is one of {}, spell it exactly that way. \
         Leave out anything the query does not mention.",
        LOCATIONS.join(", ")
    )
}

fn insight_prompt(
    query: &str,
    count: usize,
    top_result: Option<&str>,
    language: Language,
) -> String {
    let top = top_result
        .map(|name| format!(" The top result is \"{name}\"."))
        .unwrap_or_default();
    format!(
        "A traveller searched for \"{query}\" and got {count} results.{top} \
         Write one short, friendly sentence of advice about this search. \
         Reply in the language with ISO code \"{}\".",
        language.code()
    )
}

#[async_trait]
impl SearchParser for GeminiClient {
    async fn parse(&self, query: &str) -> Result<Option<SearchCriteria>, SearchError> {
        let text = self.generate(criteria_prompt(query), true).await?;
        debug!("Gemini criteria answer: {}", text);
        parse_criteria(&text)
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn analyze(
        &self,
        query: &str,
        result_count: usize,
        top_result: Option<&str>,
        language: Language,
    ) -> Result<Option<String>, SearchError> {
        let text = self
            .generate(insight_prompt(query, result_count, top_result, language), false)
            .await?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}
