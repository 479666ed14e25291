use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{ports::Tool, AgentError};

const NAME: &str = "wiki_search";
const NO_RESULTS: &str = "No encontré resultados en Wikipedia para esa búsqueda.";

#[derive(Debug, Deserialize)]
struct TitleSearchResponse {
    pages: Vec<TitlePage>,
}

#[derive(Debug, Deserialize)]
struct TitlePage {
    key: String,
}

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: String,
}

/// Encyclopedic lookup against the Wikipedia REST API: a title search
/// followed by a page-summary fetch, truncated to a configured length.
/// Network failures surface as tool errors; no retry.
pub struct WikipediaTool {
    client: reqwest::Client,
    lang: String,
    max_chars: usize,
}

impl WikipediaTool {
    pub fn new(lang: impl Into<String>, max_chars: usize) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AgentError::configuration(e.to_string()))?;

        Ok(Self {
            client,
            lang: lang.into(),
            max_chars,
        })
    }

    async fn best_title(&self, query: &str) -> Result<Option<String>, AgentError> {
        let url = format!(
            "https://{}.wikipedia.org/w/rest.php/v1/search/title",
            self.lang
        );

        let response: TitleSearchResponse = self
            .client
            .get(&url)
            .query(&[("q", query), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?
            .error_for_status()
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?
            .json()
            .await
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?;

        Ok(response.pages.into_iter().next().map(|p| p.key))
    }

    async fn summary(&self, title: &str) -> Result<String, AgentError> {
        let url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            self.lang, title
        );

        let response: PageSummary = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?
            .error_for_status()
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?
            .json()
            .await
            .map_err(|e| AgentError::tool(NAME, e.to_string()))?;

        Ok(response.extract)
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Útil para buscar en Wikipedia hechos históricos, biografías, o información \
         enciclopédica. Devuelve un resumen."
    }

    async fn call(&self, input: &str) -> Result<String, AgentError> {
        let Some(title) = self.best_title(input).await? else {
            return Ok(NO_RESULTS.to_string());
        };

        let mut extract = self.summary(&title).await?;
        if extract.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        if let Some((boundary, _)) = extract.char_indices().nth(self.max_chars) {
            extract.truncate(boundary);
            extract.push('…');
        }

        Ok(extract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_shape_decodes() {
        let json = r#"{"pages": [{"id": 1, "key": "Lionel_Messi", "title": "Lionel Messi"}]}"#;
        let decoded: TitleSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.pages[0].key, "Lionel_Messi");
    }

    #[test]
    fn summary_missing_extract_defaults_to_empty() {
        let decoded: PageSummary = serde_json::from_str(r#"{"title": "X"}"#).unwrap();
        assert!(decoded.extract.is_empty());
    }
}
