use crate::domain::model::ModuleInfo;
use crate::domain::ports::Catalogue;
use crate::utils::error::{PlannerError, Result};
use crate::utils::validation;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub const DEFAULT_CATALOGUE_URL: &str = "https://api.nusmods.com/v2/2023-2024";

const DEFAULT_CREDITS: u32 = 4;

#[derive(Debug, Deserialize)]
struct ModuleResponse {
    title: String,
    #[serde(default)]
    description: String,
    // arrives as a number or a string depending on the module
    #[serde(rename = "moduleCredit", default)]
    module_credit: serde_json::Value,
    #[serde(default)]
    prerequisite: Option<String>,
}

#[derive(Debug, Clone)]
struct CatalogueEntry {
    info: ModuleInfo,
    prerequisites: Vec<String>,
}

/// Pulls module-code-shaped tokens out of free prerequisite text, in order,
/// without duplicates.
fn extract_module_codes(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if validation::is_module_code(token) && !codes.iter().any(|c| c == token) {
            codes.push(token.to_string());
        }
    }
    codes
}

/// HTTP module catalogue against an NUSMods-style JSON API
/// (`GET {base}/modules/{CODE}.json`). Responses are cached per session so a
/// code is fetched at most once.
#[derive(Debug)]
pub struct RemoteCatalogue {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, CatalogueEntry>>,
}

impl RemoteCatalogue {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    async fn entry(&self, code: &str) -> Result<CatalogueEntry> {
        {
            let cache = self.cache.lock().await;
            if let Some(entry) = cache.get(code) {
                return Ok(entry.clone());
            }
        }

        let entry = self.fetch(code).await?;
        self.cache
            .lock()
            .await
            .insert(code.to_string(), entry.clone());
        Ok(entry)
    }

    async fn fetch(&self, code: &str) -> Result<CatalogueEntry> {
        let url = format!("{}/modules/{}.json", self.base_url, code);
        tracing::debug!("Fetching module info from {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PlannerError::UnknownModule(code.to_string()));
        }
        let body: ModuleResponse = response.error_for_status()?.json().await?;

        let credits = match &body.module_credit {
            serde_json::Value::Number(n) => n.as_u64().unwrap_or(DEFAULT_CREDITS as u64) as u32,
            serde_json::Value::String(s) => s.parse().unwrap_or(DEFAULT_CREDITS),
            _ => DEFAULT_CREDITS,
        };
        let prerequisites = extract_module_codes(body.prerequisite.as_deref().unwrap_or(""));

        tracing::debug!(
            "Catalogue entry for {}: {} credits, prerequisites {:?}",
            code,
            credits,
            prerequisites
        );

        Ok(CatalogueEntry {
            info: ModuleInfo {
                title: body.title,
                description: body.description,
                credits,
            },
            prerequisites,
        })
    }
}

#[async_trait]
impl Catalogue for RemoteCatalogue {
    async fn module_info(&self, code: &str) -> Result<ModuleInfo> {
        Ok(self.entry(code).await?.info)
    }

    async fn prerequisites(&self, code: &str) -> Result<Vec<String>> {
        Ok(self.entry(code).await?.prerequisites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_extract_module_codes() {
        assert_eq!(
            extract_module_codes("CS1010 MA1511"),
            vec!["CS1010", "MA1511"]
        );
        assert_eq!(
            extract_module_codes("CS1010, or CS1010E (for FoE students)"),
            vec!["CS1010", "CS1010E"]
        );
        assert_eq!(extract_module_codes("CS1010 CS1010"), vec!["CS1010"]);
        assert!(extract_module_codes("A-level Mathematics").is_empty());
        assert!(extract_module_codes("").is_empty());
    }

    #[tokio::test]
    async fn test_module_info_parses_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/modules/CS2040C.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "title": "Data Structures and Algorithms",
                    "description": "This course introduces students to...",
                    "moduleCredit": 4,
                    "prerequisite": "CS1010 or CS1010E"
                }));
        });

        let catalogue = RemoteCatalogue::new(server.url(""));

        let info = catalogue.module_info("CS2040C").await.unwrap();
        assert_eq!(info.title, "Data Structures and Algorithms");
        assert_eq!(info.credits, 4);

        let prerequisites = catalogue.prerequisites("CS2040C").await.unwrap();
        assert_eq!(prerequisites, vec!["CS1010", "CS1010E"]);

        // both calls served by the session cache after one fetch
        api_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_module_credit_as_string() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/modules/CP3880.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "title": "Advanced Technology Attachment Programme",
                    "moduleCredit": "12"
                }));
        });

        let catalogue = RemoteCatalogue::new(server.url(""));
        let info = catalogue.module_info("CP3880").await.unwrap();
        assert_eq!(info.credits, 12);
    }

    #[tokio::test]
    async fn test_unparseable_credit_defaults() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/modules/CS1010.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "title": "Programming Methodology",
                    "moduleCredit": "varies"
                }));
        });

        let catalogue = RemoteCatalogue::new(server.url(""));
        let info = catalogue.module_info("CS1010").await.unwrap();
        assert_eq!(info.credits, DEFAULT_CREDITS);
    }

    #[tokio::test]
    async fn test_unknown_module_maps_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/modules/ZZ9999.json");
            then.status(404);
        });

        let catalogue = RemoteCatalogue::new(server.url(""));
        let err = catalogue.module_info("ZZ9999").await.unwrap_err();
        assert!(matches!(err, PlannerError::UnknownModule(code) if code == "ZZ9999"));
    }

    #[tokio::test]
    async fn test_server_error_propagates_as_catalogue_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/modules/CS1010.json");
            then.status(500);
        });

        let catalogue = RemoteCatalogue::new(server.url(""));
        let err = catalogue.module_info("CS1010").await.unwrap_err();
        assert!(matches!(err, PlannerError::CatalogueError(_)));
    }
}
