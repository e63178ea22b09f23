
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{IndexDocument, IndexStore, UpsertOutcome};
use crate::config::SearchConfig;
use crate::net::{join_segment, request_with_retry};
use crate::{IngestError, Result};

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Blocking client for a search service's index and documents REST API.
#[derive(Debug, Clone)]
pub struct SearchIndexClient {
    endpoint: Url,
    index_name: String,
    api_version: String,
    api_key: Option<String>,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct IndexSchema<'a> {
    name: &'a str,
    fields: Vec<FieldSchema>,
    #[serde(rename = "vectorSearch")]
    vector_search: VectorSearchSchema,
}

#[derive(Debug, Serialize)]
struct FieldSchema {
    name: &'static str,
    #[serde(rename = "type")]
    field_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    searchable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filterable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
    #[serde(rename = "vectorSearchProfile", skip_serializing_if = "Option::is_none")]
    vector_search_profile: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct VectorSearchSchema {
    algorithms: Vec<AlgorithmSchema>,
    profiles: Vec<ProfileSchema>,
}

#[derive(Debug, Serialize)]
struct AlgorithmSchema {
    name: &'static str,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ProfileSchema {
    name: &'static str,
    algorithm: &'static str,
}

#[derive(Debug, Serialize)]
struct UploadAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    document: &'a IndexDocument,
}

#[derive(Debug, Serialize)]
struct UploadBatch<'a> {
    value: Vec<UploadAction<'a>>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    value: Vec<UploadStatus>,
}

#[derive(Debug, Deserialize)]
struct UploadStatus {
    key: String,
    status: bool,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

impl SearchIndexClient {
    #[inline]
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS)))
            .build()
            .into();

        Ok(Self {
            endpoint,
            index_name: config.index_name.clone(),
            api_version: config.api_version.clone(),
            api_key: config.api_key.clone(),
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    fn api_url(&self, segment: &str) -> Result<Url> {
        let mut url = join_segment(&self.endpoint, segment)
            .map_err(|e| IngestError::Index(format!("invalid endpoint URL: {}", e)))?;
        url.set_query(Some(&format!("api-version={}", self.api_version)));
        Ok(url)
    }

    /// Field layout of the chunk index: provenance metadata plus one vector
    /// field sized to the embedding dimension.
    fn index_schema(&self, dimension: usize) -> IndexSchema<'_> {
        let plain = |name, field_type| FieldSchema {
            name,
            field_type,
            key: None,
            searchable: None,
            filterable: None,
            sortable: None,
            dimensions: None,
            vector_search_profile: None,
        };

        IndexSchema {
            name: &self.index_name,
            fields: vec![
                FieldSchema {
                    key: Some(true),
                    ..plain("id", "Edm.String")
                },
                FieldSchema {
                    searchable: Some(true),
                    ..plain("content", "Edm.String")
                },
                FieldSchema {
                    searchable: Some(true),
                    filterable: Some(true),
                    ..plain("title", "Edm.String")
                },
                FieldSchema {
                    filterable: Some(true),
                    ..plain("source", "Edm.String")
                },
                FieldSchema {
                    filterable: Some(true),
                    sortable: Some(true),
                    ..plain("page_number", "Edm.Int32")
                },
                FieldSchema {
                    sortable: Some(true),
                    ..plain("chunk_index", "Edm.Int32")
                },
                FieldSchema {
                    searchable: Some(true),
                    dimensions: Some(dimension),
                    vector_search_profile: Some("default-profile"),
                    ..plain("embedding", "Collection(Edm.Single)")
                },
            ],
            vector_search: VectorSearchSchema {
                algorithms: vec![AlgorithmSchema {
                    name: "default-algorithm",
                    kind: "hnsw",
                }],
                profiles: vec![ProfileSchema {
                    name: "default-profile",
                    algorithm: "default-algorithm",
                }],
            },
        }
    }

    fn send_json(
        &self,
        method: &str,
        url: &Url,
        body: &str,
    ) -> std::result::Result<String, ureq::Error> {
        let mut req = match method {
            "PUT" => self.agent.put(url.as_str()),
            _ => self.agent.post(url.as_str()),
        }
        .header("Content-Type", "application/json");

        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }

        req.send(body)
            .and_then(|mut resp| resp.body_mut().read_to_string())
    }
}

impl IndexStore for SearchIndexClient {
    #[inline]
    fn ensure_index(&mut self, dimension: usize) -> Result<()> {
        debug!(
            "Ensuring index {} exists with {} vector dimensions",
            self.index_name, dimension
        );

        let url = self.api_url(&format!("indexes/{}", self.index_name))?;
        let schema = self.index_schema(dimension);
        let body = serde_json::to_string(&schema)
            .map_err(|e| IngestError::Index(format!("failed to serialize schema: {}", e)))?;

        request_with_retry(self.retry_attempts, || self.send_json("PUT", &url, &body))
            .map_err(|e| IngestError::Index(format!("failed to create index: {}", e)))?;

        info!("Index {} ready", self.index_name);
        Ok(())
    }

    #[inline]
    fn upsert(&mut self, documents: &[IndexDocument]) -> Result<Vec<UpsertOutcome>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            "Upserting {} document(s) into index {}",
            documents.len(),
            self.index_name
        );

        let url = self.api_url(&format!("indexes/{}/docs/index", self.index_name))?;
        let batch = UploadBatch {
            value: documents
                .iter()
                .map(|document| UploadAction {
                    action: "mergeOrUpload",
                    document,
                })
                .collect(),
        };
        let body = serde_json::to_string(&batch)
            .map_err(|e| IngestError::Index(format!("failed to serialize batch: {}", e)))?;

        let response_text =
            request_with_retry(self.retry_attempts, || self.send_json("POST", &url, &body))
                .map_err(|e| IngestError::Index(format!("upload failed: {}", e)))?;

        let response: UploadResponse = serde_json::from_str(&response_text)
            .map_err(|e| IngestError::Index(format!("failed to parse upload response: {}", e)))?;

        if response.value.len() != documents.len() {
            return Err(IngestError::Index(format!(
                "expected {} upload statuses, got {}",
                documents.len(),
                response.value.len()
            )));
        }

        Ok(response
            .value
            .into_iter()
            .map(|status| UpsertOutcome {
                key: status.key,
                succeeded: status.status,
                status_code: Some(status.status_code),
            })
            .collect())
    }
}
