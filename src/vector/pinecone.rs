//! Pinecone serverless REST backend

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing::info;

use super::ScoredMatch;
use super::VectorRecord;
use super::VectorStore;
use crate::config::VectorStoreConfig;
use crate::errors::Result;
use crate::errors::SmartApplyError;

const CONTROL_PLANE: &str = "https://api.pinecone.io";

/// Pinecone index handle over the data-plane REST API
pub struct PineconeStore {
    client: Client,
    api_key: String,
    /// Data-plane host for the index, e.g. `https://idx-abc123.svc.pinecone.io`
    host: String,
}

impl PineconeStore {
    /// Connect to the configured index, creating it when absent
    ///
    /// The index is created with the given dimensionality and cosine metric
    /// on a serverless spec. An unreachable or misconfigured control plane
    /// fails here and the error propagates: the process should not come up
    /// without a working store.
    pub async fn connect(config: &VectorStoreConfig, dimension: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| SmartApplyError::Http(e.to_string()))?;

        let store = Self {
            client,
            api_key: config.api_key.clone(),
            host: String::new(),
        };

        let host = match store.describe_index(&config.index).await? {
            Some(host) => host,
            None => {
                info!(
                    "Index '{}' not found, creating ({} dims, cosine)",
                    config.index, dimension
                );
                store
                    .create_index(&config.index, dimension, &config.cloud, &config.region)
                    .await?
            }
        };

        Ok(Self { host, ..store })
    }

    async fn describe_index(&self, name: &str) -> Result<Option<String>> {
        #[derive(Deserialize)]
        struct DescribeResponse {
            host: String,
        }

        let url = format!("{CONTROL_PLANE}/indexes/{name}");
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| SmartApplyError::VectorStore(format!("Control plane error: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SmartApplyError::VectorStore(format!(
                "Describe index failed ({status}): {error_text}"
            )));
        }

        let described: DescribeResponse = response
            .json()
            .await
            .map_err(|e| SmartApplyError::VectorStore(format!("Failed to parse response: {e}")))?;
        Ok(Some(format!("https://{}", described.host)))
    }

    async fn create_index(
        &self,
        name: &str,
        dimension: usize,
        cloud: &str,
        region: &str,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct CreateResponse {
            host: String,
        }

        let body = json!({
            "name": name,
            "dimension": dimension,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": cloud,
                    "region": region,
                }
            }
        });

        let url = format!("{CONTROL_PLANE}/indexes");
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| SmartApplyError::VectorStore(format!("Control plane error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SmartApplyError::VectorStore(format!(
                "Create index failed ({status}): {error_text}"
            )));
        }

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| SmartApplyError::VectorStore(format!("Failed to parse response: {e}")))?;
        Ok(format!("https://{}", created.host))
    }
}

#[async_trait]
impl VectorStore for PineconeStore {
    async fn upsert(&self, namespace: &str, records: Vec<VectorRecord>) -> Result<()> {
        #[derive(Serialize)]
        struct UpsertRequest {
            vectors: Vec<VectorRecord>,
            namespace: String,
        }

        let url = format!("{}/vectors/upsert", self.host);
        debug!(
            "Upserting {} vectors into namespace '{}'",
            records.len(),
            namespace
        );

        let request = UpsertRequest {
            vectors: records,
            namespace: namespace.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SmartApplyError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SmartApplyError::VectorStore(format!(
                "Upsert failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    async fn query(
        &self,
        namespace: &str,
        vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<ScoredMatch>> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRequest {
            vector: Vec<f32>,
            top_k: usize,
            namespace: String,
            include_metadata: bool,
        }

        #[derive(Deserialize)]
        struct QueryResponse {
            #[serde(default)]
            matches: Vec<ScoredMatch>,
        }

        let url = format!("{}/query", self.host);
        debug!("Querying namespace '{}' with top_k={}", namespace, top_k);

        let request = QueryRequest {
            vector,
            top_k,
            namespace: namespace.to_string(),
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SmartApplyError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SmartApplyError::VectorStore(format!(
                "Query failed ({status}): {error_text}"
            )));
        }

        let result: QueryResponse = response
            .json()
            .await
            .map_err(|e| SmartApplyError::VectorStore(format!("Failed to parse response: {e}")))?;

        Ok(result.matches)
    }
}
