use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// "openai" for OpenAI-compatible batch endpoints, "ollama" for local models
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default)]
    pub api_key: String,
}

fn default_embedding_dimension() -> usize {
    crate::embeddings::DEFAULT_EMBEDDING_DIM
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub api_key: String,
    pub index: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_cloud")]
    pub cloud: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_model() -> String {
    "llama3-8b-8192".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_enable_cors() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub embeddings: EmbeddingsConfig,
    pub vector_store: VectorStoreConfig,
    pub llm: LlmConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::SmartApplyError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Secrets come from the environment when present, overriding the TOML values
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PINECONE_API_KEY") {
            self.vector_store.api_key = key;
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.llm.api_key = key;
        }
        if let Ok(key) = std::env::var("EMBEDDINGS_API_KEY") {
            self.embeddings.api_key = key;
        }
    }

    /// Fail startup when a required value is absent
    pub fn validate(&self) -> crate::Result<()> {
        if self.vector_store.index.is_empty() {
            return Err(crate::SmartApplyError::Config(
                "vector_store.index must be set".to_string(),
            ));
        }
        if self.vector_store.api_key.is_empty() {
            return Err(crate::SmartApplyError::Config(
                "vector_store.api_key must be set (or PINECONE_API_KEY exported)".to_string(),
            ));
        }
        if self.llm.api_key.is_empty() {
            return Err(crate::SmartApplyError::Config(
                "llm.api_key must be set (or GROQ_API_KEY exported)".to_string(),
            ));
        }
        if self.embeddings.provider == "openai" && self.embeddings.api_key.is_empty() {
            return Err(crate::SmartApplyError::Config(
                "embeddings.api_key must be set for the openai provider".to_string(),
            ));
        }
        Ok(())
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.endpoint
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            embeddings: EmbeddingsConfig {
                provider: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "all-minilm".to_string(),
                dimension: crate::embeddings::DEFAULT_EMBEDDING_DIM,
                api_key: String::new(),
            },
            vector_store: VectorStoreConfig {
                api_key: String::new(),
                index: "smartapply".to_string(),
                region: default_region(),
                cloud: default_cloud(),
            },
            llm: LlmConfig {
                endpoint: "https://api.groq.com/openai/v1".to_string(),
                api_key: String::new(),
                model: default_llm_model(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                enable_cors: true,
            },
        }
    }
}
