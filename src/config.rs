use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    pub embedding_model: String,
    pub chat_model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    #[serde(default = "default_frontend_root")]
    pub root: PathBuf,
    #[serde(default = "default_frontend_bind")]
    pub bind: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            root: default_frontend_root(),
            bind: default_frontend_bind(),
        }
    }
}

fn default_frontend_root() -> PathBuf {
    PathBuf::from("./frontend")
}
fn default_frontend_bind() -> String {
    "127.0.0.1:8080".to_string()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.dataset.path.as_os_str().is_empty() {
        anyhow::bail!("dataset.path must not be empty");
    }

    if config.ollama.embedding_model.trim().is_empty() {
        anyhow::bail!("ollama.embedding_model must not be empty");
    }

    if config.ollama.chat_model.trim().is_empty() {
        anyhow::bail!("ollama.chat_model must not be empty");
    }

    if config.retrieval.top_n < 1 {
        anyhow::bail!("retrieval.top_n must be >= 1");
    }

    Ok(config)
}
