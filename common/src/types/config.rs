use serde::{Deserialize, Serialize};
use crate::util::distance::Distance;

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1")]
    Version1 {
        #[serde(default)]
        similarity: SimilarityConfig,
        #[serde(default)]
        server: ServerConfig,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::Version1 {
            similarity: SimilarityConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    pub fn similarity(&self) -> &SimilarityConfig {
        match self {
            Config::Version1 { similarity, .. } => similarity,
        }
    }

    pub fn server(&self) -> &ServerConfig {
        match self {
            Config::Version1 { server, .. } => server,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimilarityConfig {
    /// Origins and destinations of two trips must both be at most this far apart for the trips to
    /// be similar.
    #[serde(default = "default_threshold")]
    pub threshold: Distance,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { threshold: default_threshold() }
    }
}

fn default_threshold() -> Distance {
    Distance::DEFAULT_SIMILARITY_THRESHOLD
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: default_address() }
    }
}

fn default_address() -> String {
    "0.0.0.0:8080".into()
}
