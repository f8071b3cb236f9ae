use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::{Container, ServiceFactories, ServiceHandle};
use crate::connector::adapter::{
    FirecrawlScraper, HttpSource, InMemoryCache, LlamaClient, OpenAiClient, QdrantStore,
    RedisCache, ReportSubmitter, DEFAULT_BASE_URL, DEFAULT_FIRECRAWL_URL, DEFAULT_LLAMA_URL,
    DEFAULT_QDRANT_HOST,
};
use crate::domain::{DomainError, ServiceKey};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for every remote service and task input, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llama_url: String,
    pub qdrant_host: String,
    pub qdrant_api_key: Option<String>,
    /// `None` selects the in-memory cache.
    pub redis_host: Option<String>,
    pub redis_password: Option<String>,
    pub firecrawl_api_key: Option<String>,
    pub firecrawl_base_url: String,
    pub centrala_base_url: String,
    pub ai_devs_key: String,
    pub request_timeout: Duration,
    pub login_url: Option<String>,
    pub login_username: Option<String>,
    pub login_password: Option<String>,
    pub verify_url: Option<String>,
    pub calibration_report_url: Option<String>,
    pub interrogations_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            llama_url: DEFAULT_LLAMA_URL.to_string(),
            qdrant_host: DEFAULT_QDRANT_HOST.to_string(),
            qdrant_api_key: None,
            redis_host: None,
            redis_password: None,
            firecrawl_api_key: None,
            firecrawl_base_url: DEFAULT_FIRECRAWL_URL.to_string(),
            centrala_base_url: String::new(),
            ai_devs_key: String::new(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            login_url: None,
            login_username: None,
            login_password: None,
            verify_url: None,
            calibration_report_url: None,
            interrogations_url: None,
        }
    }
}

impl AppConfig {
    /// Reads the process environment. Unset or empty variables keep their
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let request_timeout = var("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            openai_api_key: var("OPENAI_API_KEY").unwrap_or(defaults.openai_api_key),
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llama_url: var("LOCAL_LLAMA_URL").unwrap_or(defaults.llama_url),
            qdrant_host: var("QDRANT_HOST").unwrap_or(defaults.qdrant_host),
            qdrant_api_key: var("QDRANT_API_KEY"),
            redis_host: var("REDIS_HOST"),
            redis_password: var("REDIS_PASSWORD"),
            firecrawl_api_key: var("FIRECRAWL_API_KEY"),
            firecrawl_base_url: var("FIRECRAWL_BASE_URL").unwrap_or(defaults.firecrawl_base_url),
            centrala_base_url: var("CENTRALA_BASEURL").unwrap_or(defaults.centrala_base_url),
            ai_devs_key: var("AI_DEVS_KEY").unwrap_or(defaults.ai_devs_key),
            request_timeout,
            login_url: var("S01E01_URL"),
            login_username: var("S01E01_USERNAME"),
            login_password: var("S01E01_PASSWORD"),
            verify_url: var("S01E02_URL"),
            calibration_report_url: var("S01E03_URL"),
            interrogations_url: var("S02E01_URL"),
        }
    }

    /// Grading server base URL, or a configuration error when unset.
    pub fn centrala(&self) -> Result<&str, DomainError> {
        if self.centrala_base_url.is_empty() {
            return Err(DomainError::configuration("CENTRALA_BASEURL is not set"));
        }
        Ok(self.centrala_base_url.trim_end_matches('/'))
    }

    /// Task input published under the grading server's per-key data path.
    pub fn data_url(&self, file: &str) -> Result<String, DomainError> {
        Ok(format!("{}/data/{}/{}", self.centrala()?, self.ai_devs_key, file))
    }

    pub fn report_url(&self) -> Result<String, DomainError> {
        Ok(ReportSubmitter::report_url(self.centrala()?))
    }

    pub fn calibration_report_url(&self) -> Result<String, DomainError> {
        match &self.calibration_report_url {
            Some(url) => Ok(url.clone()),
            None => self.report_url(),
        }
    }

    pub fn http_source(&self) -> Result<HttpSource, DomainError> {
        HttpSource::new(self.request_timeout)
    }
}

/// Registers a factory for every [`ServiceKey`]. Nothing is constructed until
/// first use, so a missing credential only fails the tasks that need it.
pub fn default_factories(config: &AppConfig) -> ServiceFactories {
    let openai = config.clone();
    let llama = config.clone();
    let qdrant = config.clone();
    let redis = config.clone();
    let scraper = config.clone();
    let responder = config.clone();

    ServiceFactories::new()
        .register(ServiceKey::OpenAi, move |_| {
            if openai.openai_api_key.is_empty() {
                return Err(DomainError::configuration("OPENAI_API_KEY is not set"));
            }
            debug!("Creating OpenAI client for {}", openai.openai_base_url);
            Ok(ServiceHandle::Llm(Arc::new(OpenAiClient::new(
                &openai.openai_api_key,
                &openai.openai_base_url,
                openai.request_timeout,
            )?)))
        })
        .register(ServiceKey::Llama, move |_| {
            debug!("Creating local model client for {}", llama.llama_url);
            Ok(ServiceHandle::LocalLlm(Arc::new(LlamaClient::new(
                &llama.llama_url,
                llama.request_timeout,
            )?)))
        })
        .register(ServiceKey::Qdrant, move |_| {
            debug!("Creating Qdrant store for {}", qdrant.qdrant_host);
            Ok(ServiceHandle::VectorStore(Arc::new(QdrantStore::new(
                &qdrant.qdrant_host,
                qdrant.qdrant_api_key.clone(),
                qdrant.request_timeout,
            )?)))
        })
        .register(ServiceKey::Redis, move |_| match redis.redis_host.as_deref() {
            Some(host) => Ok(ServiceHandle::Cache(Arc::new(RedisCache::new(
                host,
                redis.redis_password.as_deref(),
            )?))),
            None => {
                info!("REDIS_HOST not set, caching in memory");
                Ok(ServiceHandle::Cache(Arc::new(InMemoryCache::new())))
            }
        })
        .register(ServiceKey::Scraper, move |_| {
            let api_key = scraper
                .firecrawl_api_key
                .as_deref()
                .ok_or_else(|| DomainError::configuration("FIRECRAWL_API_KEY is not set"))?;
            Ok(ServiceHandle::Scraper(Arc::new(FirecrawlScraper::new(
                api_key,
                &scraper.firecrawl_base_url,
                scraper.request_timeout,
            )?)))
        })
        .register(ServiceKey::Responder, move |_| {
            if responder.ai_devs_key.is_empty() {
                return Err(DomainError::configuration("AI_DEVS_KEY is not set"));
            }
            let url = responder.report_url()?;
            debug!("Creating report submitter for {}", url);
            Ok(ServiceHandle::Submitter(Arc::new(ReportSubmitter::new(
                url,
                &responder.ai_devs_key,
                responder.request_timeout,
            )?)))
        })
}

/// Container wired with [`default_factories`].
pub fn build_container(config: &AppConfig) -> Container {
    Container::new(default_factories(config))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_for_missing_and_empty_values() {
        let config = config_from(&[("OPENAI_BASE_URL", ""), ("REQUEST_TIMEOUT_SECS", "abc")]);
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llama_url, DEFAULT_LLAMA_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.redis_host, None);
    }

    #[test]
    fn urls_derive_from_centrala() {
        let config = config_from(&[
            ("CENTRALA_BASEURL", "https://centrala.example/"),
            ("AI_DEVS_KEY", "k-1"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.report_url().unwrap(), "https://centrala.example/report");
        assert_eq!(
            config.calibration_report_url().unwrap(),
            "https://centrala.example/report"
        );
        assert_eq!(
            config.data_url("cenzura.txt").unwrap(),
            "https://centrala.example/data/k-1/cenzura.txt"
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_centrala_is_a_configuration_error() {
        let config = AppConfig::default();
        assert!(config.report_url().unwrap_err().is_configuration());
    }

    #[test]
    fn every_key_is_registered() {
        let factories = default_factories(&AppConfig::default());
        for key in ServiceKey::ALL {
            assert!(factories.contains(key), "{key} missing");
        }
    }

    #[test]
    fn cache_falls_back_to_memory() {
        let container = build_container(&AppConfig::default());
        assert_eq!(container.cache().unwrap().backend_name(), "memory");
    }

    #[test]
    fn missing_credentials_fail_only_their_service() {
        let container = build_container(&AppConfig::default());

        assert!(container.scraper().err().unwrap().is_configuration());
        assert!(container.llm().err().unwrap().is_configuration());
        assert!(container.local_llm().is_ok());
        assert!(container.vector_store().is_ok());
    }

    #[test]
    fn configured_responder_builds() {
        let config = config_from(&[
            ("CENTRALA_BASEURL", "https://centrala.example"),
            ("AI_DEVS_KEY", "k-1"),
        ]);
        assert!(build_container(&config).submitter().is_ok());
    }
}
