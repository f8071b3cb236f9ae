use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::application::{
    AnswerSubmitter, CacheStore, ChatClient, LlmProvider, PageScraper, VectorStore,
};
use crate::domain::{DomainError, ServiceKey};

/// A constructed service. Cloning shares the underlying instance.
#[derive(Clone)]
pub enum ServiceHandle {
    Llm(Arc<dyn LlmProvider>),
    LocalLlm(Arc<dyn ChatClient>),
    VectorStore(Arc<dyn VectorStore>),
    Cache(Arc<dyn CacheStore>),
    Scraper(Arc<dyn PageScraper>),
    Submitter(Arc<dyn AnswerSubmitter>),
}

impl ServiceHandle {
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceHandle::Llm(_) => "llm",
            ServiceHandle::LocalLlm(_) => "local llm",
            ServiceHandle::VectorStore(_) => "vector store",
            ServiceHandle::Cache(_) => "cache",
            ServiceHandle::Scraper(_) => "scraper",
            ServiceHandle::Submitter(_) => "submitter",
        }
    }

    /// True when both handles point at the same constructed instance.
    pub fn same_instance(&self, other: &ServiceHandle) -> bool {
        fn addr<T: ?Sized>(arc: &Arc<T>) -> *const () {
            Arc::as_ptr(arc) as *const ()
        }

        match (self, other) {
            (ServiceHandle::Llm(a), ServiceHandle::Llm(b)) => addr(a) == addr(b),
            (ServiceHandle::LocalLlm(a), ServiceHandle::LocalLlm(b)) => addr(a) == addr(b),
            (ServiceHandle::VectorStore(a), ServiceHandle::VectorStore(b)) => addr(a) == addr(b),
            (ServiceHandle::Cache(a), ServiceHandle::Cache(b)) => addr(a) == addr(b),
            (ServiceHandle::Scraper(a), ServiceHandle::Scraper(b)) => addr(a) == addr(b),
            (ServiceHandle::Submitter(a), ServiceHandle::Submitter(b)) => addr(a) == addr(b),
            _ => false,
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceHandle").field(&self.kind()).finish()
    }
}

/// Builds one service. Receives the container so it can resolve the services
/// it depends on; it must not resolve its own key.
pub type ServiceFactory =
    Box<dyn Fn(&Container) -> Result<ServiceHandle, DomainError> + Send + Sync>;

/// The factory table a [`Container`] is constructed from.
#[derive(Default)]
pub struct ServiceFactories {
    factories: HashMap<ServiceKey, ServiceFactory>,
}

impl ServiceFactories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `key`.
    pub fn register<F>(mut self, key: ServiceKey, factory: F) -> Self
    where
        F: Fn(&Container) -> Result<ServiceHandle, DomainError> + Send + Sync + 'static,
    {
        self.factories.insert(key, Box::new(factory));
        self
    }

    pub fn contains(&self, key: ServiceKey) -> bool {
        self.factories.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

struct Slot {
    factory: ServiceFactory,
    instance: OnceCell<ServiceHandle>,
}

/// Lazily constructs and memoizes one instance per registered service key.
///
/// The factory table is fixed at construction. Each key owns a once-cell, so
/// concurrent first access to the same key runs its factory exactly once
/// while other keys stay independent. A failed factory leaves the slot empty
/// and the error is returned to the caller.
pub struct Container {
    slots: HashMap<ServiceKey, Slot>,
}

impl Container {
    pub fn new(factories: ServiceFactories) -> Self {
        let slots = factories
            .factories
            .into_iter()
            .map(|(key, factory)| {
                (
                    key,
                    Slot {
                        factory,
                        instance: OnceCell::new(),
                    },
                )
            })
            .collect();

        Self { slots }
    }

    pub fn get(&self, key: ServiceKey) -> Result<ServiceHandle, DomainError> {
        let slot = self
            .slots
            .get(&key)
            .ok_or_else(|| DomainError::unknown_service(key.as_str()))?;

        slot.instance
            .get_or_try_init(|| {
                debug!("Constructing service '{}'", key);
                (slot.factory)(self)
            })
            .cloned()
    }

    pub fn get_by_name(&self, name: &str) -> Result<ServiceHandle, DomainError> {
        self.get(ServiceKey::parse(name)?)
    }

    pub fn is_registered(&self, key: ServiceKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Whether `key` has already been constructed.
    pub fn is_constructed(&self, key: ServiceKey) -> bool {
        self.slots
            .get(&key)
            .is_some_and(|slot| slot.instance.get().is_some())
    }

    pub fn llm(&self) -> Result<Arc<dyn LlmProvider>, DomainError> {
        match self.get(ServiceKey::OpenAi)? {
            ServiceHandle::Llm(service) => Ok(service),
            other => Err(mismatch(ServiceKey::OpenAi, "llm", &other)),
        }
    }

    pub fn local_llm(&self) -> Result<Arc<dyn ChatClient>, DomainError> {
        match self.get(ServiceKey::Llama)? {
            ServiceHandle::LocalLlm(service) => Ok(service),
            other => Err(mismatch(ServiceKey::Llama, "local llm", &other)),
        }
    }

    pub fn vector_store(&self) -> Result<Arc<dyn VectorStore>, DomainError> {
        match self.get(ServiceKey::Qdrant)? {
            ServiceHandle::VectorStore(service) => Ok(service),
            other => Err(mismatch(ServiceKey::Qdrant, "vector store", &other)),
        }
    }

    pub fn cache(&self) -> Result<Arc<dyn CacheStore>, DomainError> {
        match self.get(ServiceKey::Redis)? {
            ServiceHandle::Cache(service) => Ok(service),
            other => Err(mismatch(ServiceKey::Redis, "cache", &other)),
        }
    }

    pub fn scraper(&self) -> Result<Arc<dyn PageScraper>, DomainError> {
        match self.get(ServiceKey::Scraper)? {
            ServiceHandle::Scraper(service) => Ok(service),
            other => Err(mismatch(ServiceKey::Scraper, "scraper", &other)),
        }
    }

    pub fn submitter(&self) -> Result<Arc<dyn AnswerSubmitter>, DomainError> {
        match self.get(ServiceKey::Responder)? {
            ServiceHandle::Submitter(service) => Ok(service),
            other => Err(mismatch(ServiceKey::Responder, "submitter", &other)),
        }
    }
}

fn mismatch(key: ServiceKey, expected: &'static str, found: &ServiceHandle) -> DomainError {
    DomainError::ServiceMismatch {
        key: key.as_str().to_string(),
        expected,
        found: found.kind(),
    }
}
