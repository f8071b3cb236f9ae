pub mod container;
pub mod controller;
pub mod router;

pub use crate::application::Container;
pub use container::{build_container, default_factories, AppConfig, DEFAULT_REQUEST_TIMEOUT};
pub use router::Router;
