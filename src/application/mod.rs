//! # Application Layer
//!
//! Service contracts, the lazy service container, and the task runner
//! coordinating domain and connector layers.

pub mod container;
pub mod interfaces;
pub mod use_cases;

pub use container::*;
pub use interfaces::*;
pub use use_cases::*;
