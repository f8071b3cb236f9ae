//! # Domain Layer
//!
//! Wire-independent models shared by every capability client, plus the
//! error taxonomy. Nothing here performs I/O.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
