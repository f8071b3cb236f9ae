mod answer;
mod chat;
mod media;
mod moderation;
mod service_key;
mod vector;

pub use answer::*;
pub use chat::*;
pub use media::*;
pub use moderation::*;
pub use service_key::*;
pub use vector::*;
