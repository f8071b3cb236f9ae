pub mod check_controller;
pub mod moderation_controller;
pub mod task_controller;
pub mod vector_controller;

pub use check_controller::CheckController;
pub use moderation_controller::ModerationController;
pub use task_controller::TaskController;
pub use vector_controller::VectorController;
