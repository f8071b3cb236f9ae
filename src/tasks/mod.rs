//! # Tasks
//!
//! One [`crate::application::Task`] per graded exercise. Each builds its
//! inputs from [`crate::connector::AppConfig`] and resolves services from the
//! container only when solved.

mod arxiv;
mod calibration;
mod categories;
mod censor;
mod html;
mod interrogations;
mod keywords;
mod login;
mod robot_image;
mod verify;

pub use arxiv::*;
pub use calibration::*;
pub use categories::*;
pub use censor::*;
pub use interrogations::*;
pub use keywords::*;
pub use login::*;
pub use robot_image::*;
pub use verify::*;
