mod archive_filter;
mod prompting;
mod read_through;
mod run_task;
mod semantic_index;
mod text;

pub use archive_filter::*;
pub use prompting::*;
pub use read_through::*;
pub use run_task::*;
pub use semantic_index::*;
pub use text::*;
