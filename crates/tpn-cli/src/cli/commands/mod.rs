//! CLI command handlers. Each command is in its own file.

mod completions;
mod countries;
mod generate;
mod save;

pub use completions::run_completions;
pub use countries::run_countries;
pub use generate::{run_generate, GenerateArgs};
pub use save::run_save;
