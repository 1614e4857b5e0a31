//! CLI command handlers. Each command is in its own file.

mod checksum;
mod completions;
mod next_name;
mod send;
mod serve;
mod store;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use next_name::run_next_name;
pub use send::run_send;
pub use serve::run_serve;
pub use store::run_store;
