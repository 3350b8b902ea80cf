pub mod file_ops;
pub mod input;
pub mod state;

pub use state::*;
