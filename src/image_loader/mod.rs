pub mod loader;
pub mod seams;
pub mod source;

pub use loader::*;
pub use seams::*;
pub use source::*;
