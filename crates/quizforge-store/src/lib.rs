//! quizforge-store — persistence of users and generated quizzes.
//!
//! Both stores implement `UserStore` and `QuizStore` from `quizforge-core`.
//! [`MemoryStore`] keeps everything in process memory; [`JsonFileStore`]
//! additionally writes a JSON snapshot after every mutation.

mod dataset;
pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
