pub mod answer_key;
pub mod normalizer;
pub mod persistence;
pub mod prompt_builder;
pub mod question_store;

pub use normalizer::{NormalizedResponse, ParseStrategy, ResponseNormalizer};
pub use persistence::PersistenceAdapter;
pub use prompt_builder::{PromptBuilder, PromptSource};
pub use question_store::{MemoryQuestionStore, QuestionStore, TomlQuestionStore};
