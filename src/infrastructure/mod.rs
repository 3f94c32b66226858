pub mod completion;
pub mod document;

pub use completion::{build_completion_client, CompletionClient, GeminiClient, OpenAiCompatClient};
pub use document::{DocumentExtractor, DocumentUpload};
