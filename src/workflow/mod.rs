pub mod exam_selection;
pub mod generation_flow;
pub mod session_ctx;

pub use exam_selection::{matches_query, ExamSelection};
pub use generation_flow::{
    GenerationFlow, GenerationPreview, GenerationReport, GenerationRequest, GenerationSource,
};
pub use session_ctx::SessionContext;
