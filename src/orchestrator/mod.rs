//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (命令分发)
//!     ↓
//! workflow::GenerationFlow / ExamSelection (单次出题 / 组卷)
//!     ↓
//! services (能力层：提示词 / 规范化 / 答案解析 / 持久化)
//!     ↓
//! infrastructure (基础设施：补全客户端 / PDF 提取)
//! ```

pub mod app;

pub use app::{App, ExamRequest, GenerationInput, GenerationOutcome};
