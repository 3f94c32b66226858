//! # Question Forge
//!
//! 一个帮助教师用大模型生成单选题、并从题库中组卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不认识题目
//! - `CompletionClient` - 发送提示词，返回原始文本（Gemini / OpenAI 兼容）
//! - `DocumentExtractor` - 校验 PDF 并提取全文
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PromptBuilder` - 构建出题提示词
//! - `ResponseNormalizer` - 把响应文本解析为题目列表
//! - `answer_key` - 答案字母 / 下标 → 选项下标
//! - `PersistenceAdapter` - 并发写入题库
//! - `QuestionStore` - 题库存储（TOML 文件 / 内存）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次出题"和"一次组卷"
//! - `SessionContext` - 教师 + 科目 + 默认分值
//! - `GenerationFlow` - 提示词 → 补全 → 规范化 → 写入
//! - `ExamSelection` - 已选 / 可选两个互斥集合
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 持有配置和资源，分发命令
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CompletionClient, DocumentExtractor};
pub use models::{PersistedQuestion, ResolvedQuestion};
pub use orchestrator::App;
pub use services::{MemoryQuestionStore, QuestionStore, TomlQuestionStore};
pub use workflow::{ExamSelection, GenerationFlow, GenerationRequest, SessionContext};
