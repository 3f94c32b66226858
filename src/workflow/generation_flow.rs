//! 出题流程 - 流程层
//!
//! 核心职责：定义"一次出题请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建提示词（主题或文档原文）
//! 2. 调用补全服务
//! 3. 规范化响应 → 解析答案
//! 4. 并发写入题库

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::CompletionClient;
use crate::models::{PersistedQuestion, ResolvedQuestion};
use crate::services::{
    answer_key, ParseStrategy, PersistenceAdapter, PromptBuilder, PromptSource,
    QuestionStore, ResponseNormalizer,
};
use crate::utils::logging::truncate_text;
use crate::workflow::session_ctx::SessionContext;

/// 单次请求的最少题目数
pub const MIN_QUESTION_COUNT: usize = 1;
/// 单次请求的最多题目数
pub const MAX_QUESTION_COUNT: usize = 20;

/// 出题原文
#[derive(Debug, Clone)]
pub enum GenerationSource {
    /// 教师输入的主题
    Topic(String),
    /// 上传文档提取出的文本
    Document { file_name: String, text: String },
}

impl GenerationSource {
    fn as_prompt_source(&self) -> PromptSource<'_> {
        match self {
            GenerationSource::Topic(topic) => PromptSource::Topic(topic),
            GenerationSource::Document { text, .. } => PromptSource::Document(text),
        }
    }

    fn describe(&self) -> String {
        match self {
            GenerationSource::Topic(topic) => format!("主题「{}」", truncate_text(topic, 40)),
            GenerationSource::Document { file_name, .. } => format!("文档「{}」", file_name),
        }
    }
}

/// 出题请求
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source: GenerationSource,
    pub count: usize,
}

impl GenerationRequest {
    /// 创建出题请求，校验原文和数量
    pub fn new(source: GenerationSource, count: usize) -> AppResult<Self> {
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&count) {
            return Err(AppError::InvalidRequest(format!(
                "题目数量必须在 {} 到 {} 之间，实际为 {}",
                MIN_QUESTION_COUNT, MAX_QUESTION_COUNT, count
            )));
        }

        let blank = match &source {
            GenerationSource::Topic(topic) => topic.trim().is_empty(),
            GenerationSource::Document { text, .. } => text.trim().is_empty(),
        };
        if blank {
            return Err(AppError::InvalidRequest("出题原文不能为空".to_string()));
        }

        Ok(Self { source, count })
    }
}

/// 预览结果（未写入题库）
#[derive(Debug, Clone)]
pub struct GenerationPreview {
    pub questions: Vec<ResolvedQuestion>,
    pub strategy: ParseStrategy,
}

/// 出题结果
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub requested: usize,
    pub strategy: ParseStrategy,
    pub saved: Vec<PersistedQuestion>,
}

/// 出题流程
///
/// - 编排提示词 → 补全 → 规范化 → 写入
/// - 不持有会话状态，会话由调用方传入
pub struct GenerationFlow {
    completion: Arc<dyn CompletionClient>,
    prompt_builder: PromptBuilder,
    normalizer: ResponseNormalizer,
    persistence: PersistenceAdapter,
}

impl GenerationFlow {
    /// 创建新的出题流程
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        store: Arc<dyn QuestionStore>,
        max_source_chars: usize,
    ) -> Self {
        Self {
            completion,
            prompt_builder: PromptBuilder::new(max_source_chars),
            normalizer: ResponseNormalizer::new(),
            persistence: PersistenceAdapter::new(store),
        }
    }

    /// 生成题目但不写入题库
    pub async fn preview(&self, request: &GenerationRequest) -> AppResult<GenerationPreview> {
        info!(
            "🤖 根据{}生成 {} 道题目 (模型: {})",
            request.source.describe(),
            request.count,
            self.completion.model_name()
        );

        let prompt = self
            .prompt_builder
            .build(request.source.as_prompt_source(), request.count)?;

        let raw = self.completion.complete(&prompt).await?;
        let normalized = self.normalizer.normalize(&raw)?;

        if normalized.questions.is_empty() {
            return Err(AppError::EmptyResponse {
                model: self.completion.model_name().to_string(),
            });
        }

        if normalized.questions.len() != request.count {
            warn!(
                "⚠️ 请求 {} 道题目，补全服务返回了 {} 道",
                request.count,
                normalized.questions.len()
            );
        }

        let questions = answer_key::resolve_all(normalized.questions)?;
        info!("✓ 解析出 {} 道题目", questions.len());

        Ok(GenerationPreview {
            questions,
            strategy: normalized.strategy,
        })
    }

    /// 生成题目并写入题库
    ///
    /// 补全或解析失败时不会写入任何题目；
    /// 写入阶段失败时，已写入的题目保留在题库中。
    pub async fn run(
        &self,
        request: &GenerationRequest,
        session: &SessionContext,
    ) -> AppResult<GenerationReport> {
        let preview = self.preview(request).await?;

        let saved = self
            .persistence
            .save_all(&preview.questions, session)
            .await?;

        Ok(GenerationReport {
            requested: request.count,
            strategy: preview.strategy,
            saved,
        })
    }
}
