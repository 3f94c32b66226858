//! 错误类型
//!
//! 出题流程中所有可能失败的环节都归到 [`AppError`] 下，
//! 由调用方（CLI）统一捕获并提示给用户。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（例如缺少 API 密钥）
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 补全服务返回非成功状态，或请求根本没有发出去
    #[error("补全服务调用失败 ({}): {body}", describe_status(.status))]
    Service { status: Option<u16>, body: String },

    /// 响应结构正常，但没有任何候选内容
    #[error("补全服务返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },

    /// 响应无法解析为题目数组
    #[error("无法解析补全服务的响应: {reason}")]
    MalformedResponse { reason: String },

    /// 答案标识无法对应到任何选项
    #[error("第 {question_index} 道题的答案标识 '{designation}' 无效")]
    InvalidAnswerKey {
        question_index: usize,
        designation: String,
    },

    /// 上传文件校验失败（类型或大小）
    #[error("文件校验失败: {0}")]
    FileValidation(String),

    /// 文档文本提取失败
    #[error("文档文本提取失败: {0}")]
    Extraction(String),

    /// 题库写入失败
    #[error("题库操作失败: {0}")]
    Persistence(String),

    /// 提示词原文超出预算
    #[error("原文长度 {length} 个字符，超过上限 {max}")]
    PromptTooLarge { length: usize, max: usize },

    /// 请求参数不合法
    #[error("请求参数无效: {0}")]
    InvalidRequest(String),

    /// 分值不合法
    #[error("分值必须至少为 1，实际为 {marks}")]
    InvalidMarks { marks: u32 },

    /// 找不到题目
    #[error("题目不存在: {id}")]
    QuestionNotFound { id: String },
}

fn describe_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {}", code),
        None => "无响应".to_string(),
    }
}

impl AppError {
    /// 错误类别标签，用于日志字段
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "configuration",
            AppError::Service { .. } => "service",
            AppError::EmptyResponse { .. } => "empty_response",
            AppError::MalformedResponse { .. } => "malformed_response",
            AppError::InvalidAnswerKey { .. } => "invalid_answer_key",
            AppError::FileValidation(_) => "file_validation",
            AppError::Extraction(_) => "extraction",
            AppError::Persistence(_) => "persistence",
            AppError::PromptTooLarge { .. } => "prompt_too_large",
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::InvalidMarks { .. } => "invalid_marks",
            AppError::QuestionNotFound { .. } => "question_not_found",
        }
    }

    // ========== 便捷构造函数 ==========

    /// 创建响应解析错误
    pub fn malformed(reason: impl Into<String>) -> Self {
        AppError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// 创建题库操作错误
    pub fn persistence(context: &str, source: impl std::fmt::Display) -> Self {
        AppError::Persistence(format!("{}: {}", context, source))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
