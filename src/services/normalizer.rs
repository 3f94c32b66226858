//! 响应规范化 - 业务能力层
//!
//! 把补全服务返回的文本解析为题目列表。
//! 服务被要求只返回 JSON 数组，但并不总是照做，
//! 所以直接解析失败时会退而截取第一个 `[` 到最后一个 `]` 之间的内容。

use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AnswerKey, Difficulty, GeneratedQuestion};
use crate::services::answer_key::OPTION_COUNT;
use crate::utils::logging::truncate_text;

/// 解析成功时使用的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// 整段文本就是 JSON
    Direct,
    /// 从说明文字中截取出的方括号片段
    BracketExtracted,
}

/// 规范化结果
#[derive(Debug, Clone)]
pub struct NormalizedResponse {
    pub questions: Vec<GeneratedQuestion>,
    pub strategy: ParseStrategy,
}

/// 补全服务返回的单个题目，字段尚未校验
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(alias = "question")]
    text: String,
    options: Vec<String>,
    #[serde(alias = "answer", alias = "correctAnswer")]
    correct_answer: AnswerKey,
    #[serde(default)]
    difficulty: Option<String>,
}

/// 响应规范化器
pub struct ResponseNormalizer {
    bracket_span: Regex,
}

impl ResponseNormalizer {
    pub fn new() -> Self {
        Self {
            // 贪婪匹配：第一个 [ 到最后一个 ]
            bracket_span: Regex::new(r"(?s)\[.*\]").expect("静态正则表达式"),
        }
    }

    /// 解析补全服务的原始响应
    pub fn normalize(&self, raw: &str) -> AppResult<NormalizedResponse> {
        let (value, strategy) = self.parse_json(raw)?;

        let items = match value {
            JsonValue::Array(items) => items,
            other => {
                return Err(AppError::malformed(format!(
                    "期望 JSON 数组，实际为 {}",
                    json_kind(&other)
                )))
            }
        };

        let questions = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| validate_item(item, i + 1))
            .collect::<AppResult<Vec<_>>>()?;

        debug!(
            "解析出 {} 道题目 (策略: {:?})",
            questions.len(),
            strategy
        );

        Ok(NormalizedResponse {
            questions,
            strategy,
        })
    }

    fn parse_json(&self, raw: &str) -> AppResult<(JsonValue, ParseStrategy)> {
        if let Ok(value) = serde_json::from_str::<JsonValue>(raw) {
            return Ok((value, ParseStrategy::Direct));
        }

        warn!(
            "响应不是纯 JSON，尝试截取方括号内容: {}",
            truncate_text(raw, 80)
        );

        let span = self
            .bracket_span
            .find(raw)
            .ok_or_else(|| AppError::malformed("响应中找不到 JSON 数组"))?;

        serde_json::from_str::<JsonValue>(span.as_str())
            .map(|value| (value, ParseStrategy::BracketExtracted))
            .map_err(|e| AppError::malformed(format!("截取的内容不是合法 JSON: {}", e)))
    }
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// 校验单个题目
fn validate_item(item: JsonValue, position: usize) -> AppResult<GeneratedQuestion> {
    let raw: RawQuestion = serde_json::from_value(item)
        .map_err(|e| AppError::malformed(format!("第 {} 道题格式错误: {}", position, e)))?;

    let text = raw.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::malformed(format!("第 {} 道题题干为空", position)));
    }

    if raw.options.len() != OPTION_COUNT {
        return Err(AppError::malformed(format!(
            "第 {} 道题应有 {} 个选项，实际 {} 个",
            position,
            OPTION_COUNT,
            raw.options.len()
        )));
    }

    let difficulty = match raw.difficulty.as_deref() {
        None => Difficulty::default(),
        Some(label) => label
            .parse::<Difficulty>()
            .map_err(|e| AppError::malformed(format!("第 {} 道题: {}", position, e)))?,
    };

    Ok(GeneratedQuestion {
        text,
        options: raw.options.into_iter().map(|o| o.trim().to_string()).collect(),
        correct_answer: raw.correct_answer,
        difficulty,
    })
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "布尔值",
        JsonValue::Number(_) => "数字",
        JsonValue::String(_) => "字符串",
        JsonValue::Array(_) => "数组",
        JsonValue::Object(_) => "对象",
    }
}
