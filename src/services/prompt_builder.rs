//! 提示词构建 - 业务能力层
//!
//! 把主题或文档原文嵌入一段固定的出题指令，
//! 并要求补全服务只返回 JSON 数组。

use crate::error::{AppError, AppResult};

/// 出题原文
#[derive(Debug, Clone, Copy)]
pub enum PromptSource<'a> {
    /// 教师输入的主题
    Topic(&'a str),
    /// 从上传文档中提取的文本
    Document(&'a str),
}

impl<'a> PromptSource<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            PromptSource::Topic(text) | PromptSource::Document(text) => text,
        }
    }
}

/// 提示词构建器
pub struct PromptBuilder {
    max_source_chars: usize,
}

impl PromptBuilder {
    /// 创建提示词构建器
    ///
    /// # 参数
    /// - `max_source_chars`: 原文允许的最大字符数
    pub fn new(max_source_chars: usize) -> Self {
        Self { max_source_chars }
    }

    /// 构建出题提示词
    ///
    /// 原文原样嵌入，不做截断；超过上限直接报错。
    /// 题目数量不在这里校验。
    pub fn build(&self, source: PromptSource<'_>, count: usize) -> AppResult<String> {
        let text = source.text();

        if text.trim().is_empty() {
            return Err(AppError::InvalidRequest("出题原文不能为空".to_string()));
        }

        let length = text.chars().count();
        if length > self.max_source_chars {
            return Err(AppError::PromptTooLarge {
                length,
                max: self.max_source_chars,
            });
        }

        let (subject_line, source_label) = match source {
            PromptSource::Topic(_) => (
                format!(
                    "Generate {} multiple-choice questions about the topic below.",
                    count
                ),
                "Topic",
            ),
            PromptSource::Document(_) => (
                format!(
                    "Generate {} multiple-choice questions based only on the document content below.",
                    count
                ),
                "Document content",
            ),
        };

        Ok(format!(
            r#"{subject_line}

Each question must be a JSON object with exactly these fields:
{{
  "text": "the question text",
  "options": ["option A", "option B", "option C", "option D"],
  "correct_answer": "A",
  "difficulty": "easy"
}}

Rules:
- "options" must contain exactly 4 strings, in the order they should be shown.
- "correct_answer" must be one of "A", "B", "C" or "D", matching the position of the correct option.
- "difficulty" must be one of "easy", "medium" or "hard".
- Return ONLY the JSON array of question objects. No markdown, no code fences, no explanation before or after it.

{source_label}:
"""
{text}
""""#
        ))
    }
}
