//! 答案标识解析
//!
//! 把补全服务给出的答案（下标或字母）解析为 0 起始的选项下标。
//! 无法解析时返回 [`AppError::InvalidAnswerKey`]，绝不产生越界下标。

use crate::error::{AppError, AppResult};
use crate::models::{AnswerKey, GeneratedQuestion, ResolvedQuestion};

/// 每道题的选项数量
pub const OPTION_COUNT: usize = 4;

/// 选项下标对应的字母（0 → 'A'）
///
/// 超出选项数量时返回 `None`
pub fn letter_for(index: usize) -> Option<char> {
    if index >= OPTION_COUNT {
        return None;
    }
    char::from_u32('A' as u32 + index as u32)
}

/// 解析答案标识
///
/// # 参数
/// - `key`: 答案标识
/// - `options`: 题目选项
/// - `question_index`: 题目在本批中的序号（从1开始，仅用于报错）
pub fn resolve(key: &AnswerKey, options: &[String], question_index: usize) -> AppResult<usize> {
    let invalid = || AppError::InvalidAnswerKey {
        question_index,
        designation: key.to_string(),
    };

    match key {
        AnswerKey::Index(index) => {
            let index = usize::try_from(*index).map_err(|_| invalid())?;
            if index < OPTION_COUNT && index < options.len() {
                Ok(index)
            } else {
                Err(invalid())
            }
        }
        AnswerKey::Letter(letter) => {
            let mut chars = letter.trim().chars();
            let wanted = match (chars.next(), chars.next()) {
                (Some(c), None) => c.to_ascii_uppercase(),
                _ => return Err(invalid()),
            };

            // 按位置比对字母，不比对选项内容
            options
                .iter()
                .take(OPTION_COUNT)
                .enumerate()
                .position(|(i, _)| letter_for(i) == Some(wanted))
                .ok_or_else(invalid)
        }
    }
}

/// 解析整批题目的答案
///
/// 任意一题失败则整批失败
pub fn resolve_all(questions: Vec<GeneratedQuestion>) -> AppResult<Vec<ResolvedQuestion>> {
    questions
        .into_iter()
        .enumerate()
        .map(|(i, question)| {
            let correct_answer = resolve(&question.correct_answer, &question.options, i + 1)?;
            Ok(ResolvedQuestion {
                text: question.text,
                options: question.options,
                correct_answer,
                difficulty: question.difficulty,
            })
        })
        .collect()
}
