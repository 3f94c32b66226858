//! 出题会话上下文
//!
//! 封装"谁在给哪个科目出题"这一信息，由调用方显式传入流程，
//! 流程本身不读取任何全局状态。

use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// 出题会话上下文
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// 教师ID
    pub teacher_id: String,

    /// 科目ID
    pub subject_id: String,

    /// 新题默认分值
    pub default_marks: u32,
}

impl SessionContext {
    /// 创建新的会话上下文
    pub fn new(
        teacher_id: impl Into<String>,
        subject_id: impl Into<String>,
        default_marks: u32,
    ) -> AppResult<Self> {
        let teacher_id = teacher_id.into();
        let subject_id = subject_id.into();

        if teacher_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("教师ID不能为空".to_string()));
        }
        if subject_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("科目ID不能为空".to_string()));
        }
        if default_marks < 1 {
            return Err(AppError::InvalidMarks {
                marks: default_marks,
            });
        }

        Ok(Self {
            teacher_id,
            subject_id,
            default_marks,
        })
    }
}

impl Display for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[教师 #{} 科目 #{}]", self.teacher_id, self.subject_id)
    }
}
