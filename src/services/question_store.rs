//! 题库存储 - 业务能力层
//!
//! 持久化协作方只暴露三种能力：写入一道题、列出题目、修改分值。
//! 没有批量或事务接口。

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{load_question_bank, save_question_bank, NewQuestion, PersistedQuestion};

/// 题库存储能力
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 写入一道题，返回分配了 ID 的题目
    async fn insert_question(&self, question: NewQuestion) -> AppResult<PersistedQuestion>;

    /// 列出题目，`subject_id` 为空时列出全部
    async fn list_questions(&self, subject_id: Option<&str>) -> AppResult<Vec<PersistedQuestion>>;

    /// 修改题目分值
    async fn update_marks(&self, id: &str, marks: u32) -> AppResult<PersistedQuestion>;
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn filter_subject(questions: &[PersistedQuestion], subject_id: Option<&str>) -> Vec<PersistedQuestion> {
    questions
        .iter()
        .filter(|q| subject_id.map_or(true, |s| q.subject_id == s))
        .cloned()
        .collect()
}

fn apply_marks(
    questions: &mut [PersistedQuestion],
    id: &str,
    marks: u32,
) -> AppResult<PersistedQuestion> {
    if marks < 1 {
        return Err(AppError::InvalidMarks { marks });
    }

    let question = questions
        .iter_mut()
        .find(|q| q.id == id)
        .ok_or_else(|| AppError::QuestionNotFound { id: id.to_string() })?;
    question.marks = marks;
    Ok(question.clone())
}

/// 内存题库
#[derive(Default)]
pub struct MemoryQuestionStore {
    questions: Mutex<Vec<PersistedQuestion>>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有题目创建
    pub fn with_questions(questions: Vec<PersistedQuestion>) -> Self {
        Self {
            questions: Mutex::new(questions),
        }
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn insert_question(&self, question: NewQuestion) -> AppResult<PersistedQuestion> {
        let persisted = PersistedQuestion::from_new(new_id(), question, now());
        self.questions.lock().await.push(persisted.clone());
        Ok(persisted)
    }

    async fn list_questions(&self, subject_id: Option<&str>) -> AppResult<Vec<PersistedQuestion>> {
        Ok(filter_subject(&self.questions.lock().await, subject_id))
    }

    async fn update_marks(&self, id: &str, marks: u32) -> AppResult<PersistedQuestion> {
        apply_marks(&mut self.questions.lock().await, id, marks)
    }
}

/// TOML 文件题库
///
/// 每次操作都完整读写文件；互斥锁保证并发写入不会互相覆盖。
pub struct TomlQuestionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TomlQuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl QuestionStore for TomlQuestionStore {
    async fn insert_question(&self, question: NewQuestion) -> AppResult<PersistedQuestion> {
        let _guard = self.lock.lock().await;

        let mut bank = load_question_bank(&self.path).await?;
        let persisted = PersistedQuestion::from_new(new_id(), question, now());
        bank.questions.push(persisted.clone());
        save_question_bank(&self.path, &bank).await?;

        debug!("题目已写入题库: {}", persisted.id);
        Ok(persisted)
    }

    async fn list_questions(&self, subject_id: Option<&str>) -> AppResult<Vec<PersistedQuestion>> {
        let _guard = self.lock.lock().await;
        let bank = load_question_bank(&self.path).await?;
        Ok(filter_subject(&bank.questions, subject_id))
    }

    async fn update_marks(&self, id: &str, marks: u32) -> AppResult<PersistedQuestion> {
        let _guard = self.lock.lock().await;

        let mut bank = load_question_bank(&self.path).await?;
        let updated = apply_marks(&mut bank.questions, id, marks)?;
        save_question_bank(&self.path, &bank).await?;
        Ok(updated)
    }
}
