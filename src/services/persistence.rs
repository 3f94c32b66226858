//! 题目持久化适配 - 业务能力层
//!
//! 把解析好的题目转换成题库写入请求，并发提交。
//!
//! 注意：整批写入不是原子的。任意一题失败时立即返回该错误，
//! 已经写入的题目不会回滚。

use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::models::{NewQuestion, PersistedQuestion, ResolvedQuestion};
use crate::services::question_store::QuestionStore;
use crate::workflow::SessionContext;

/// 持久化适配器
pub struct PersistenceAdapter {
    store: Arc<dyn QuestionStore>,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// 构建单道题的写入请求，附加科目、教师和默认分值
    pub fn build_request(question: &ResolvedQuestion, session: &SessionContext) -> NewQuestion {
        NewQuestion {
            text: question.text.clone(),
            options: question.options.clone(),
            correct_answer: question.correct_answer,
            difficulty: question.difficulty,
            subject_id: session.subject_id.clone(),
            teacher_id: session.teacher_id.clone(),
            marks: session.default_marks,
        }
    }

    /// 并发写入全部题目
    ///
    /// 所有写入同时发起；全部成功才返回成功，返回顺序与输入一致。
    pub async fn save_all(
        &self,
        questions: &[ResolvedQuestion],
        session: &SessionContext,
    ) -> AppResult<Vec<PersistedQuestion>> {
        info!("{} 📤 正在写入 {} 道题目...", session, questions.len());

        let inserts = questions.iter().enumerate().map(|(i, question)| {
            let request = Self::build_request(question, session);
            let store = self.store.clone();
            async move {
                let saved = store.insert_question(request).await.map_err(|e| {
                    error!("第 {} 道题写入失败: {}", i + 1, e);
                    match e {
                        AppError::Persistence(_) => e,
                        other => AppError::Persistence(other.to_string()),
                    }
                })?;
                debug!("第 {} 道题写入成功: {}", i + 1, saved.id);
                Ok::<_, AppError>(saved)
            }
        });

        let saved = try_join_all(inserts).await?;
        info!("{} ✓ {} 道题目全部写入", session, saved.len());
        Ok(saved)
    }
}
