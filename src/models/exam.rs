use serde::{Deserialize, Serialize};

use crate::models::question::Difficulty;

/// 组装好的试卷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamPaper {
    pub title: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub total_marks: u32,
    pub created_at: String,
    pub entries: Vec<ExamEntry>,
}

/// 试卷中的一道题，顺序即选题顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamEntry {
    /// 题号（从1开始）
    pub position: usize,
    pub question_id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
    pub marks: u32,
}
