use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// 不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("未知难度: {}", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 答案标识：0 起始的下标，或 'A'-'D' 字母
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Index(i64),
    Letter(String),
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerKey::Index(index) => write!(f, "{}", index),
            AnswerKey::Letter(letter) => write!(f, "{}", letter),
        }
    }
}

/// 补全服务生成的题目
///
/// 只存在于一次生成请求内，答案标识尚未解析。
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: AnswerKey,
    pub difficulty: Difficulty,
}

/// 答案已解析为下标的题目，可以直接写入题库
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
}

/// 题库写入请求
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
    pub subject_id: String,
    pub teacher_id: String,
    pub marks: u32,
}

/// 题库中的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
    pub subject_id: String,
    pub teacher_id: String,
    #[serde(default = "default_marks")]
    pub marks: u32,
    #[serde(default)]
    pub created_at: String,
}

fn default_marks() -> u32 {
    1
}

impl PersistedQuestion {
    /// 由写入请求和存储层分配的 ID 构造
    pub fn from_new(id: String, question: NewQuestion, created_at: String) -> Self {
        Self {
            id,
            text: question.text,
            options: question.options,
            correct_answer: question.correct_answer,
            difficulty: question.difficulty,
            subject_id: question.subject_id,
            teacher_id: question.teacher_id,
            marks: question.marks,
            created_at,
        }
    }

    /// 正确选项的字母，下标越界时为 `None`
    pub fn answer_letter(&self) -> Option<char> {
        crate::services::answer_key::letter_for(self.correct_answer)
    }
}

impl fmt::Display for PersistedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = crate::utils::logging::truncate_text(&self.text, 80);
        write!(
            f,
            "{} [{} | {} 分 | 答案 {}]",
            preview,
            self.difficulty,
            self.marks,
            self.answer_letter().unwrap_or('?')
        )
    }
}

/// 题库文件内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<PersistedQuestion>,
}
