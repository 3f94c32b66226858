//! 组卷选题 - 流程层
//!
//! 从题库题目中挑选试题：已选题目按选择顺序排列，
//! 可选题目始终是题库减去已选题目，每次查询时重新计算。
//! 题目身份只按 ID 判断。

use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::{ExamEntry, ExamPaper, PersistedQuestion};

/// 题干是否包含查询词，不区分大小写；空白查询匹配所有题目
pub fn matches_query(question: &PersistedQuestion, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || question.text.to_lowercase().contains(&needle)
}

/// 组卷选题状态
#[derive(Debug, Clone, Default)]
pub struct ExamSelection {
    pool: Vec<PersistedQuestion>,
    selected: Vec<PersistedQuestion>,
}

impl ExamSelection {
    /// 初始状态：未选任何题目
    pub fn new(pool: Vec<PersistedQuestion>) -> Self {
        Self {
            pool,
            selected: Vec::new(),
        }
    }

    /// 替换题库题目
    ///
    /// 已不在题库中的已选题目被移除，其余保持顺序和已修改的分值
    pub fn replace_pool(&mut self, pool: Vec<PersistedQuestion>) {
        let ids: HashSet<&str> = pool.iter().map(|q| q.id.as_str()).collect();
        self.selected.retain(|q| ids.contains(q.id.as_str()));
        self.pool = pool;
    }

    pub fn pool(&self) -> &[PersistedQuestion] {
        &self.pool
    }

    /// 已选题目（按选择顺序）
    pub fn selected(&self) -> &[PersistedQuestion] {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|q| q.id == id)
    }

    /// 可选题目（题库顺序）
    pub fn available(&self) -> Vec<&PersistedQuestion> {
        let selected: HashSet<&str> = self.selected.iter().map(|q| q.id.as_str()).collect();
        self.pool
            .iter()
            .filter(|q| !selected.contains(q.id.as_str()))
            .collect()
    }

    /// 按题干过滤可选题目，不区分大小写，不修改状态
    pub fn filter_available(&self, query: &str) -> Vec<&PersistedQuestion> {
        self.available()
            .into_iter()
            .filter(|q| matches_query(q, query))
            .collect()
    }

    /// 选中题目，追加到已选列表末尾
    ///
    /// 已选中的题目重复选择不做任何事
    pub fn select(&mut self, id: &str) -> AppResult<()> {
        if self.is_selected(id) {
            return Ok(());
        }

        let question = self
            .pool
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::QuestionNotFound { id: id.to_string() })?;

        self.selected.push(question.clone());
        Ok(())
    }

    /// 取消选中，题目回到可选列表
    pub fn remove(&mut self, id: &str) -> AppResult<()> {
        let position = self
            .selected
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| AppError::QuestionNotFound { id: id.to_string() })?;

        self.selected.remove(position);
        Ok(())
    }

    /// 修改已选题目的分值
    pub fn update_marks(&mut self, id: &str, marks: u32) -> AppResult<()> {
        if marks < 1 {
            return Err(AppError::InvalidMarks { marks });
        }

        let question = self
            .selected
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::QuestionNotFound { id: id.to_string() })?;

        question.marks = marks;
        Ok(())
    }

    /// 已选题目总分
    pub fn total_marks(&self) -> u32 {
        self.selected.iter().map(|q| q.marks).sum()
    }

    /// 生成试卷
    pub fn to_exam_paper(
        &self,
        title: impl Into<String>,
        teacher_id: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> ExamPaper {
        let entries = self
            .selected
            .iter()
            .enumerate()
            .map(|(i, q)| ExamEntry {
                position: i + 1,
                question_id: q.id.clone(),
                text: q.text.clone(),
                options: q.options.clone(),
                correct_answer: q.correct_answer,
                difficulty: q.difficulty,
                marks: q.marks,
            })
            .collect();

        ExamPaper {
            title: title.into(),
            subject_id: subject_id.into(),
            teacher_id: teacher_id.into(),
            total_marks: self.total_marks(),
            created_at: chrono::Utc::now().to_rfc3339(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn question(id: &str, text: &str) -> PersistedQuestion {
        PersistedQuestion {
            id: id.to_string(),
            text: text.to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
            difficulty: Difficulty::Medium,
            subject_id: "bio".to_string(),
            teacher_id: "t-1".to_string(),
            marks: 1,
            created_at: String::new(),
        }
    }

    fn pool() -> Vec<PersistedQuestion> {
        vec![
            question("1", "What is Photosynthesis?"),
            question("2", "Where does respiration happen?"),
            question("3", "Name a PHOTOSYNTHETIC pigment"),
            question("4", "What is osmosis?"),
        ]
    }

    fn ids(questions: &[&PersistedQuestion]) -> Vec<String> {
        questions.iter().map(|q| q.id.clone()).collect()
    }

    /// 已选 ∩ 可选 = ∅，已选 ∪ 可选 = 题库
    fn assert_partition(selection: &ExamSelection) {
        let selected: HashSet<&str> = selection.selected().iter().map(|q| q.id.as_str()).collect();
        let available: HashSet<&str> = selection.available().iter().map(|q| q.id.as_str()).collect();
        let all: HashSet<&str> = selection.pool().iter().map(|q| q.id.as_str()).collect();

        assert!(selected.is_disjoint(&available));
        let union: HashSet<&str> = selected.union(&available).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_initial_state() {
        let selection = ExamSelection::new(pool());
        assert!(selection.selected().is_empty());
        assert_eq!(selection.available().len(), 4);
        assert_partition(&selection);
    }

    #[test]
    fn test_select_and_remove_keep_partition() {
        let mut selection = ExamSelection::new(pool());

        selection.select("3").unwrap();
        assert_partition(&selection);
        selection.select("1").unwrap();
        assert_partition(&selection);

        // 按选择顺序排列
        let order: Vec<_> = selection.selected().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(order, vec!["3", "1"]);
        assert_eq!(ids(&selection.available()), vec!["2", "4"]);

        selection.remove("3").unwrap();
        assert_partition(&selection);
        assert_eq!(ids(&selection.available()), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_select_twice_is_noop() {
        let mut selection = ExamSelection::new(pool());
        selection.select("2").unwrap();
        selection.select("2").unwrap();
        assert_eq!(selection.selected().len(), 1);
    }

    #[test]
    fn test_unknown_ids() {
        let mut selection = ExamSelection::new(pool());
        assert!(matches!(
            selection.select("99"),
            Err(AppError::QuestionNotFound { .. })
        ));
        // 未选中的题目不能移除
        assert!(selection.remove("1").is_err());
    }

    #[test]
    fn test_membership_is_by_id() {
        let mut selection = ExamSelection::new(pool());
        selection.select("1").unwrap();
        selection.update_marks("1", 4).unwrap();

        // 分值不同，但 ID 相同，仍视为同一道题
        assert!(!ids(&selection.available()).contains(&"1".to_string()));
    }

    #[test]
    fn test_update_marks() {
        let mut selection = ExamSelection::new(pool());
        selection.select("1").unwrap();
        selection.select("2").unwrap();

        selection.update_marks("2", 5).unwrap();
        assert_eq!(selection.selected()[1].marks, 5);
        assert_eq!(selection.total_marks(), 6);

        assert!(matches!(
            selection.update_marks("2", 0),
            Err(AppError::InvalidMarks { marks: 0 })
        ));
        assert!(selection.update_marks("3", 2).is_err());
        // 题库中的原始题目不受影响
        assert_eq!(selection.pool()[1].marks, 1);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_idempotent() {
        let mut selection = ExamSelection::new(pool());
        selection.select("1").unwrap();

        let first = ids(&selection.filter_available("photosynth"));
        let second = ids(&selection.filter_available("photosynth"));
        assert_eq!(first, vec!["3"]);
        assert_eq!(first, second);

        assert_eq!(selection.filter_available("  ").len(), 3);
        assert!(selection.filter_available("mitochondria").is_empty());
        // 过滤不改变状态
        assert_eq!(selection.available().len(), 3);
    }

    #[test]
    fn test_matches_query() {
        let q = question("1", "What is Photosynthesis?");
        assert!(matches_query(&q, "PHOTO"));
        assert!(matches_query(&q, "  "));
        assert!(!matches_query(&q, "osmosis"));
    }

    #[test]
    fn test_replace_pool_drops_missing_selected() {
        let mut selection = ExamSelection::new(pool());
        selection.select("4").unwrap();
        selection.select("2").unwrap();
        selection.update_marks("2", 3).unwrap();

        let mut new_pool = pool();
        new_pool.retain(|q| q.id != "4");
        new_pool.push(question("5", "What is diffusion?"));
        selection.replace_pool(new_pool);

        assert_eq!(selection.selected().len(), 1);
        assert_eq!(selection.selected()[0].marks, 3);
        assert_eq!(ids(&selection.available()), vec!["1", "3", "5"]);
        assert_partition(&selection);
    }

    #[test]
    fn test_to_exam_paper() {
        let mut selection = ExamSelection::new(pool());
        selection.select("4").unwrap();
        selection.select("1").unwrap();
        selection.update_marks("1", 2).unwrap();

        let paper = selection.to_exam_paper("Unit test", "t-1", "bio");
        assert_eq!(paper.total_marks, 3);
        assert_eq!(paper.entries.len(), 2);
        assert_eq!(paper.entries[0].position, 1);
        assert_eq!(paper.entries[0].question_id, "4");
        assert_eq!(paper.entries[1].marks, 2);
    }
}
