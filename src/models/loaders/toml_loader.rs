use crate::error::{AppError, AppResult};
use crate::models::exam::ExamPaper;
use crate::models::question::QuestionBank;
use crate::services::answer_key::OPTION_COUNT;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// 从 TOML 文件加载题库
///
/// 文件不存在时返回空题库
pub async fn load_question_bank(path: &Path) -> AppResult<QuestionBank> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("题库文件不存在，使用空题库: {}", path.display());
            return Ok(QuestionBank::default());
        }
        Err(e) => {
            return Err(AppError::persistence(
                &format!("无法读取题库文件 {}", path.display()),
                e,
            ))
        }
    };

    let bank: QuestionBank = toml::from_str(&content)
        .map_err(|e| AppError::persistence(&format!("无法解析题库文件 {}", path.display()), e))?;

    validate_bank(path, &bank)?;
    Ok(bank)
}

/// 检查每道题恰好 4 个选项，且答案下标落在选项范围内
fn validate_bank(path: &Path, bank: &QuestionBank) -> AppResult<()> {
    for question in &bank.questions {
        if question.options.len() != OPTION_COUNT {
            return Err(AppError::Persistence(format!(
                "题库文件 {} 中题目 {} 有 {} 个选项，应为 {} 个",
                path.display(),
                question.id,
                question.options.len(),
                OPTION_COUNT
            )));
        }
        if question.correct_answer >= OPTION_COUNT {
            return Err(AppError::Persistence(format!(
                "题库文件 {} 中题目 {} 的答案下标 {} 超出范围",
                path.display(),
                question.id,
                question.correct_answer
            )));
        }
    }
    Ok(())
}

/// 将题库写回 TOML 文件
pub async fn save_question_bank(path: &Path, bank: &QuestionBank) -> AppResult<()> {
    write_toml(path, bank).await
}

/// 将试卷写入 TOML 文件
pub async fn save_exam_paper(path: &Path, paper: &ExamPaper) -> AppResult<()> {
    write_toml(path, paper).await
}

/// 先写临时文件再重命名，避免写到一半的文件覆盖原内容
async fn write_toml<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let content = toml::to_string(value)
        .map_err(|e| AppError::persistence(&format!("无法序列化 {}", path.display()), e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::persistence(&format!("无法创建目录 {}", parent.display()), e))?;
    }

    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, content)
        .await
        .map_err(|e| AppError::persistence(&format!("无法写入 {}", tmp_path.display()), e))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| AppError::persistence(&format!("无法写入 {}", path.display()), e))?;

    Ok(())
}
