/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use crate::models::PersistedQuestion;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 出题工具启动");
    info!(
        "🤖 补全服务: {:?} / {}",
        config.completion_provider, config.llm_model_name
    );
    info!("📚 题库文件: {}", config.question_bank_file);
    info!("{}", "=".repeat(60));
}

/// 记录生成完成信息
///
/// # 参数
/// - `requested`: 请求的题目数量
/// - `questions`: 已写入题库的题目
pub fn log_generation_complete(requested: usize, questions: &[PersistedQuestion]) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 生成完成: 写入 {}/{} 道题目", questions.len(), requested);
    for question in questions {
        info!(
            "  [{}] {} ({} 分)",
            question.id,
            truncate_text(&question.text, 60),
            question.marks
        );
    }
    info!("{}", "─".repeat(60));
}

/// 记录组卷完成信息
pub fn log_exam_assembled(title: &str, question_count: usize, total_marks: u32, output: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📝 试卷组装完成: {}", title);
    info!("题目数量: {}，总分: {}", question_count, total_marks);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("已保存至: {}", output);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
