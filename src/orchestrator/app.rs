//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 持有配置、题库和补全客户端，把命令行动作分发到流程层。
//! 所有错误原样返回，由 `main` 统一记录并提示。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{build_completion_client, CompletionClient, DocumentExtractor, DocumentUpload};
use crate::models::{save_exam_paper, ExamPaper, PersistedQuestion};
use crate::services::{QuestionStore, TomlQuestionStore};
use crate::utils::logging;
use crate::workflow::{
    matches_query, ExamSelection, GenerationFlow, GenerationPreview, GenerationReport,
    GenerationRequest, GenerationSource, SessionContext,
};

/// 出题来源
#[derive(Debug, Clone)]
pub enum GenerationInput {
    Topic(String),
    Pdf(PathBuf),
}

/// 出题结果
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// 仅预览，未写入
    Previewed(GenerationPreview),
    /// 已写入题库
    Saved(GenerationReport),
}

/// 组卷请求
#[derive(Debug, Clone)]
pub struct ExamRequest {
    pub title: String,
    pub teacher_id: String,
    pub subject_id: String,
    /// 按顺序选中的题目ID
    pub question_ids: Vec<String>,
    /// 分值修改 (题目ID, 分值)
    pub marks: Vec<(String, u32)>,
    pub output: PathBuf,
}

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<dyn QuestionStore>,
    flow: GenerationFlow,
    extractor: DocumentExtractor,
}

impl App {
    /// 按配置初始化应用
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config);

        let completion = build_completion_client(&config);
        let store: Arc<dyn QuestionStore> =
            Arc::new(TomlQuestionStore::new(&config.question_bank_file));

        Self::with_components(config, completion, store)
    }

    /// 使用指定的补全客户端和题库创建
    pub fn with_components(
        config: Config,
        completion: Arc<dyn CompletionClient>,
        store: Arc<dyn QuestionStore>,
    ) -> Self {
        let flow = GenerationFlow::new(completion, store.clone(), config.max_source_chars);
        let extractor = DocumentExtractor::new(config.max_document_bytes);

        Self {
            config,
            store,
            flow,
            extractor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 生成题目
    ///
    /// # 参数
    /// - `input`: 主题或 PDF 路径
    /// - `count`: 题目数量
    /// - `session`: 教师与科目
    /// - `dry_run`: 只预览，不写入题库
    pub async fn generate(
        &self,
        input: GenerationInput,
        count: usize,
        session: &SessionContext,
        dry_run: bool,
    ) -> AppResult<GenerationOutcome> {
        let source = match input {
            GenerationInput::Topic(topic) => GenerationSource::Topic(topic),
            GenerationInput::Pdf(path) => self.load_document(&path).await?,
        };

        let request = GenerationRequest::new(source, count)?;

        if dry_run {
            let preview = self.flow.preview(&request).await?;
            info!("💡 预览模式，未写入题库");
            return Ok(GenerationOutcome::Previewed(preview));
        }

        let report = self.flow.run(&request, session).await?;
        logging::log_generation_complete(report.requested, &report.saved);
        Ok(GenerationOutcome::Saved(report))
    }

    async fn load_document(&self, path: &Path) -> AppResult<GenerationSource> {
        let upload = DocumentUpload::from_path(path).await?;
        let file_name = upload.file_name.clone();
        let text = self.extractor.extract(upload).await?;
        Ok(GenerationSource::Document { file_name, text })
    }

    /// 列出题库题目，可按科目和题干过滤
    pub async fn list_questions(
        &self,
        subject_id: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<Vec<PersistedQuestion>> {
        let pool = self.store.list_questions(subject_id).await?;
        let query = search.unwrap_or_default();
        Ok(pool
            .into_iter()
            .filter(|q| matches_query(q, query))
            .collect())
    }

    /// 修改题目分值
    pub async fn update_marks(&self, id: &str, marks: u32) -> AppResult<PersistedQuestion> {
        let updated = self.store.update_marks(id, marks).await?;
        info!("✓ 题目 {} 分值已改为 {}", id, marks);
        Ok(updated)
    }

    /// 组卷并写入 TOML 文件
    ///
    /// 分值修改先全部作用于选题状态，试卷写入成功后才写回题库；
    /// 任何一步校验失败时题库保持不变。
    pub async fn assemble_exam(&self, request: ExamRequest) -> AppResult<ExamPaper> {
        if request.question_ids.is_empty() {
            return Err(AppError::InvalidRequest("至少需要选择一道题目".to_string()));
        }

        let pool = self
            .store
            .list_questions(Some(&request.subject_id))
            .await?;
        info!(
            "📚 科目 {} 共有 {} 道题目可选",
            request.subject_id,
            pool.len()
        );

        let mut selection = ExamSelection::new(pool);
        for id in &request.question_ids {
            selection.select(id)?;
        }
        for (id, marks) in &request.marks {
            selection.update_marks(id, *marks)?;
        }

        let paper = selection.to_exam_paper(
            request.title.as_str(),
            request.teacher_id.as_str(),
            request.subject_id.as_str(),
        );
        save_exam_paper(&request.output, &paper).await?;

        for (id, marks) in &request.marks {
            self.store.update_marks(id, *marks).await?;
        }

        logging::log_exam_assembled(
            &paper.title,
            paper.entries.len(),
            paper.total_marks,
            &request.output.display().to_string(),
        );

        Ok(paper)
    }
}
