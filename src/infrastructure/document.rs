//! 文档文本提取 - 基础设施层
//!
//! 校验上传的 PDF，并用 `pdf-extract` 提取全文。
//! 按页顺序拼接，空白统一压缩为单个空格，不识别标题或表格。

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

pub const PDF_MIME_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// 上传的文档
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// 从磁盘读取文件，MIME 类型由扩展名推断
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::FileValidation(format!("无法读取文件 {}: {}", path.display(), e))
        })?;

        let mime_type = match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME_TYPE,
            _ => "application/octet-stream",
        };

        Ok(Self {
            file_name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        })
    }
}

/// 文档提取器
pub struct DocumentExtractor {
    max_bytes: usize,
}

impl DocumentExtractor {
    /// # 参数
    /// - `max_bytes`: 允许上传的最大字节数
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// 校验文件类型和大小
    pub fn validate(&self, upload: &DocumentUpload) -> AppResult<()> {
        if upload.mime_type != PDF_MIME_TYPE {
            return Err(AppError::FileValidation(format!(
                "{} 不是 PDF 文件 (类型: {})",
                upload.file_name, upload.mime_type
            )));
        }

        if upload.bytes.is_empty() {
            return Err(AppError::FileValidation(format!(
                "{} 是空文件",
                upload.file_name
            )));
        }

        if upload.bytes.len() > self.max_bytes {
            return Err(AppError::FileValidation(format!(
                "{} 大小 {} 字节，超过上限 {} 字节",
                upload.file_name,
                upload.bytes.len(),
                self.max_bytes
            )));
        }

        if !upload.bytes.starts_with(PDF_MAGIC) {
            return Err(AppError::FileValidation(format!(
                "{} 缺少 PDF 文件头",
                upload.file_name
            )));
        }

        Ok(())
    }

    /// 校验并提取文档文本
    pub async fn extract(&self, upload: DocumentUpload) -> AppResult<String> {
        self.validate(&upload)?;

        info!(
            "📄 正在提取文档文本: {} ({} 字节)",
            upload.file_name,
            upload.bytes.len()
        );

        let file_name = upload.file_name;
        let bytes = upload.bytes;

        // pdf-extract 是同步库，遇到异常文件还可能 panic
        let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::Extraction(format!("{} 提取过程异常终止: {}", file_name, e)))?
            .map_err(|e| AppError::Extraction(format!("{}: {}", file_name, e)))?;

        let text = normalize_whitespace(&raw);
        if text.is_empty() {
            warn!("文档中没有可提取的文本: {}", file_name);
            return Err(AppError::Extraction(format!(
                "{} 中没有可提取的文本（可能是扫描件）",
                file_name
            )));
        }

        debug!("提取到 {} 个字符", text.chars().count());
        Ok(text)
    }
}

/// 把所有连续空白压缩为单个空格
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
