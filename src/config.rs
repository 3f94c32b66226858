/// 程序配置
///
/// 默认值见 [`Config::default`]，环境变量覆盖见 [`Config::from_env`]。
#[derive(Clone, Debug)]
pub struct Config {
    // --- 补全服务配置 ---
    pub completion_provider: CompletionProvider,
    /// API 密钥，缺失时在调用时报配置错误
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 题库配置 ---
    /// 题库 TOML 文件路径
    pub question_bank_file: String,
    /// 新题默认分值
    pub default_marks: u32,
    // --- 输入上限 ---
    /// 提示词中原文的最大字符数
    pub max_source_chars: usize,
    /// 上传文档的最大字节数
    pub max_document_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

/// 补全服务提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionProvider {
    /// Gemini generateContent 接口
    Gemini,
    /// 兼容 OpenAI 的 chat completion 接口
    OpenAi,
}

impl CompletionProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(CompletionProvider::Gemini),
            "openai" | "openai-compatible" => Some(CompletionProvider::OpenAi),
            _ => None,
        }
    }
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 2 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            completion_provider: CompletionProvider::Gemini,
            llm_api_key: None,
            llm_api_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            llm_model_name: "gemini-1.5-flash".to_string(),
            question_bank_file: "question_bank.toml".to_string(),
            default_marks: 1,
            max_source_chars: 60_000,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置，解析失败的值回退到默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            completion_provider: non_empty("LLM_PROVIDER").and_then(|v| CompletionProvider::from_str(&v)).unwrap_or(default.completion_provider),
            llm_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("LLM_API_KEY")),
            llm_api_base_url: non_empty("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: non_empty("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            question_bank_file: non_empty("QUESTION_BANK_FILE").unwrap_or(default.question_bank_file),
            default_marks: non_empty("DEFAULT_MARKS").and_then(|v| v.parse().ok()).filter(|m: &u32| *m >= 1).unwrap_or(default.default_marks),
            max_source_chars: non_empty("MAX_SOURCE_CHARS").and_then(|v| v.parse().ok()).unwrap_or(default.max_source_chars),
            max_document_bytes: non_empty("MAX_DOCUMENT_BYTES").and_then(|v| v.parse().ok()).unwrap_or(default.max_document_bytes),
            verbose_logging: non_empty("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}
