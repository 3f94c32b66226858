//! 补全服务客户端 - 基础设施层
//!
//! 只暴露"发送提示词、拿回原始文本"的能力，不认识题目。
//!
//! ## 技术栈
//! - Gemini generateContent 接口：`reqwest` 直接调用
//! - 兼容 OpenAI 的服务：`async-openai` crate
//!
//! 两种实现都只发一次请求，不重试，不设置额外超时。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{CompletionProvider, Config, DEFAULT_GEMINI_BASE_URL};
use crate::error::{AppError, AppResult};

/// 补全服务能力
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// 发送提示词，返回完整的响应文本
    async fn complete(&self, prompt: &str) -> AppResult<String>;

    /// 模型名称（用于日志和报错）
    fn model_name(&self) -> &str;
}

/// 按配置创建补全客户端
pub fn build_completion_client(config: &Config) -> Arc<dyn CompletionClient> {
    match config.completion_provider {
        CompletionProvider::Gemini => Arc::new(GeminiClient::new(config)),
        CompletionProvider::OpenAi => Arc::new(OpenAiCompatClient::new(config)),
    }
}

fn missing_key() -> AppError {
    AppError::Configuration("未设置补全服务的 API 密钥 (GEMINI_API_KEY 或 LLM_API_KEY)".to_string())
}

// ========== Gemini ==========

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        // 缺少密钥时不发任何请求
        let api_key = self.api_key.as_deref().ok_or_else(missing_key)?;

        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "response_mime_type": "application/json" }
        });

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // 去掉 URL，避免密钥出现在错误信息里
                let e = e.without_url();
                warn!("Gemini API 请求失败: {}", e);
                AppError::Service {
                    status: None,
                    body: e.to_string(),
                }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AppError::Service {
            status: Some(status.as_u16()),
            body: e.without_url().to_string(),
        })?;

        if !status.is_success() {
            warn!("Gemini API 返回错误状态: {}", status);
            return Err(AppError::Service {
                status: Some(status.as_u16()),
                body: text,
            });
        }

        debug!("Gemini API 调用成功");
        extract_candidate_text(&text, &self.model_name)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: Option<String>,
}

/// 从 generateContent 响应中取出文本
///
/// 只看第一个候选，拼接它的所有文本片段。
pub fn extract_candidate_text(body: &str, model: &str) -> AppResult<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AppError::malformed(format!("响应体不是合法的 generateContent 结构: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::EmptyResponse {
            model: model.to_string(),
        });
    }

    Ok(text.trim().to_string())
}

// ========== OpenAI 兼容 ==========

/// OpenAI 兼容客户端
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
    has_api_key: bool,
    model_name: String,
}

impl OpenAiCompatClient {
    pub fn new(config: &Config) -> Self {
        // 未单独配置地址时，走 Gemini 的 OpenAI 兼容入口
        let api_base = if config.llm_api_base_url == DEFAULT_GEMINI_BASE_URL {
            format!("{}/openai", DEFAULT_GEMINI_BASE_URL)
        } else {
            config.llm_api_base_url.clone()
        };

        let openai_config = OpenAIConfig::new()
            .with_api_key(config.llm_api_key.clone().unwrap_or_default())
            .with_api_base(api_base);

        Self {
            client: Client::with_config(openai_config),
            has_api_key: config.llm_api_key.is_some(),
            model_name: config.llm_model_name.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        if !self.has_api_key {
            return Err(missing_key());
        }

        debug!("调用 OpenAI 兼容 API，模型: {}", self.model_name);

        let build_failed = |e: async_openai::error::OpenAIError| AppError::Service {
            status: None,
            body: format!("请求构建失败: {}", e),
        };

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content("You write multiple-choice exam questions and reply with a bare JSON array only.")
            .build()
            .map_err(build_failed)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(build_failed)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .temperature(0.3)
            .build()
            .map_err(build_failed)?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("OpenAI 兼容 API 调用失败: {}", e);
            AppError::Service {
                status: None,
                body: e.to_string(),
            }
        })?;

        debug!("OpenAI 兼容 API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
