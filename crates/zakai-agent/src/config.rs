use serde::{Deserialize, Serialize};

/// Hosted API the completion calls go to. All of them speak the OpenAI
/// chat-completions protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    OpenRouter,
    /// Groq cloud inference. Has no image-generation endpoint.
    Groq,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Sent only when set; the API default applies otherwise.
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_vision_max_tokens")]
    pub vision_max_tokens: u32,
    #[serde(default = "default_revision_max_tokens")]
    pub revision_max_tokens: u32,
    #[serde(default = "default_image_model")]
    pub image_model: String,
}

fn default_model_id() -> String {
    "gpt-4o".into()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_vision_max_tokens() -> u32 {
    1000
}

fn default_revision_max_tokens() -> u32 {
    1000
}

fn default_image_model() -> String {
    "dall-e-3".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model_id: default_model_id(),
            api_key: String::new(),
            api_base_url: None,
            temperature: None,
            max_tokens: default_max_tokens(),
            vision_max_tokens: default_vision_max_tokens(),
            revision_max_tokens: default_revision_max_tokens(),
            image_model: default_image_model(),
        }
    }
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url.trim_end_matches('/')
        } else {
            match self.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::Groq => "https://api.groq.com/openai",
            }
        }
    }
}

/// Keyword lists that route free text away from plain conversation.
///
/// Matching is a case-insensitive substring test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    #[serde(default = "default_create_keywords")]
    pub create_keywords: Vec<String>,
    #[serde(default = "default_image_keywords")]
    pub image_keywords: Vec<String>,
    #[serde(default = "default_revision_keywords")]
    pub revision_keywords: Vec<String>,
}

fn default_create_keywords() -> Vec<String> {
    vec!["buat".into()]
}

fn default_image_keywords() -> Vec<String> {
    vec!["gambar".into()]
}

fn default_revision_keywords() -> Vec<String> {
    vec!["revisi".into()]
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            create_keywords: default_create_keywords(),
            image_keywords: default_image_keywords(),
            revision_keywords: default_revision_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Pause between rendered fragments, in milliseconds. `0` disables it.
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
    /// Caps the messages sent per request (the system message is always
    /// kept). The transcript itself is never trimmed.
    #[serde(default)]
    pub max_context_messages: Option<usize>,
}

fn default_typing_delay_ms() -> u64 {
    30
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            max_context_messages: None,
        }
    }
}

/// Everything the session controller needs, as read from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub intents: IntentConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

fn default_system_prompt() -> String {
    "You are a helpful assistant".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            model: ModelConfig::default(),
            intents: IntentConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}
