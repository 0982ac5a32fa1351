use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::citation::CitationStyle;
use crate::core::error::ConfigError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ARXIV_URL: &str = "https://export.arxiv.org/api/query";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// API key for the OpenAI-compatible chat endpoint
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the chat endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub debug: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_data_dir() -> String {
    ".refscout".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            data_dir: default_data_dir(),
            api_key: None,
            base_url: default_base_url(),
            chat: ChatConfig::default(),
            search: SearchConfig::default(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model used for answer synthesis, keyword translation and titling
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,

    /// Language the summaries and session titles are written in
    #[serde(default = "default_reply_language")]
    pub reply_language: String,

    /// Default citation convention; the presentation layer may override per turn
    #[serde(default)]
    pub citation_style: CitationStyle,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_max_tokens() -> u64 {
    4_096
}

fn default_reply_language() -> String {
    "English".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            reply_language: default_reply_language(),
            citation_style: CitationStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// arXiv export API endpoint
    #[serde(default = "default_arxiv_url")]
    pub base_url: String,

    /// Papers covered per reply; the presentation layer may override per turn
    #[serde(default = "default_paper_count")]
    pub paper_count: usize,
}

fn default_arxiv_url() -> String {
    DEFAULT_ARXIV_URL.into()
}

fn default_paper_count() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_url(),
            paper_count: default_paper_count(),
        }
    }
}

pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let mut config = AppConfig::default();
    config.working_dir = wd.clone();

    // Global config
    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("refscout").join("config.json");
        if global_path.exists() {
            let content = std::fs::read_to_string(&global_path)
                .map_err(|e| ConfigError::File(e.to_string()))?;
            let file_config: AppConfig = serde_json::from_str(&content)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            merge_config(&mut config, file_config);
        }
    }

    // Local project config
    let local_path = wd.join("refscout.json");
    if local_path.exists() {
        let content = std::fs::read_to_string(&local_path)
            .map_err(|e| ConfigError::File(e.to_string()))?;
        let file_config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        merge_config(&mut config, file_config);
    }

    detect_api_key(&mut config);

    Ok(config)
}

fn merge_config(base: &mut AppConfig, overlay: AppConfig) {
    if overlay.api_key.is_some() {
        base.api_key = overlay.api_key;
    }
    if overlay.base_url != default_base_url() {
        base.base_url = overlay.base_url;
    }
    if overlay.chat.model != default_model() {
        base.chat.model = overlay.chat.model;
    }
    if overlay.chat.max_tokens != default_max_tokens() {
        base.chat.max_tokens = overlay.chat.max_tokens;
    }
    if overlay.chat.reply_language != default_reply_language() {
        base.chat.reply_language = overlay.chat.reply_language;
    }
    if overlay.chat.citation_style != CitationStyle::default() {
        base.chat.citation_style = overlay.chat.citation_style;
    }
    if overlay.search.base_url != default_arxiv_url() {
        base.search.base_url = overlay.search.base_url;
    }
    if overlay.search.paper_count != default_paper_count() {
        base.search.paper_count = overlay.search.paper_count;
    }
    if overlay.debug {
        base.debug = true;
    }
}

fn detect_api_key(config: &mut AppConfig) {
    if config.api_key.is_some() {
        return;
    }

    for env_var in ["REFSCOUT_API_KEY", "OPENAI_API_KEY"] {
        if let Ok(key) = std::env::var(env_var) {
            if !key.is_empty() {
                config.api_key = Some(key);
                return;
            }
        }
    }
}

impl AppConfig {
    pub fn data_path(&self) -> PathBuf {
        self.working_dir.join(&self.data_dir)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}
