use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use xtract_core::{TagSpec, extractor::default_specs};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub character: CharacterConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CharacterConfig {
    /// Display name substituted into output templates.
    #[serde(default = "CharacterConfig::default_display_name")]
    pub display_name: String,
    #[serde(default = "CharacterConfig::default_model")]
    pub model: String,
    #[serde(default = "CharacterConfig::default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "CharacterConfig::default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "CharacterConfig::default_temperature")]
    pub temperature: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            display_name: Self::default_display_name(),
            model: Self::default_model(),
            system_prompt: Self::default_system_prompt(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
        }
    }
}

impl CharacterConfig {
    fn default_display_name() -> String {
        "AI".to_string()
    }

    fn default_model() -> String {
        "glm-4-flash".to_string()
    }

    fn default_system_prompt() -> String {
        "你是一个角色扮演助手。先在 <think> 标签里写出你的思考，再给出回复。".to_string()
    }

    const fn default_max_tokens() -> usize {
        8192
    }

    const fn default_temperature() -> f32 {
        0.7
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExtractorConfig {
    /// Tags to extract, in order. Empty or invalid entries fall back to the
    /// default `<think>` tag at extractor construction, never at load time.
    #[serde(default = "default_specs")]
    pub tags: Vec<TagSpec>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            tags: default_specs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub allow_from: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub zhipu: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("xtract");

        let config_path = config_dir.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'xtract init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("xtract");

        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "character": {
    "display_name": "AI",
    "model": "glm-4-flash",
    "system_prompt": "你是一个角色扮演助手。先在 <think> 标签里写出你的思考，再给出回复。",
    "max_tokens": 8192,
    "temperature": 0.7
  },
  "extractor": {
    "tags": [
      { "tag": "think", "template": "{name}在想：\n{content}" }
    ]
  },
  "telegram": {
    "enabled": false,
    "token": "",
    "allow_from": []
  },
  "providers": {
    "zhipu": {
      "api_key": "your-zhipu-api-key-here"
    }
  }
}"#;

        std::fs::write(&config_path, config_template)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Edit the config file and add your Zhipu API key");
        println!("   2. Add the tags you want to extract under \"extractor.tags\"");
        println!("   3. Run 'xtract telegram' to start the bot");
        println!();
        Ok(())
    }
}
