use teloxide::types::BotCommand;
use xtract_core::TagSpec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    /// The listing command: show every configured tag and template.
    Tags,
    /// Query the latest cached content of one configured tag.
    Query(String),
}

impl Command {
    /// Commands registered with Telegram: the fixed set plus one query
    /// command per configured tag.
    #[must_use]
    pub fn bot_commands(specs: &[TagSpec]) -> Vec<BotCommand> {
        let mut commands = vec![
            BotCommand {
                command: "start".to_string(),
                description: "开始使用机器人".to_string(),
            },
            BotCommand {
                command: "tags".to_string(),
                description: "查看当前配置的所有标签".to_string(),
            },
            BotCommand {
                command: "help".to_string(),
                description: "显示帮助信息".to_string(),
            },
        ];

        commands.extend(specs.iter().map(|spec| BotCommand {
            command: spec.tag.to_lowercase(),
            description: format!("查看最新回复中 <{}> 标签的内容", spec.tag),
        }));

        commands
    }

    /// Parse a message as a command against the configured tag set.
    #[must_use]
    pub fn parse_from_text(text: &str, specs: &[TagSpec]) -> Option<Self> {
        let text = text.trim().to_lowercase();

        // Remove bot mention if present (e.g., "/think@my_bot")
        let text = text.split('@').next().unwrap_or(&text).to_string();

        match text.as_str() {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            "/tags" => Some(Self::Tags),
            other => {
                let name = other.strip_prefix('/')?;
                specs
                    .iter()
                    .find(|spec| spec.tag.to_lowercase() == name)
                    .map(|spec| Self::Query(spec.tag.clone()))
            }
        }
    }

    #[must_use]
    pub const fn help_text() -> &'static str {
        r"
🤖 xtract 标签提取机器人

命令列表:
/tags  - 查看当前配置的所有标签
/<标签名> - 查看最新回复中该标签的内容（例如 /think）
/help  - 显示此帮助信息

直接发送消息即可与角色对话！
"
    }

    #[must_use]
    pub const fn welcome_text() -> &'static str {
        r"
👋 欢迎使用 xtract！

我会从角色的每条回复中提取配置的标签内容，
并为每个标签保留最新一条。发送 /tags 查看标签，
或直接发送消息开始对话。
"
    }
}
