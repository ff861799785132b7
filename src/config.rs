//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `STEWARD__*` 覆盖（双下划线表示嵌套，如 `STEWARD__LLM__PROVIDER=deepseek`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
}

/// [app] 段：应用名、单次运行步数上限、Prompt 目录
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    /// 单次运行最多执行的节点数；内置节点最多 3 步即结束
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// 覆盖内置 Prompt 的目录（supervisor_route.txt、calendar.txt 等）
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            max_steps: default_max_steps(),
            prompts_dir: default_prompts_dir(),
        }
    }
}

fn default_max_steps() -> usize {
    8
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("config/prompts")
}

/// [llm] 段：后端选择、两级模型与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：openai / deepseek / mock；无 API Key 时回退 mock
    #[serde(default = "default_provider")]
    pub provider: String,
    pub base_url: Option<String>,
    /// Supervisor 与直接回复使用的模型
    #[serde(default = "default_supervisor_model")]
    pub supervisor_model: String,
    /// 日程 / 邮件 / 调研专家使用的模型
    #[serde(default = "default_specialist_model")]
    pub specialist_model: String,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            base_url: None,
            supervisor_model: default_supervisor_model(),
            specialist_model: default_specialist_model(),
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_supervisor_model() -> String {
    "gpt-4o".to_string()
}

fn default_specialist_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// 从 config 目录加载配置，环境变量 STEWARD__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 STEWARD__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("STEWARD")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
