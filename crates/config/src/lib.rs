//! cuba-config - 配置加载库
//!
//! 加载顺序（后者覆盖前者）：
//! 1. `{config_dir}/default.toml`
//! 2. `{config_dir}/{APP_ENV}.toml`
//! 3. 环境变量：`APP_NAME`、`APP_ENV`，以及 `database` / `server` / `telemetry`
//!    段内字段，用 `__` 分隔（如 `DATABASE__URL`、`SERVER__PORT`）

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::UncasedStr,
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 数据库文件不存在时自动创建
    #[serde(default = "default_create_if_missing")]
    pub create_if_missing: bool,
}

fn default_max_connections() -> u32 {
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 20,
        _ => 5,
    }
}

fn default_create_if_missing() -> bool {
    true
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 遥测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 内置默认值，配置文件和环境变量缺省时生效
#[derive(Serialize)]
struct Defaults {
    app_env: String,
    server: ServerConfig,
    telemetry: TelemetryConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            app_env: "development".to_string(),
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 50051,
            },
            telemetry: TelemetryConfig {
                log_level: default_log_level(),
            },
        }
    }
}

/// 可由 `SECTION__KEY` 环境变量覆盖的配置段
const ENV_SECTIONS: [&str; 3] = ["database", "server", "telemetry"];

/// 只接受已知配置段的环境变量，其他工具的 `X__Y` 变量不进入配置树
fn is_section_key(key: &UncasedStr) -> bool {
    key.as_str()
        .split_once("__")
        .is_some_and(|(section, _)| {
            ENV_SECTIONS
                .iter()
                .any(|known| section.eq_ignore_ascii_case(known))
        })
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self::figment(config_dir).extract()?)
    }

    fn figment(config_dir: &str) -> Figment {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Figment::from(Serialized::defaults(Defaults::default()))
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::raw().only(&["APP_NAME", "APP_ENV"]))
            .merge(Env::raw().filter(is_section_key).split("__"))
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// gRPC 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 健康检查端口（gRPC 端口 + 1000）
    pub fn health_port(&self) -> u16 {
        self.server.port.saturating_add(1000)
    }
}
