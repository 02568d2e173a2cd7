// ==========================================
// quickLOG 质量模块 - 客户端配置管理器
// ==========================================
// 职责: 配置加载与覆写
// 优先级: 默认值 < 配置文件 (JSON) < 环境变量
// 配置文件: {config_dir}/quicklog/client.json
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ==========================================
// 配置键 (环境变量名)
// ==========================================
pub mod config_keys {
    pub const API_BASE: &str = "QUICKLOG_API_BASE";
    pub const TIMEOUT_SECS: &str = "QUICKLOG_TIMEOUT_SECS";
    pub const LOCALE: &str = "QUICKLOG_LOCALE";
    pub const TOKEN_DB: &str = "QUICKLOG_TOKEN_DB";
    pub const BANNER_TTL_SECS: &str = "QUICKLOG_BANNER_TTL_SECS";
    pub const CONFIG_FILE: &str = "QUICKLOG_CONFIG";
}

pub const DEFAULT_API_BASE: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_BANNER_TTL_SECS: u64 = 5;
/// 提示条存活时间上限 (秒)
pub const MAX_BANNER_TTL_SECS: u64 = 3_600;

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// 后端地址 (不含 /api 前缀)
    pub api_base: String,
    /// 单次请求超时 (秒)
    pub timeout_secs: u64,
    /// 界面语言
    pub locale: String,
    /// 令牌存储文件路径
    pub token_db_path: String,
    /// 提示条自动消失时间 (秒)
    pub banner_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            locale: DEFAULT_LOCALE.to_string(),
            token_db_path: default_token_db_path(),
            banner_ttl_secs: DEFAULT_BANNER_TTL_SECS,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 拼接完整请求地址
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// ==========================================
// ConfigManager - 配置加载
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// 按优先级加载配置
    pub fn load() -> Result<ClientConfig, Box<dyn Error>> {
        let path = std::env::var(config_keys::CONFIG_FILE)
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_file);

        let base = match path {
            Some(p) if p.exists() => {
                tracing::info!("加载配置文件: {}", p.display());
                Self::from_file(&p)?
            }
            _ => ClientConfig::default(),
        };

        Self::apply_overrides(base, |key| std::env::var(key).ok())
    }

    /// 从 JSON 文件读取配置 (缺失字段取默认值)
    pub fn from_file(path: &Path) -> Result<ClientConfig, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// 应用覆写 (lookup 按键返回覆写值)
    pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(config_keys::API_BASE) {
            config.api_base = v;
        }
        if let Some(v) = get(config_keys::TIMEOUT_SECS) {
            config.timeout_secs = v
                .parse()
                .map_err(|e| format!("{} 解析失败: {} ({})", config_keys::TIMEOUT_SECS, v, e))?;
        }
        if let Some(v) = get(config_keys::LOCALE) {
            config.locale = v;
        }
        if let Some(v) = get(config_keys::TOKEN_DB) {
            config.token_db_path = v;
        }
        if let Some(v) = get(config_keys::BANNER_TTL_SECS) {
            config.banner_ttl_secs = v.parse().map_err(|e| {
                format!("{} 解析失败: {} ({})", config_keys::BANNER_TTL_SECS, v, e)
            })?;
        }
        // 文件与环境变量的值都在此检查
        if config.banner_ttl_secs > MAX_BANNER_TTL_SECS {
            return Err(format!(
                "{} 超出上限: {} > {}",
                config_keys::BANNER_TTL_SECS,
                config.banner_ttl_secs,
                MAX_BANNER_TTL_SECS
            )
            .into());
        }

        Ok(config)
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quicklog").join("client.json"))
}

/// 默认令牌存储路径: {data_dir}/quicklog/session.db
pub fn default_token_db_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("quicklog").join("session.db"))
        .unwrap_or_else(|| PathBuf::from("quicklog_session.db"))
        .to_string_lossy()
        .to_string()
}
