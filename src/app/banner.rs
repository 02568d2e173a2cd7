// ==========================================
// quickLOG 质量模块 - 提示条
// ==========================================
// 错误/成功消息以短暂提示条展示, 到期自动消失
// 不做重试; 视图在出错后退化为空状态
// ==========================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ErrorKind};
use crate::i18n::t_with_args;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Banner {
    /// 由 API 错误生成提示条 (文案按错误大类选择)
    pub fn from_error(err: &ApiError, now: DateTime<Utc>, ttl: Duration) -> Self {
        let key = match err.kind() {
            ErrorKind::FetchFailed => "banner.fetch_failed",
            ErrorKind::ValidationFailed => "banner.validation_failed",
        };
        Self {
            level: BannerLevel::Error,
            message: t_with_args(key, &[("detail", &err.to_string())]),
            expires_at: now + ttl,
        }
    }

    pub fn success(message: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            level: BannerLevel::Success,
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// ==========================================
// BannerQueue - 当前可见的提示条
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BannerQueue {
    banners: Vec<Banner>,
}

impl BannerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, banner: Banner) {
        match banner.level {
            BannerLevel::Error => tracing::warn!("{}", banner.message),
            BannerLevel::Success => tracing::info!("{}", banner.message),
        }
        self.banners.push(banner);
    }

    /// 当前可见的提示条 (顺带清除已过期的)
    pub fn visible(&mut self, now: DateTime<Utc>) -> &[Banner] {
        self.banners.retain(|b| !b.is_expired(now));
        &self.banners
    }

    pub fn clear(&mut self) {
        self.banners.clear();
    }
}
