// ==========================================
// quickLOG 质量模块 - 会话上下文
// ==========================================
// 令牌载荷只在构造会话时解码一次, 之后各组件读取 role
// 不做签名校验: 权限边界由后端负责
// ==========================================

use crate::domain::types::UserRole;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// 令牌解码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("令牌为空")]
    EmptyToken,

    #[error("令牌格式错误: 期望 header.payload.signature")]
    MalformedToken,

    #[error("令牌载荷解码失败: {0}")]
    PayloadDecode(String),
}

/// 令牌载荷中客户端关心的字段
#[derive(Debug, Clone, Default, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default)]
    exp: Option<i64>,
}

/// 显式会话对象, 传递给需要鉴权的组件
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: String,
    pub role: UserRole,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// 从原始令牌构造会话 (解码载荷中的 role/sub/exp)
    pub fn from_token(token: &str) -> Result<Self, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let mut parts = token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_)) if !payload.is_empty() => payload,
            _ => return Err(SessionError::MalformedToken),
        };

        let bytes = decode_segment(payload)?;
        let claims: TokenClaims = serde_json::from_slice(&bytes)
            .map_err(|e| SessionError::PayloadDecode(e.to_string()))?;

        let subject = claims.sub.map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        Ok(Self {
            token: token.to_string(),
            role: claims
                .role
                .as_deref()
                .map(UserRole::parse)
                .unwrap_or_default(),
            subject,
            expires_at: claims
                .exp
                .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
        })
    }

    /// 原始令牌 (用于 Authorization 头)
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// 载荷声明的过期时间已过 (仅作提示, 以后端判定为准)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

// 载荷应为 base64url 无填充; 兼容带填充的标准编码
fn decode_segment(segment: &str) -> Result<Vec<u8>, SessionError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .or_else(|_| STANDARD.decode(segment))
        .map_err(|e| SessionError::PayloadDecode(e.to_string()))
}
