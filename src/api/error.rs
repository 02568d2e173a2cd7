// ==========================================
// quickLOG 质量模块 - API层错误类型
// ==========================================
// 职责: 统一 API 层错误, 转换下层错误为用户可读消息
// 分类: 拉取失败 / 校验失败
// ==========================================

use crate::config::WidgetConfigError;
use crate::domain::session::SessionError;
use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 错误大类 (决定提示条文案)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    FetchFailed,
    ValidationFailed,
}

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 拉取失败 (网络 / HTTP / 解码)
    // ==========================================
    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("后端返回错误: status={status}, {message}")]
    Http { status: u16, message: String },

    #[error("未登录或会话已失效: {0}")]
    Unauthorized(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("响应解析失败: {0}")]
    Decode(String),

    // ==========================================
    // 校验失败 (录入 / 权限 / 配置)
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("权限不足: {0}")]
    Forbidden(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 录入校验失败（带逐字段原因）
    #[error("录入校验失败: {reason}")]
    EntryValidationError {
        reason: String,
        violations: Vec<ValidationViolation>,
    },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 错误大类
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::Forbidden(_)
            | ApiError::ValidationError(_)
            | ApiError::EntryValidationError { .. } => ErrorKind::ValidationFailed,
            _ => ErrorKind::FetchFailed,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::ValidationFailed
    }
}

// ==========================================
// 校验违规详情
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationViolation {
    pub field: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ValidationViolation {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
            details: None,
        }
    }
}

// ==========================================
// 从下层错误转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidRlu(msg) => ApiError::EntryValidationError {
                reason: msg.clone(),
                violations: vec![ValidationViolation::new("rlu", msg)],
            },
            EngineError::CapaLocked => {
                let msg = EngineError::CapaLocked.to_string();
                ApiError::EntryValidationError {
                    reason: msg.clone(),
                    violations: vec![ValidationViolation::new("capaRequired", msg)],
                }
            }
            EngineError::InvalidThreshold { field, message } => ApiError::EntryValidationError {
                reason: message.clone(),
                violations: vec![ValidationViolation::new(&field, message)],
            },
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::InternalError(format!("本地存储错误: {}", err))
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<WidgetConfigError> for ApiError {
    fn from(err: WidgetConfigError) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ApiError::Transport(err.to_string()),
        }
    }
}

/// API层结果类型
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_split() {
        assert_eq!(
            ApiError::Transport("refused".into()).kind(),
            ErrorKind::FetchFailed
        );
        assert_eq!(
            ApiError::Http {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::FetchFailed
        );
        assert!(ApiError::Forbidden("role".into()).is_validation());
        assert!(ApiError::from(EngineError::CapaLocked).is_validation());
    }

    #[test]
    fn test_engine_error_keeps_field() {
        let err = ApiError::from(EngineError::InvalidRlu("读数不能为负: -3".into()));
        match err {
            ApiError::EntryValidationError { violations, .. } => {
                assert_eq!(violations[0].field, "rlu");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
