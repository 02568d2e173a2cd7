// ==========================================
// quickLOG 质量模块 - 后端传输层
// ==========================================
// 职责: 发送 REST 请求, 统一鉴权头 / 状态码 / JSON 解码
// 约束: 不重试, 不取消; 超时由 ClientConfig 决定
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ClientConfig;
use crate::domain::session::Session;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

// ==========================================
// Trait: ApiTransport
// ==========================================
// 用途: API 层只依赖此 trait, 测试时替换为内存实现
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// 发送请求, 返回 JSON 响应体 (空响应体为 Value::Null)
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value>;

    async fn get(&self, path: &str, query: &[(String, String)]) -> ApiResult<Value> {
        self.request(Method::Get, path, query, None).await
    }

    async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::Post, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.request(Method::Put, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::Delete, path, &[], None).await
    }
}

/// 解码单个对象
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    Ok(serde_json::from_value(value)?)
}

/// 解码列表
///
/// 后端列表接口返回裸数组或 { "data": [...] }; null 视为空列表
pub fn decode_list<T: DeserializeOwned>(value: Value) -> ApiResult<Vec<T>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(data @ Value::Array(_)) => data,
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(other) => {
                return Err(ApiError::Decode(format!(
                    "列表响应的 data 不是数组: {}",
                    other
                )))
            }
        },
        other => {
            return Err(ApiError::Decode(format!("期望列表响应, 实际为: {}", other)));
        }
    };
    Ok(serde_json::from_value(items)?)
}

/// 从错误响应体中提取消息 (error / message 字段)
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

/// 状态码 → 错误
pub fn status_error(status: u16, path: &str, body: &str) -> ApiError {
    let message = error_message(body);
    match status {
        401 | 403 => ApiError::Unauthorized(message),
        404 => ApiError::NotFound(path.to_string()),
        400 | 422 => ApiError::ValidationError(message),
        _ => ApiError::Http { status, message },
    }
}

// ==========================================
// HttpTransport - reqwest 实现
// ==========================================
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
    session: Option<Session>,
}

impl HttpTransport {
    pub fn new(config: ClientConfig, session: Option<Session>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("quicklog-quality/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let url = self.config.endpoint_url(path);
        let request_id = Uuid::new_v4().to_string();

        let mut builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        }
        .header("X-Request-Id", &request_id);

        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(session) = &self.session {
            builder = builder.header(reqwest::header::AUTHORIZATION, session.bearer_header());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        tracing::debug!(%method, %url, %request_id, "sending request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(%method, %url, %request_id, "request failed: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%method, %url, %request_id, status = status.as_u16(), "backend error");
            return Err(status_error(status.as_u16(), path, &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
