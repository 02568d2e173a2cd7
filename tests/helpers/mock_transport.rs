// ==========================================
// 内存传输层
// ==========================================
// 职责: 按 (方法, 路径) 返回预置响应, 并记录所有请求
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use quicklog_quality::api::transport::status_error;
use quicklog_quality::api::{ApiResult, ApiTransport, Method};
use quicklog_quality::app::state::TransportFactory;
use quicklog_quality::domain::Session;

/// 预置响应
#[derive(Debug, Clone)]
pub enum Canned {
    Json(Value),
    Status(u16, String),
}

/// 已发送的请求
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Authorization 头 (未登录为 None)
    pub bearer: Option<String>,
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Canned::Json(body));
        self
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Canned::Status(status, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// 指定方法与路径的请求
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// 写请求 (非 GET) 数量
    pub fn write_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method != Method::Get)
            .count()
    }
}

impl MockTransport {
    fn handle(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        bearer: Option<String>,
    ) -> ApiResult<Value> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body,
            bearer,
        });

        let canned = self
            .responses
            .lock()
            .unwrap()
            .get(&(method, path.to_string()))
            .cloned();
        match canned {
            Some(Canned::Json(v)) => Ok(v),
            Some(Canned::Status(status, body)) => Err(status_error(status, path, &body)),
            None => Err(status_error(404, path, "")),
        }
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        self.handle(method, path, query, body, None)
    }
}

// ==========================================
// 带会话的内存传输层
// ==========================================
// 与 HttpTransport 一样在构造时固定 Authorization 头, 请求记入共享的 MockTransport
pub struct SessionTransport {
    inner: Arc<MockTransport>,
    bearer: Option<String>,
}

#[async_trait]
impl ApiTransport for SessionTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        self.inner
            .handle(method, path, query, body, self.bearer.clone())
    }
}

/// 按会话构造 SessionTransport 的工厂
pub fn session_factory(inner: Arc<MockTransport>) -> TransportFactory {
    Arc::new(move |session: Option<&Session>| -> ApiResult<Arc<dyn ApiTransport>> {
        let transport: Arc<dyn ApiTransport> = Arc::new(SessionTransport {
            inner: inner.clone(),
            bearer: session.map(Session::bearer_header),
        });
        Ok(transport)
    })
}
