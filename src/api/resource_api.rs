// ==========================================
// quickLOG 质量模块 - 通用记录 API
// ==========================================
// 职责: 产品/订单/库存/追溯日志/日志/用户/人工月报的只读列表
// 说明: 这些实体的结构由后端决定, 客户端按原始 JSON 持有
//       过滤与排序在客户端完成
// ==========================================

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::endpoints;
use crate::api::error::ApiResult;
use crate::api::transport::{decode_list, ApiTransport};

/// 通用记录种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Products,
    Orders,
    Inventory,
    TraceabilityLogs,
    Logs,
    Users,
    LaborMonthly,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Products,
        ResourceKind::Orders,
        ResourceKind::Inventory,
        ResourceKind::TraceabilityLogs,
        ResourceKind::Logs,
        ResourceKind::Users,
        ResourceKind::LaborMonthly,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Products => endpoints::PRODUCTS,
            ResourceKind::Orders => endpoints::ORDERS,
            ResourceKind::Inventory => endpoints::INVENTORY,
            ResourceKind::TraceabilityLogs => endpoints::TRACEABILITY_LOGS,
            ResourceKind::Logs => endpoints::LOGS,
            ResourceKind::Users => endpoints::USERS,
            ResourceKind::LaborMonthly => endpoints::LABOR_MONTHLY,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "products" => Some(ResourceKind::Products),
            "orders" => Some(ResourceKind::Orders),
            "inventory" => Some(ResourceKind::Inventory),
            "traceability-logs" => Some(ResourceKind::TraceabilityLogs),
            "logs" => Some(ResourceKind::Logs),
            "users" => Some(ResourceKind::Users),
            "labor-monthly" => Some(ResourceKind::LaborMonthly),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Products => "products",
            ResourceKind::Orders => "orders",
            ResourceKind::Inventory => "inventory",
            ResourceKind::TraceabilityLogs => "traceability-logs",
            ResourceKind::Logs => "logs",
            ResourceKind::Users => "users",
            ResourceKind::LaborMonthly => "labor-monthly",
        };
        f.write_str(name)
    }
}

// ==========================================
// RecordQuery - 客户端过滤与排序
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// 在所有字符串/数字字段中做大小写不敏感的子串匹配
    pub search: Option<String>,
    /// 排序字段 (顶层字段名)
    pub sort_by: Option<String>,
    pub descending: bool,
    pub limit: Option<usize>,
}

impl RecordQuery {
    pub fn apply(&self, mut records: Vec<Value>) -> Vec<Value> {
        if let Some(needle) = self
            .search
            .as_ref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
        {
            records.retain(|r| contains_text(r, &needle));
        }

        if let Some(field) = &self.sort_by {
            // 稳定排序; 缺少该字段的记录始终排在最后
            records.sort_by(|a, b| {
                match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) if !x.is_null() && !y.is_null() => {
                        let ord = compare_values(x, y);
                        if self.descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    }
                    (Some(x), _) if !x.is_null() => Ordering::Less,
                    (_, Some(y)) if !y.is_null() => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            });
        }

        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        records
    }
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map.values().any(|v| contains_text(v, needle)),
        _ => false,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

// ==========================================
// ResourceApi - 通用记录 API
// ==========================================
pub struct ResourceApi {
    transport: Arc<dyn ApiTransport>,
}

impl ResourceApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// 拉取列表并在客户端过滤/排序
    pub async fn list(&self, kind: ResourceKind, query: &RecordQuery) -> ApiResult<Vec<Value>> {
        let value = self.transport.get(kind.path(), &[]).await?;
        let records: Vec<Value> = decode_list(value)?;
        tracing::debug!(%kind, count = records.len(), "records fetched");
        Ok(query.apply(records))
    }
}
