// ==========================================
// quickLOG 质量模块 - 组件配置 (按组件键分版本)
// ==========================================
// 线上格式: { "version": 1, ...版本字段 }
// 缺少 version 的旧配置按 v1 处理; 未知版本报错
// ==========================================

use crate::domain::environmental::AtpThresholdConfig;
use crate::domain::thresholds::ThresholdConfig;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const WIDGETS_BASE: &str = "/api/analytics/widgets";

/// 组件配置错误
#[derive(Error, Debug)]
pub enum WidgetConfigError {
    #[error("未知组件键: {0}")]
    UnknownKey(String),

    #[error("组件 {key} 不支持配置版本 {version}")]
    UnsupportedVersion { key: String, version: u64 },

    #[error("组件 {key} 配置格式错误: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

// ==========================================
// WidgetKey - 组件键
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKey {
    ComplaintsSummary,
    EnvironmentalAtp,
}

impl WidgetKey {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKey::ComplaintsSummary => "complaints.summary",
            WidgetKey::EnvironmentalAtp => "environmental.atp",
        }
    }

    pub fn parse(s: &str) -> Result<Self, WidgetConfigError> {
        match s {
            "complaints.summary" => Ok(WidgetKey::ComplaintsSummary),
            "environmental.atp" => Ok(WidgetKey::EnvironmentalAtp),
            other => Err(WidgetConfigError::UnknownKey(other.to_string())),
        }
    }

    /// 组件接口路径, 如 /api/analytics/widgets/complaints.summary
    pub fn path(self) -> String {
        format!("{}/{}", WIDGETS_BASE, self.as_str())
    }

    /// 当前写出的配置版本
    pub fn current_version(self) -> u64 {
        match self {
            WidgetKey::ComplaintsSummary => 1,
            WidgetKey::EnvironmentalAtp => 1,
        }
    }
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// WidgetConfig - 已解码的组件配置
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetConfig {
    /// complaints.summary v1
    ComplaintsSummary(ThresholdConfig),
    /// environmental.atp v1
    EnvironmentalAtp(AtpThresholdConfig),
}

impl WidgetConfig {
    pub fn key(&self) -> WidgetKey {
        match self {
            WidgetConfig::ComplaintsSummary(_) => WidgetKey::ComplaintsSummary,
            WidgetConfig::EnvironmentalAtp(_) => WidgetKey::EnvironmentalAtp,
        }
    }

    /// 解码原始配置
    pub fn decode(key: WidgetKey, raw: &Value) -> Result<Self, WidgetConfigError> {
        let version = raw.get("version").and_then(Value::as_u64).unwrap_or(1);

        let malformed = |source| WidgetConfigError::Malformed {
            key: key.as_str().to_string(),
            source,
        };

        match (key, version) {
            (WidgetKey::ComplaintsSummary, 1) => serde_json::from_value(raw.clone())
                .map(WidgetConfig::ComplaintsSummary)
                .map_err(malformed),
            (WidgetKey::EnvironmentalAtp, 1) => serde_json::from_value(raw.clone())
                .map(WidgetConfig::EnvironmentalAtp)
                .map_err(malformed),
            (key, version) => Err(WidgetConfigError::UnsupportedVersion {
                key: key.as_str().to_string(),
                version,
            }),
        }
    }

    /// 编码为线上格式 (附带 version)
    pub fn encode(&self) -> Value {
        let mut value = match self {
            WidgetConfig::ComplaintsSummary(c) => serde_json::to_value(c),
            WidgetConfig::EnvironmentalAtp(c) => serde_json::to_value(c),
        }
        .unwrap_or(Value::Null);

        if let Value::Object(map) = &mut value {
            map.insert(
                "version".to_string(),
                Value::from(self.key().current_version()),
            );
        }
        value
    }
}
