// ==========================================
// quickLOG 质量模块 - 环境监测领域模型
// ==========================================
// 覆盖: 取样点 / ATP 拭子样本 / ATP 阈值配置
// ==========================================

use crate::domain::types::{SampleTiming, SwabStatus, Zone};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// EnvironmentalLocation - 取样点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalLocation {
    pub id: i64,
    pub code: String, // 唯一
    pub name: String,
    pub zone: Zone,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

// ==========================================
// AtpThresholdConfig - ATP 阈值配置
// ==========================================
// 区域阈值缺失时回退到 default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpThresholdConfig {
    #[serde(default)]
    pub zones: BTreeMap<Zone, RluThreshold>,
    pub default: RluThreshold,
    pub retest_sla_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RluThreshold {
    pub pass_max_rlu: f64,
}

impl AtpThresholdConfig {
    /// 查找某区域适用的阈值
    pub fn threshold_for(&self, zone: Zone) -> f64 {
        self.zones
            .get(&zone)
            .map(|t| t.pass_max_rlu)
            .unwrap_or(self.default.pass_max_rlu)
    }
}

impl Default for AtpThresholdConfig {
    fn default() -> Self {
        Self {
            zones: BTreeMap::new(),
            default: RluThreshold { pass_max_rlu: 150.0 },
            retest_sla_hours: 24.0,
        }
    }
}

// ==========================================
// AtpSample - ATP 拭子样本 (后端记录)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpSample {
    pub id: i64,
    pub sample_date: NaiveDateTime,
    pub location_id: i64,
    pub rlu: f64,
    pub timing: SampleTiming,
    #[serde(default)]
    pub status: Option<SwabStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

// ==========================================
// AtpSampleInput - 拭子录入表单
// ==========================================
// rlu 为 None 表示输入无法解析为数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpSampleInput {
    pub sample_date: NaiveDateTime,
    pub location_id: i64,
    pub rlu: Option<f64>,
    pub timing: SampleTiming,
    pub notes: Option<String>,
}

impl AtpSampleInput {
    /// 从文本输入解析 RLU (空白/非数字 → None)
    pub fn parse_rlu(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok()
    }
}

// ==========================================
// AtpSampleSubmission - 提交到后端的拭子记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpSampleSubmission {
    pub sample_date: NaiveDateTime,
    pub location_id: i64,
    pub rlu: f64,
    pub timing: SampleTiming,
    pub status: SwabStatus,
    pub threshold_used: f64,
    pub notes: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threshold_config_zone_keys() {
        let raw = json!({
            "zones": { "1": { "passMaxRlu": 100 }, "3": { "passMaxRlu": 300 } },
            "default": { "passMaxRlu": 250 },
            "retestSlaHours": 4
        });

        let config: AtpThresholdConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.threshold_for(Zone::Z1), 100.0);
        assert_eq!(config.threshold_for(Zone::Z3), 300.0);
        assert_eq!(config.threshold_for(Zone::Z2), 250.0);

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["zones"]["1"]["passMaxRlu"], json!(100.0));
    }

    #[test]
    fn test_parse_rlu() {
        assert_eq!(AtpSampleInput::parse_rlu(" 42 "), Some(42.0));
        assert_eq!(AtpSampleInput::parse_rlu("abc"), None);
        assert_eq!(AtpSampleInput::parse_rlu(""), None);
    }
}
