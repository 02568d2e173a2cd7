// ==========================================
// quickLOG 质量模块 - 投诉率阈值配置
// ==========================================
// 不变式: green_max ≤ amber_max (保存时校验, 结构上不强制)
// ==========================================

use serde::{Deserialize, Serialize};

/// 投诉率色带阈值 (每万件投诉数)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateThresholds {
    pub green_max: f64,
    pub amber_max: f64,
}

impl RateThresholds {
    pub fn new(green_max: f64, amber_max: f64) -> Self {
        Self {
            green_max,
            amber_max,
        }
    }
}

/// 投诉汇总组件的阈值配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    #[serde(rename = "complaintsPer10k")]
    pub complaints_per_10k: RateThresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            complaints_per_10k: RateThresholds::new(1.0, 2.0),
        }
    }
}
