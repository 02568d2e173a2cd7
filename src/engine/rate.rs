// ==========================================
// quickLOG 质量模块 - 投诉率色带判定引擎
// ==========================================
// 规则: rate ≤ green_max → GREEN; ≤ amber_max → AMBER; 其余 → RED
// 边界: 两端阈值均为闭区间; 缺失/非有限值 → INDETERMINATE
// ==========================================

use crate::domain::thresholds::{RateThresholds, ThresholdConfig};
use crate::domain::types::RateStatus;
use crate::engine::error::{EngineError, EngineResult};

/// 投诉率单位: 每万件
pub const RATE_PER_UNITS: f64 = 10_000.0;

pub struct RateClassifier;

impl RateClassifier {
    /// 判定投诉率色带
    pub fn classify(rate: Option<f64>, thresholds: &RateThresholds) -> RateStatus {
        let rate = match rate {
            Some(r) if r.is_finite() => r,
            _ => return RateStatus::Indeterminate,
        };

        if rate <= thresholds.green_max {
            RateStatus::Green
        } else if rate <= thresholds.amber_max {
            RateStatus::Amber
        } else {
            RateStatus::Red
        }
    }

    /// 计算投诉率 (每万件)
    ///
    /// 产量缺失、≤0 或非有限值时返回 None
    pub fn complaint_rate(complaints: u32, units_produced: Option<f64>) -> Option<f64> {
        let units = units_produced.filter(|u| u.is_finite() && *u > 0.0)?;
        Some(complaints as f64 * RATE_PER_UNITS / units)
    }

    /// 保存前校验阈值配置
    ///
    /// # 规则
    /// - 阈值必须为有限非负数
    /// - green_max ≤ amber_max
    pub fn validate(config: &ThresholdConfig) -> EngineResult<()> {
        let t = &config.complaints_per_10k;

        for (field, value) in [("greenMax", t.green_max), ("amberMax", t.amber_max)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidThreshold {
                    field: field.to_string(),
                    message: format!("必须为非负有限数, 实际为 {}", value),
                });
            }
        }

        if t.green_max > t.amber_max {
            return Err(EngineError::InvalidThreshold {
                field: "greenMax".to_string(),
                message: format!(
                    "greenMax({}) 不能大于 amberMax({})",
                    t.green_max, t.amber_max
                ),
            });
        }

        Ok(())
    }
}
