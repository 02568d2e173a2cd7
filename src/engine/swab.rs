// ==========================================
// quickLOG 质量模块 - ATP 拭子判定引擎
// ==========================================
// 规则: threshold = zones[zone] ?? default; rlu ≤ threshold → PASS
// 红线: rlu < 0 或非有限值 → 拒绝, 不做任何修正
// ==========================================

use crate::domain::environmental::{AtpSample, AtpThresholdConfig};
use crate::domain::types::{SwabStatus, Zone};
use crate::engine::error::{EngineError, EngineResult};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// 复测时限上限 (小时)
pub const MAX_RETEST_SLA_HOURS: f64 = 24.0 * 365.0;

/// 单个拭子的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwabClassification {
    pub status: SwabStatus,
    pub threshold_used: f64,
}

/// 单区域汇总
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub total: u32,
    pub failed: u32,
}

impl ZoneSummary {
    /// 合格率 (0.0-1.0), 无样本时为 None
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((self.total - self.failed) as f64 / self.total as f64)
    }
}

// ==========================================
// SwabClassifier - 拭子判定引擎
// ==========================================
pub struct SwabClassifier;

impl SwabClassifier {
    /// 校验 RLU 读数
    pub fn validate_rlu(rlu: f64) -> EngineResult<f64> {
        if !rlu.is_finite() {
            return Err(EngineError::InvalidRlu(format!("非数值读数: {}", rlu)));
        }
        if rlu < 0.0 {
            return Err(EngineError::InvalidRlu(format!("读数不能为负: {}", rlu)));
        }
        Ok(rlu)
    }

    /// 判定单个拭子
    pub fn classify(
        rlu: f64,
        zone: Zone,
        config: &AtpThresholdConfig,
    ) -> EngineResult<SwabClassification> {
        let rlu = Self::validate_rlu(rlu)?;
        let threshold_used = config.threshold_for(zone);

        let status = if rlu <= threshold_used {
            SwabStatus::Pass
        } else {
            SwabStatus::Fail
        };

        Ok(SwabClassification {
            status,
            threshold_used,
        })
    }

    /// 复测截止时间 (仅 FAIL 样本)
    pub fn retest_due_at(
        sample_date: NaiveDateTime,
        status: SwabStatus,
        config: &AtpThresholdConfig,
    ) -> Option<NaiveDateTime> {
        if status != SwabStatus::Fail {
            return None;
        }
        let hours = config.retest_sla_hours;
        if !hours.is_finite() || !(0.0..=MAX_RETEST_SLA_HOURS).contains(&hours) {
            return None;
        }
        let minutes = (hours * 60.0).round() as i64;
        let sla = Duration::try_minutes(minutes)?;
        sample_date.checked_add_signed(sla)
    }

    /// 判定后端已存样本
    ///
    /// 读数无效的样本按 FAIL 处理 (阈值取该区域阈值), 需要复测
    pub fn classify_recorded(rlu: f64, zone: Zone, config: &AtpThresholdConfig) -> SwabClassification {
        match Self::classify(rlu, zone, config) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(zone = %zone, "invalid RLU from backend: {}", e);
                SwabClassification {
                    status: SwabStatus::Fail,
                    threshold_used: config.threshold_for(zone),
                }
            }
        }
    }

    /// 按区域汇总样本
    ///
    /// - 样本所属区域由 location_zones (location_id → zone) 提供, 找不到的样本跳过
    /// - 样本状态一律按当前配置重新判定, 不使用后端返回的 status
    /// - 读数无效的样本计为 FAIL (见 classify_recorded)
    pub fn summarize_by_zone(
        samples: &[AtpSample],
        location_zones: &HashMap<i64, Zone>,
        config: &AtpThresholdConfig,
    ) -> BTreeMap<Zone, ZoneSummary> {
        let mut summary: BTreeMap<Zone, ZoneSummary> = BTreeMap::new();

        for sample in samples {
            let zone = match location_zones.get(&sample.location_id) {
                Some(z) => *z,
                None => {
                    tracing::debug!(
                        location_id = sample.location_id,
                        "sample location not found, skipped"
                    );
                    continue;
                }
            };

            let failed = Self::classify_recorded(sample.rlu, zone, config).status == SwabStatus::Fail;

            let entry = summary.entry(zone).or_default();
            entry.total += 1;
            if failed {
                entry.failed += 1;
            }
        }

        summary
    }
}
