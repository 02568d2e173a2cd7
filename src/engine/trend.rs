// ==========================================
// quickLOG 质量模块 - 投诉趋势整形引擎
// ==========================================
// 职责: 将汇总组件数据整形为图表序列
// 输入: ComplaintSummary (后端聚合) + ThresholdConfig
// 输出: 按月排序的投诉率点, 每点带色带状态
// 说明: 只使用后端返回的数据, 不生成任何样例数据
// ==========================================

use crate::domain::complaint::{ComplaintCategory, ComplaintSummary};
use crate::domain::thresholds::ThresholdConfig;
use crate::domain::types::RateStatus;
use crate::engine::rate::RateClassifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::instrument;

/// 趋势图上的一个点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub month: String,
    pub complaints: u32,
    pub units_produced: Option<f64>,
    pub rate: Option<f64>,
    pub status: RateStatus,
}

/// 类别分布条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category_id: i64,
    pub label: String,
    pub count: u32,
    pub share: f64, // 0.0-1.0
}

/// 投诉趋势 (图表数据)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintTrend {
    pub points: Vec<TrendPoint>,
    pub categories: Vec<CategoryShare>,
    pub total_complaints: u64,
}

impl ComplaintTrend {
    /// 最近一个月的点
    pub fn latest(&self) -> Option<&TrendPoint> {
        self.points.last()
    }
}

// ==========================================
// TrendShaper - 趋势整形引擎
// ==========================================
pub struct TrendShaper {
    // 无状态引擎
}

impl TrendShaper {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成趋势
    ///
    /// # 参数
    /// - `summary`: 汇总组件数据
    /// - `config`: 阈值配置
    /// - `categories`: 类别列表 (用于补全标签, 可为空)
    #[instrument(skip_all, fields(months = summary.months.len()))]
    pub fn shape(
        &self,
        summary: &ComplaintSummary,
        config: &ThresholdConfig,
        categories: &[ComplaintCategory],
    ) -> ComplaintTrend {
        let mut points: Vec<TrendPoint> = summary
            .months
            .iter()
            .map(|m| {
                let rate = RateClassifier::complaint_rate(m.complaints, m.units_produced);
                TrendPoint {
                    month: m.month.clone(),
                    complaints: m.complaints,
                    units_produced: m.units_produced,
                    rate,
                    status: RateClassifier::classify(rate, &config.complaints_per_10k),
                }
            })
            .collect();
        // YYYY-MM 字典序即时间序
        points.sort_by(|a, b| a.month.cmp(&b.month));

        let total_complaints: u64 = points.iter().map(|p| u64::from(p.complaints)).sum();

        let names: HashMap<i64, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();
        let category_total: u64 = summary.by_category.iter().map(|c| u64::from(c.count)).sum();

        let mut shares: Vec<CategoryShare> = summary
            .by_category
            .iter()
            .map(|c| CategoryShare {
                category_id: c.category_id,
                label: c
                    .label
                    .clone()
                    .or_else(|| names.get(&c.category_id).map(|n| n.to_string()))
                    .unwrap_or_else(|| format!("#{}", c.category_id)),
                count: c.count,
                share: if category_total == 0 {
                    0.0
                } else {
                    c.count as f64 / category_total as f64
                },
            })
            .collect();
        shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

        ComplaintTrend {
            points,
            categories: shares,
            total_complaints,
        }
    }
}

impl Default for TrendShaper {
    fn default() -> Self {
        Self::new()
    }
}
