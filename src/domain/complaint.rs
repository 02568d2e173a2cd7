// ==========================================
// quickLOG 质量模块 - 投诉领域模型
// ==========================================
// 实体归后端所有, 客户端只持有临时副本
// 线上字段: camelCase (complaint_date / customer_name 除外)
// ==========================================

use crate::domain::types::{ComplaintSource, RiskType, SeverityLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ComplaintCategory - 投诉类别
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCategory {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

// ==========================================
// GuidanceRule - 分级指导规则
// ==========================================
// 不变式: always_severity3=true 时有效严重度恒为 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRule {
    pub id: i64,
    pub category_id: i64,
    pub label: String,
    pub risk_type: RiskType,
    pub severity_level: SeverityLevel,
    #[serde(default)]
    pub always_severity3: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl GuidanceRule {
    /// 有效严重度 (考虑 always_severity3 覆写)
    pub fn effective_severity(&self) -> SeverityLevel {
        if self.always_severity3 {
            SeverityLevel::S3
        } else {
            self.severity_level
        }
    }
}

// ==========================================
// Complaint - 投诉记录
// ==========================================
// 不变式: severity_level=3 ⇒ capa_required=true (录入时强制, 单向)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: i64,
    #[serde(rename = "complaint_date")]
    pub complaint_date: NaiveDate,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub batch_id: Option<i64>,
    pub category_id: i64,
    #[serde(default)]
    pub guidance_rule_id: Option<i64>,
    pub risk_type: RiskType,
    pub severity_level: SeverityLevel,
    pub capa_required: bool,
    #[serde(default)]
    pub capa_reason: Option<String>,
    pub source: ComplaintSource,
    #[serde(rename = "customer_name", default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Complaint {
    /// 检查 CAPA 不变式是否成立
    pub fn satisfies_capa_invariant(&self) -> bool {
        !self.severity_level.is_critical() || self.capa_required
    }
}

// ==========================================
// ComplaintDraft - 投诉录入表单状态
// ==========================================
// 新建与编辑共用; 提交前由 CapaEnforcer 与校验器处理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDraft {
    #[serde(rename = "complaint_date")]
    pub complaint_date: NaiveDate,
    pub product_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub category_id: Option<i64>,
    pub guidance_rule_id: Option<i64>,
    pub risk_type: RiskType,
    pub severity_level: SeverityLevel,
    pub capa_required: bool,
    pub capa_reason: Option<String>,
    pub source: ComplaintSource,
    #[serde(rename = "customer_name")]
    pub customer_name: Option<String>,
    pub notes: Option<String>,
}

impl ComplaintDraft {
    /// 新建表单 (默认: QUALITY / 1 / 无 CAPA / 客户来源)
    pub fn new(complaint_date: NaiveDate) -> Self {
        Self {
            complaint_date,
            product_id: None,
            batch_id: None,
            category_id: None,
            guidance_rule_id: None,
            risk_type: RiskType::default(),
            severity_level: SeverityLevel::default(),
            capa_required: false,
            capa_reason: None,
            source: ComplaintSource::default(),
            customer_name: None,
            notes: None,
        }
    }

    /// 由已有投诉生成编辑表单
    pub fn from_complaint(complaint: &Complaint) -> Self {
        Self {
            complaint_date: complaint.complaint_date,
            product_id: complaint.product_id,
            batch_id: complaint.batch_id,
            category_id: Some(complaint.category_id),
            guidance_rule_id: complaint.guidance_rule_id,
            risk_type: complaint.risk_type,
            severity_level: complaint.severity_level,
            // 历史记录可能违反不变式, 编辑时即补齐
            capa_required: complaint.capa_required || complaint.severity_level.is_critical(),
            capa_reason: complaint.capa_reason.clone(),
            source: complaint.source,
            customer_name: complaint.customer_name.clone(),
            notes: complaint.notes.clone(),
        }
    }
}

// ==========================================
// ComplaintSummary - 投诉汇总组件数据
// ==========================================
// 来源: /api/analytics/widgets/complaints.summary 的 data 部分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSummary {
    #[serde(default)]
    pub months: Vec<MonthlyComplaintPoint>,
    #[serde(default)]
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyComplaintPoint {
    pub month: String, // YYYY-MM
    pub complaints: u32,
    #[serde(default)]
    pub units_produced: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category_id: i64,
    #[serde(default)]
    pub label: Option<String>,
    pub count: u32,
}

fn default_true() -> bool {
    true
}
