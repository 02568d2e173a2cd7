// ==========================================
// quickLOG 质量模块 - 投诉 API
// ==========================================
// 职责: 投诉 / 类别 / 指导规则 / 汇总组件的读写
// 红线: 每条提交路径都重新执行指导解析与 CAPA 棘轮
// ==========================================

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use crate::api::authz::{require_configure, require_record};
use crate::api::endpoints;
use crate::api::error::{ApiError, ApiResult};
use crate::api::transport::{decode, decode_list, ApiTransport};
use crate::api::validator::ComplaintEntryValidator;
use crate::config::{WidgetConfig, WidgetKey};
use crate::domain::complaint::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintSummary, GuidanceRule,
};
use crate::domain::session::Session;
use crate::domain::thresholds::ThresholdConfig;
use crate::domain::types::{ComplaintSource, SeverityLevel};
use crate::engine::{CapaEnforcer, ComplaintTrend, GuidanceResolver, RateClassifier, TrendShaper};

// ==========================================
// 查询条件
// ==========================================

/// 投诉列表查询
///
/// 日期区间与类别下推到后端, 其余条件在客户端过滤
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub source: Option<ComplaintSource>,
    pub min_severity: Option<SeverityLevel>,
    pub capa_only: bool,
}

impl ComplaintFilter {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from {
            query.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to".to_string(), to.to_string()));
        }
        if let Some(category_id) = self.category_id {
            query.push(("categoryId".to_string(), category_id.to_string()));
        }
        query
    }

    fn matches(&self, c: &Complaint) -> bool {
        if let Some(source) = self.source {
            if c.source != source {
                return false;
            }
        }
        if let Some(min) = self.min_severity {
            if c.severity_level < min {
                return false;
            }
        }
        !self.capa_only || c.capa_required
    }
}

/// 投诉汇总看板 (配置 + 趋势)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDashboard {
    pub thresholds: ThresholdConfig,
    pub trend: ComplaintTrend,
}

// ==========================================
// ComplaintApi - 投诉 API
// ==========================================
pub struct ComplaintApi {
    transport: Arc<dyn ApiTransport>,
    resolver: GuidanceResolver,
    shaper: TrendShaper,
}

impl ComplaintApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            resolver: GuidanceResolver::new(),
            shaper: TrendShaper::new(),
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 投诉列表 (按日期倒序, 同日按 id 倒序)
    #[instrument(skip(self))]
    pub async fn list_complaints(&self, filter: &ComplaintFilter) -> ApiResult<Vec<Complaint>> {
        let value = self
            .transport
            .get(endpoints::COMPLAINTS, &filter.to_query())
            .await?;
        let mut complaints: Vec<Complaint> = decode_list(value)?;

        complaints.retain(|c| filter.matches(c));
        complaints.sort_by(|a, b| {
            b.complaint_date
                .cmp(&a.complaint_date)
                .then_with(|| b.id.cmp(&a.id))
        });

        let broken = complaints
            .iter()
            .filter(|c| !c.satisfies_capa_invariant())
            .count();
        if broken > 0 {
            tracing::warn!(count = broken, "complaints with severity 3 but no CAPA from backend");
        }

        Ok(complaints)
    }

    pub async fn get_complaint(&self, id: i64) -> ApiResult<Complaint> {
        let value = self
            .transport
            .get(&endpoints::item(endpoints::COMPLAINTS, id), &[])
            .await?;
        decode(value)
    }

    /// 类别列表 (按 sort_order, 再按名称)
    pub async fn list_categories(&self) -> ApiResult<Vec<ComplaintCategory>> {
        let value = self
            .transport
            .get(endpoints::COMPLAINT_CATEGORIES, &[])
            .await?;
        let mut categories: Vec<ComplaintCategory> = decode_list(value)?;
        categories.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    /// 指导规则全集 (含停用规则, 编辑旧投诉时需要)
    pub async fn list_guidance_rules(&self) -> ApiResult<Vec<GuidanceRule>> {
        let value = self
            .transport
            .get(endpoints::COMPLAINT_GUIDANCE_RULES, &[])
            .await?;
        decode_list(value)
    }

    /// 某类别可选的指导规则 (启用的, 已排序)
    pub async fn guidance_options(&self, category_id: i64) -> ApiResult<Vec<GuidanceRule>> {
        let rules = self.list_guidance_rules().await?;
        Ok(self
            .resolver
            .rules_for_category(&rules, category_id)
            .into_iter()
            .cloned()
            .collect())
    }

    // ==========================================
    // 录入
    // ==========================================

    /// 新建投诉
    #[instrument(skip(self, session, draft, rules), fields(role = %session.role))]
    pub async fn create_complaint(
        &self,
        session: &Session,
        draft: &ComplaintDraft,
        rules: &[GuidanceRule],
    ) -> ApiResult<Complaint> {
        require_record(session, "新建投诉")?;
        let payload = self.prepare_submission(draft, rules)?;

        let value = self.transport.post(endpoints::COMPLAINTS, payload).await?;
        let created: Complaint = decode(value)?;
        tracing::info!(id = created.id, severity = %created.severity_level, "complaint created");
        Ok(created)
    }

    /// 修改投诉
    #[instrument(skip(self, session, draft, rules), fields(role = %session.role))]
    pub async fn update_complaint(
        &self,
        session: &Session,
        id: i64,
        draft: &ComplaintDraft,
        rules: &[GuidanceRule],
    ) -> ApiResult<Complaint> {
        require_record(session, "修改投诉")?;
        let payload = self.prepare_submission(draft, rules)?;

        let value = self
            .transport
            .put(&endpoints::item(endpoints::COMPLAINTS, id), payload)
            .await?;
        decode(value)
    }

    pub async fn delete_complaint(&self, session: &Session, id: i64) -> ApiResult<()> {
        require_configure(session, "删除投诉")?;
        self.transport
            .delete(&endpoints::item(endpoints::COMPLAINTS, id))
            .await?;
        tracing::info!(id, "complaint deleted");
        Ok(())
    }

    /// 提交前整理表单
    ///
    /// 1) 关联规则时重新解析 (always_severity3 覆写)
    /// 2) CAPA 棘轮
    /// 3) 空白文本字段置空
    /// 4) 校验
    pub fn prepare_submission(
        &self,
        draft: &ComplaintDraft,
        rules: &[GuidanceRule],
    ) -> ApiResult<Value> {
        let mut draft = draft.clone();

        if let Some(rule_id) = draft.guidance_rule_id {
            if let Some(rule) = rules.iter().find(|r| r.id == rule_id) {
                let category_id = draft.category_id;
                self.resolver.apply_to_draft(&mut draft, Some(rule));
                // 类别以用户选择为准, 不符时交给校验器报错
                if category_id.is_some() {
                    draft.category_id = category_id;
                }
            }
        }
        let severity = draft.severity_level;
        CapaEnforcer::set_severity(&mut draft, severity);

        draft.capa_reason = non_blank(draft.capa_reason.take());
        draft.customer_name = non_blank(draft.customer_name.take());
        draft.notes = non_blank(draft.notes.take());

        ComplaintEntryValidator::validate(&draft, rules, Local::now().date_naive())?;

        Ok(serde_json::to_value(&draft)?)
    }

    // ==========================================
    // 汇总组件与阈值
    // ==========================================

    /// 加载投诉汇总看板
    ///
    /// 组件负载: { "config": {...}, "data": ComplaintSummary }; 缺少 config 时用默认阈值
    #[instrument(skip(self, categories))]
    pub async fn load_dashboard(
        &self,
        categories: &[ComplaintCategory],
    ) -> ApiResult<ComplaintDashboard> {
        let value = self
            .transport
            .get(endpoints::COMPLAINTS_SUMMARY_WIDGET, &[])
            .await?;

        let thresholds = match value.get("config") {
            Some(raw) if !raw.is_null() => {
                match WidgetConfig::decode(WidgetKey::ComplaintsSummary, raw)? {
                    WidgetConfig::ComplaintsSummary(t) => t,
                    other => {
                        return Err(ApiError::Decode(format!(
                            "组件配置类型不符: {}",
                            other.key()
                        )))
                    }
                }
            }
            _ => ThresholdConfig::default(),
        };

        let summary: ComplaintSummary = match value.get("data") {
            Some(data) if !data.is_null() => decode(data.clone())?,
            _ => ComplaintSummary::default(),
        };

        Ok(ComplaintDashboard {
            thresholds,
            trend: self.shaper.shape(&summary, &thresholds, categories),
        })
    }

    /// 保存投诉率阈值
    #[instrument(skip(self, session), fields(role = %session.role))]
    pub async fn save_thresholds(
        &self,
        session: &Session,
        config: &ThresholdConfig,
    ) -> ApiResult<()> {
        require_configure(session, "修改投诉率阈值")?;
        RateClassifier::validate(config)?;

        let body = json!({ "config": WidgetConfig::ComplaintsSummary(*config).encode() });
        self.transport
            .put(endpoints::COMPLAINTS_SUMMARY_WIDGET, body)
            .await?;
        tracing::info!(
            green_max = config.complaints_per_10k.green_max,
            amber_max = config.complaints_per_10k.amber_max,
            "complaint thresholds saved"
        );
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
