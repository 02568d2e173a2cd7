// ==========================================
// quickLOG 质量模块 - 环境监测 API
// ==========================================
// 职责: 取样点 / ATP 样本 / ATP 阈值配置的读写, ATP 看板汇总
// 红线: 拭子状态由客户端按当前阈值判定后随记录提交
// ==========================================

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::api::authz::{require_configure, require_record};
use crate::api::endpoints;
use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::api::transport::{decode, decode_list, ApiTransport};
use crate::api::validator::AtpSampleValidator;
use crate::config::{WidgetConfig, WidgetKey};
use crate::domain::environmental::{
    AtpSample, AtpSampleInput, AtpSampleSubmission, AtpThresholdConfig, EnvironmentalLocation,
};
use crate::domain::session::Session;
use crate::domain::types::{SwabStatus, Zone};
use crate::engine::swab::{SwabClassification, SwabClassifier, ZoneSummary, MAX_RETEST_SLA_HOURS};

// ==========================================
// 请求 / 响应结构
// ==========================================

/// 新建/修改取样点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub code: String,
    pub name: String,
    pub zone: Zone,
    pub is_active: bool,
}

/// ATP 样本查询
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub location_id: Option<i64>,
}

impl AtpQuery {
    fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from {
            query.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to".to_string(), to.to_string()));
        }
        if let Some(location_id) = self.location_id {
            query.push(("locationId".to_string(), location_id.to_string()));
        }
        query
    }
}

/// 录入结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedSample {
    pub sample: AtpSample,
    pub classification: SwabClassification,
    pub retest_due_at: Option<NaiveDateTime>,
}

/// 待复测样本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRetest {
    pub sample_id: i64,
    pub location_code: String,
    pub zone: Zone,
    pub rlu: f64,
    pub threshold_used: f64,
    pub retest_due_at: Option<NaiveDateTime>,
}

/// ATP 看板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtpOverview {
    pub config: AtpThresholdConfig,
    pub zones: BTreeMap<Zone, ZoneSummary>,
    pub failures: Vec<PendingRetest>,
}

// ==========================================
// EnvironmentalApi - 环境监测 API
// ==========================================
pub struct EnvironmentalApi {
    transport: Arc<dyn ApiTransport>,
}

impl EnvironmentalApi {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    // ==========================================
    // 取样点
    // ==========================================

    /// 取样点列表 (按区域, 再按编码)
    pub async fn list_locations(&self, active_only: bool) -> ApiResult<Vec<EnvironmentalLocation>> {
        let value = self.transport.get(endpoints::ENV_LOCATIONS, &[]).await?;
        let mut locations: Vec<EnvironmentalLocation> = decode_list(value)?;
        if active_only {
            locations.retain(|l| l.is_active);
        }
        locations.sort_by(|a, b| a.zone.cmp(&b.zone).then_with(|| a.code.cmp(&b.code)));
        Ok(locations)
    }

    /// 新建取样点 (编码唯一, 大小写不敏感)
    #[instrument(skip(self, session), fields(role = %session.role))]
    pub async fn create_location(
        &self,
        session: &Session,
        input: &LocationInput,
    ) -> ApiResult<EnvironmentalLocation> {
        require_configure(session, "新建取样点")?;
        let existing = self.list_locations(false).await?;
        let input = Self::validate_location(input, &existing, None)?;

        let value = self
            .transport
            .post(endpoints::ENV_LOCATIONS, serde_json::to_value(&input)?)
            .await?;
        decode(value)
    }

    /// 修改取样点
    #[instrument(skip(self, session), fields(role = %session.role))]
    pub async fn update_location(
        &self,
        session: &Session,
        id: i64,
        input: &LocationInput,
    ) -> ApiResult<EnvironmentalLocation> {
        require_configure(session, "修改取样点")?;
        let existing = self.list_locations(false).await?;
        let input = Self::validate_location(input, &existing, Some(id))?;

        let value = self
            .transport
            .put(
                &endpoints::item(endpoints::ENV_LOCATIONS, id),
                serde_json::to_value(&input)?,
            )
            .await?;
        decode(value)
    }

    fn validate_location(
        input: &LocationInput,
        existing: &[EnvironmentalLocation],
        editing_id: Option<i64>,
    ) -> ApiResult<LocationInput> {
        let mut violations = Vec::new();
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();

        if code.is_empty() {
            violations.push(ValidationViolation::new("code", "编码不能为空"));
        } else if existing
            .iter()
            .any(|l| Some(l.id) != editing_id && l.code.eq_ignore_ascii_case(&code))
        {
            violations.push(ValidationViolation::new(
                "code",
                format!("编码 {} 已存在", code),
            ));
        }
        if name.is_empty() {
            violations.push(ValidationViolation::new("name", "名称不能为空"));
        }

        if !violations.is_empty() {
            return Err(ApiError::EntryValidationError {
                reason: format!("{}项取样点字段无效", violations.len()),
                violations,
            });
        }

        Ok(LocationInput {
            code,
            name,
            zone: input.zone,
            is_active: input.is_active,
        })
    }

    // ==========================================
    // ATP 样本
    // ==========================================

    /// ATP 样本列表 (按取样时间倒序)
    pub async fn list_samples(&self, query: &AtpQuery) -> ApiResult<Vec<AtpSample>> {
        let value = self
            .transport
            .get(endpoints::ENV_ATP, &query.to_query())
            .await?;
        let mut samples: Vec<AtpSample> = decode_list(value)?;
        samples.sort_by(|a, b| {
            b.sample_date
                .cmp(&a.sample_date)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(samples)
    }

    /// 录入 ATP 样本
    ///
    /// 校验 → 按取样点区域判定 → 提交 (附 status 与 thresholdUsed)
    #[instrument(skip(self, session, input, locations, config), fields(role = %session.role))]
    pub async fn record_sample(
        &self,
        session: &Session,
        input: &AtpSampleInput,
        locations: &[EnvironmentalLocation],
        config: &AtpThresholdConfig,
    ) -> ApiResult<RecordedSample> {
        require_record(session, "录入 ATP 样本")?;

        let location = locations.iter().find(|l| l.id == input.location_id);
        let rlu = AtpSampleValidator::validate(input, location)?;
        let zone = location
            .map(|l| l.zone)
            .ok_or_else(|| ApiError::InvalidInput(format!("取样点 {} 不存在", input.location_id)))?;

        let classification = SwabClassifier::classify(rlu, zone, config)?;
        let submission = AtpSampleSubmission {
            sample_date: input.sample_date,
            location_id: input.location_id,
            rlu,
            timing: input.timing,
            status: classification.status,
            threshold_used: classification.threshold_used,
            notes: input
                .notes
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        };

        let value = self
            .transport
            .post(endpoints::ENV_ATP, serde_json::to_value(&submission)?)
            .await?;
        let sample: AtpSample = decode(value)?;

        if classification.status == SwabStatus::Fail {
            tracing::warn!(
                sample_id = sample.id,
                zone = %zone,
                rlu,
                threshold = classification.threshold_used,
                "ATP swab failed"
            );
        }

        Ok(RecordedSample {
            retest_due_at: SwabClassifier::retest_due_at(
                sample.sample_date,
                classification.status,
                config,
            ),
            sample,
            classification,
        })
    }

    // ==========================================
    // ATP 阈值配置
    // ==========================================

    /// 读取 ATP 阈值配置 (未配置时返回默认值)
    ///
    /// 后端返回的配置同样要通过 validate_config, 否则视为解析失败
    pub async fn load_config(&self) -> ApiResult<AtpThresholdConfig> {
        let value = self
            .transport
            .get(&WidgetKey::EnvironmentalAtp.path(), &[])
            .await?;

        let config = match value.get("config") {
            Some(raw) if !raw.is_null() => {
                match WidgetConfig::decode(WidgetKey::EnvironmentalAtp, raw)? {
                    WidgetConfig::EnvironmentalAtp(c) => c,
                    other => {
                        return Err(ApiError::Decode(format!(
                            "组件配置类型不符: {}",
                            other.key()
                        )))
                    }
                }
            }
            _ => return Ok(AtpThresholdConfig::default()),
        };

        Self::validate_config(&config)
            .map_err(|e| ApiError::Decode(format!("后端 ATP 阈值配置无效: {}", e)))?;
        Ok(config)
    }

    /// 保存 ATP 阈值配置
    #[instrument(skip(self, session, config), fields(role = %session.role))]
    pub async fn save_config(&self, session: &Session, config: &AtpThresholdConfig) -> ApiResult<()> {
        require_configure(session, "修改 ATP 阈值")?;
        Self::validate_config(config)?;

        let body = json!({ "config": WidgetConfig::EnvironmentalAtp(config.clone()).encode() });
        self.transport
            .put(&WidgetKey::EnvironmentalAtp.path(), body)
            .await?;
        tracing::info!("ATP threshold config saved");
        Ok(())
    }

    /// 阈值必须为非负有限数, 复测时限必须为正且不超过一年
    pub fn validate_config(config: &AtpThresholdConfig) -> ApiResult<()> {
        let mut violations = Vec::new();

        let mut check = |field: String, value: f64| {
            if !value.is_finite() || value < 0.0 {
                violations.push(ValidationViolation::new(
                    &field,
                    format!("必须为非负有限数, 实际为 {}", value),
                ));
            }
        };
        check("default.passMaxRlu".to_string(), config.default.pass_max_rlu);
        for (zone, threshold) in &config.zones {
            check(format!("zones.{}.passMaxRlu", zone), threshold.pass_max_rlu);
        }

        let sla = config.retest_sla_hours;
        if !sla.is_finite() || sla <= 0.0 || sla > MAX_RETEST_SLA_HOURS {
            violations.push(ValidationViolation::new(
                "retestSlaHours",
                format!("必须在 (0, {}] 小时之间, 实际为 {}", MAX_RETEST_SLA_HOURS, sla),
            ));
        }

        if violations.is_empty() {
            return Ok(());
        }
        Err(ApiError::EntryValidationError {
            reason: format!("{}项 ATP 阈值无效", violations.len()),
            violations,
        })
    }

    // ==========================================
    // ATP 看板
    // ==========================================

    /// 汇总 ATP 看板: 三个请求并发拉取
    #[instrument(skip(self))]
    pub async fn overview(&self, query: &AtpQuery) -> ApiResult<AtpOverview> {
        let (locations, samples, config) = futures::try_join!(
            self.list_locations(false),
            self.list_samples(query),
            self.load_config(),
        )?;

        let location_map: HashMap<i64, &EnvironmentalLocation> =
            locations.iter().map(|l| (l.id, l)).collect();
        let zones_by_location: HashMap<i64, Zone> =
            locations.iter().map(|l| (l.id, l.zone)).collect();

        let zones = SwabClassifier::summarize_by_zone(&samples, &zones_by_location, &config);

        let mut failures = Vec::new();
        for sample in &samples {
            let location = match location_map.get(&sample.location_id) {
                Some(l) => *l,
                None => continue,
            };
            let classification =
                SwabClassifier::classify_recorded(sample.rlu, location.zone, &config);
            if classification.status == SwabStatus::Fail {
                failures.push(PendingRetest {
                    sample_id: sample.id,
                    location_code: location.code.clone(),
                    zone: location.zone,
                    rlu: sample.rlu,
                    threshold_used: classification.threshold_used,
                    retest_due_at: SwabClassifier::retest_due_at(
                        sample.sample_date,
                        SwabStatus::Fail,
                        &config,
                    ),
                });
            }
        }
        // 最早到期的排前面
        failures.sort_by(|a, b| a.retest_due_at.cmp(&b.retest_due_at));

        Ok(AtpOverview {
            config,
            zones,
            failures,
        })
    }
}
