// ==========================================
// quickLOG 质量模块 - 录入校验器
// ==========================================
// 职责: 提交前校验投诉录入与拭子录入, 收集全部违规后一次性返回
// 红线: 严重度 3 必须 CAPA; RLU 负数/非数值一律拒绝
// ==========================================

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::complaint::{ComplaintDraft, GuidanceRule};
use crate::domain::environmental::{AtpSampleInput, EnvironmentalLocation};
use crate::engine::swab::SwabClassifier;

// ==========================================
// ComplaintEntryValidator - 投诉录入校验
// ==========================================
pub struct ComplaintEntryValidator;

impl ComplaintEntryValidator {
    /// 校验投诉表单
    ///
    /// # 规则
    /// 1. 必须选择类别
    /// 2. 投诉日期不能晚于 today
    /// 3. 关联的指导规则必须存在且属于所选类别
    /// 4. 严重度 3 必须 capa_required
    pub fn validate(
        draft: &ComplaintDraft,
        rules: &[GuidanceRule],
        today: NaiveDate,
    ) -> ApiResult<()> {
        let mut violations = Vec::new();

        if draft.category_id.is_none() {
            violations.push(ValidationViolation::new("categoryId", "必须选择投诉类别"));
        }

        if draft.complaint_date > today {
            violations.push(ValidationViolation::new(
                "complaint_date",
                format!("投诉日期 {} 晚于今天 {}", draft.complaint_date, today),
            ));
        }

        if let Some(rule_id) = draft.guidance_rule_id {
            match rules.iter().find(|r| r.id == rule_id) {
                None => violations.push(ValidationViolation::new(
                    "guidanceRuleId",
                    format!("指导规则 {} 不存在", rule_id),
                )),
                Some(rule) => {
                    if draft.category_id.is_some() && draft.category_id != Some(rule.category_id) {
                        violations.push(ValidationViolation::new(
                            "guidanceRuleId",
                            format!(
                                "指导规则 {} 属于类别 {}, 与所选类别不符",
                                rule_id, rule.category_id
                            ),
                        ));
                    }
                }
            }
        }

        if draft.severity_level.is_critical() && !draft.capa_required {
            violations.push(ValidationViolation::new(
                "capaRequired",
                "严重度为 3 时必须要求 CAPA",
            ));
        }

        finish(violations)
    }
}

// ==========================================
// AtpSampleValidator - 拭子录入校验
// ==========================================
pub struct AtpSampleValidator;

impl AtpSampleValidator {
    /// 校验拭子录入, 通过后返回 RLU 读数
    ///
    /// # 规则
    /// 1. RLU 必须为有限非负数
    /// 2. 取样点必须存在且启用
    pub fn validate(
        input: &AtpSampleInput,
        location: Option<&EnvironmentalLocation>,
    ) -> ApiResult<f64> {
        let mut violations = Vec::new();

        let rlu = match input.rlu {
            None => {
                violations.push(ValidationViolation::new("rlu", "RLU 读数不是数值"));
                None
            }
            Some(raw) => match SwabClassifier::validate_rlu(raw) {
                Ok(v) => Some(v),
                Err(e) => {
                    violations.push(ValidationViolation::new("rlu", e.to_string()));
                    None
                }
            },
        };

        match location {
            None => violations.push(ValidationViolation::new(
                "locationId",
                format!("取样点 {} 不存在", input.location_id),
            )),
            Some(loc) if !loc.is_active => violations.push(ValidationViolation::new(
                "locationId",
                format!("取样点 {} 已停用", loc.code),
            )),
            Some(_) => {}
        }

        finish(violations)?;
        rlu.ok_or_else(|| ApiError::InternalError("RLU 校验状态不一致".to_string()))
    }
}

fn finish(violations: Vec<ValidationViolation>) -> ApiResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    tracing::debug!(count = violations.len(), "entry validation failed");
    Err(ApiError::EntryValidationError {
        reason: violations
            .iter()
            .map(|v| v.reason.as_str())
            .collect::<Vec<_>>()
            .join("; "),
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{RiskType, SampleTiming, SeverityLevel, Zone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()
    }

    fn location(active: bool) -> EnvironmentalLocation {
        EnvironmentalLocation {
            id: 3,
            code: "L-03".to_string(),
            name: "Slicer blade".to_string(),
            zone: Zone::Z1,
            is_active: active,
        }
    }

    fn input(rlu: Option<f64>) -> AtpSampleInput {
        AtpSampleInput {
            sample_date: today().and_hms_opt(6, 30, 0).unwrap(),
            location_id: 3,
            rlu,
            timing: SampleTiming::PostClean,
            notes: None,
        }
    }

    #[test]
    fn test_complaint_collects_all_violations() {
        let mut draft = ComplaintDraft::new(NaiveDate::from_ymd_opt(2026, 4, 11).unwrap());
        draft.severity_level = SeverityLevel::S3;
        draft.guidance_rule_id = Some(77);

        match ComplaintEntryValidator::validate(&draft, &[], today()) {
            Err(ApiError::EntryValidationError { violations, .. }) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["categoryId", "complaint_date", "guidanceRuleId", "capaRequired"]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rule_category_mismatch() {
        let rule = GuidanceRule {
            id: 1,
            category_id: 5,
            label: "Mould".to_string(),
            risk_type: RiskType::Quality,
            severity_level: SeverityLevel::S2,
            always_severity3: false,
            is_active: true,
            sort_order: 0,
        };
        let mut draft = ComplaintDraft::new(today());
        draft.category_id = Some(6);
        draft.guidance_rule_id = Some(1);
        assert!(ComplaintEntryValidator::validate(&draft, &[rule.clone()], today()).is_err());

        draft.category_id = Some(5);
        assert!(ComplaintEntryValidator::validate(&draft, &[rule], today()).is_ok());
    }

    #[test]
    fn test_atp_rlu_rules() {
        let loc = location(true);
        assert_eq!(
            AtpSampleValidator::validate(&input(Some(12.5)), Some(&loc)).unwrap(),
            12.5
        );
        assert!(AtpSampleValidator::validate(&input(Some(-0.1)), Some(&loc)).is_err());
        assert!(AtpSampleValidator::validate(&input(Some(f64::NAN)), Some(&loc)).is_err());
        assert!(AtpSampleValidator::validate(&input(None), Some(&loc)).is_err());
    }

    #[test]
    fn test_atp_location_rules() {
        assert!(AtpSampleValidator::validate(&input(Some(1.0)), None).is_err());
        assert!(AtpSampleValidator::validate(&input(Some(1.0)), Some(&location(false))).is_err());
    }
}
