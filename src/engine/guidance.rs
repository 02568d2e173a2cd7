// ==========================================
// quickLOG 质量模块 - 分级指导解析引擎
// ==========================================
// 职责: 选定指导规则 → {risk_type, severity_level, capa_required}
// 红线: always_severity3=true 时严重度恒为 3; 严重度 3 必须 CAPA
// ==========================================

use crate::domain::complaint::{ComplaintDraft, GuidanceRule};
use crate::domain::types::{RiskType, SeverityLevel};
use crate::engine::capa::CapaEnforcer;
use serde::{Deserialize, Serialize};

/// 解析结果 (投诉表单上的派生字段)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGuidance {
    pub risk_type: RiskType,
    pub severity_level: SeverityLevel,
    pub capa_required: bool,
}

impl Default for ResolvedGuidance {
    fn default() -> Self {
        Self {
            risk_type: RiskType::Quality,
            severity_level: SeverityLevel::S1,
            capa_required: false,
        }
    }
}

// ==========================================
// GuidanceResolver - 分级指导解析引擎
// ==========================================
pub struct GuidanceResolver {
    // 无状态引擎
}

impl GuidanceResolver {
    pub fn new() -> Self {
        Self {}
    }

    /// 解析规则
    ///
    /// # 参数
    /// - `rule`: 选中的指导规则, None 表示未选择
    /// - `current`: 调用方当前字段值 (未选择规则时原样返回)
    ///
    /// # 规则
    /// 1) 有效严重度 = always_severity3 ? 3 : severity_level
    /// 2) 有效严重度为 3 → capa_required=true, 否则沿用 current.capa_required
    pub fn resolve(
        &self,
        rule: Option<&GuidanceRule>,
        current: ResolvedGuidance,
    ) -> ResolvedGuidance {
        let rule = match rule {
            Some(r) => r,
            None => return current,
        };

        let severity_level = rule.effective_severity();
        let capa_required = CapaEnforcer::enforce(severity_level, current.capa_required);

        tracing::debug!(
            rule_id = rule.id,
            severity = %severity_level,
            capa_required,
            "guidance rule resolved"
        );

        ResolvedGuidance {
            risk_type: rule.risk_type,
            severity_level,
            capa_required,
        }
    }

    /// 将规则应用到录入表单
    ///
    /// rule_id 为 None 时清除规则关联, 其余字段保持不变
    pub fn apply_to_draft(&self, draft: &mut ComplaintDraft, rule: Option<&GuidanceRule>) {
        let current = ResolvedGuidance {
            risk_type: draft.risk_type,
            severity_level: draft.severity_level,
            capa_required: draft.capa_required,
        };
        let resolved = self.resolve(rule, current);

        draft.guidance_rule_id = rule.map(|r| r.id);
        if let Some(r) = rule {
            draft.category_id = Some(r.category_id);
        }
        draft.risk_type = resolved.risk_type;
        draft.severity_level = resolved.severity_level;
        draft.capa_required = resolved.capa_required;
    }

    /// 某类别下可选的规则: 仅启用的, 按 sort_order 再按 label 排序
    pub fn rules_for_category<'a>(
        &self,
        rules: &'a [GuidanceRule],
        category_id: i64,
    ) -> Vec<&'a GuidanceRule> {
        let mut selected: Vec<&GuidanceRule> = rules
            .iter()
            .filter(|r| r.is_active && r.category_id == category_id)
            .collect();
        selected.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.label.cmp(&b.label))
        });
        selected
    }
}

impl Default for GuidanceResolver {
    fn default() -> Self {
        Self::new()
    }
}
