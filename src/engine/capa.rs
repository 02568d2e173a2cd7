// ==========================================
// quickLOG 质量模块 - CAPA 强制规则
// ==========================================
// 单向棘轮: 严重度 3 → capa_required=true; 从不自动取消
// ==========================================

use crate::domain::complaint::ComplaintDraft;
use crate::domain::types::SeverityLevel;
use crate::engine::error::{EngineError, EngineResult};

pub struct CapaEnforcer;

impl CapaEnforcer {
    /// 严重度变化时调用: 3 级强制 CAPA, 其余保持原值
    pub fn enforce(severity: SeverityLevel, capa_required: bool) -> bool {
        severity.is_critical() || capa_required
    }

    /// 修改表单严重度并执行棘轮
    ///
    /// 降低严重度不会清除 capa_required
    pub fn set_severity(draft: &mut ComplaintDraft, severity: SeverityLevel) {
        draft.severity_level = severity;
        draft.capa_required = Self::enforce(severity, draft.capa_required);
    }

    /// 人工切换 CAPA 勾选
    ///
    /// 严重度为 3 时取消 CAPA 被拒绝 (界面上对应禁用状态)
    pub fn set_capa_required(draft: &mut ComplaintDraft, capa_required: bool) -> EngineResult<()> {
        if !capa_required && draft.severity_level.is_critical() {
            return Err(EngineError::CapaLocked);
        }
        draft.capa_required = capa_required;
        Ok(())
    }

    /// CAPA 勾选框是否可编辑
    pub fn capa_toggle_enabled(severity: SeverityLevel) -> bool {
        !severity.is_critical()
    }
}
