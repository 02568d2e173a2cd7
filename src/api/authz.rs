// ==========================================
// quickLOG 质量模块 - 操作权限检查
// ==========================================
// 只做客户端侧的界面拦截, 最终以后端鉴权为准
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::session::Session;

/// 需要录入权限 (Operator 及以上)
pub fn require_record(session: &Session, action: &str) -> ApiResult<()> {
    if session.role.can_record() {
        return Ok(());
    }
    Err(ApiError::Forbidden(format!(
        "角色 {} 不能执行: {}",
        session.role, action
    )))
}

/// 需要配置权限 (Manager 及以上)
pub fn require_configure(session: &Session, action: &str) -> ApiResult<()> {
    if session.role.can_configure() {
        return Ok(());
    }
    Err(ApiError::Forbidden(format!(
        "角色 {} 不能执行: {}",
        session.role, action
    )))
}
