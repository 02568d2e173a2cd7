// ==========================================
// quickLOG 质量模块 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 引擎层只产生"校验失败"类错误
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 拭子输入 =====
    #[error("RLU 读数无效: {0}")]
    InvalidRlu(String),

    // ===== CAPA 单向约束 =====
    #[error("严重度为 3 时不允许取消 CAPA")]
    CapaLocked,

    // ===== 阈值配置 =====
    #[error("阈值配置无效 (field={field}): {message}")]
    InvalidThreshold { field: String, message: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
