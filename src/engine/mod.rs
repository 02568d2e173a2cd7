// ==========================================
// quickLOG 质量模块 - 引擎层
// ==========================================
// 职责: 纯函数判定规则, 不做网络访问
// 约束: 所有判定均无状态、幂等, 输入变化即重算
// ==========================================

pub mod capa;
pub mod error;
pub mod guidance;
pub mod rate;
pub mod swab;
pub mod trend;

// 重导出核心引擎
pub use capa::CapaEnforcer;
pub use error::{EngineError, EngineResult};
pub use guidance::{GuidanceResolver, ResolvedGuidance};
pub use rate::{RateClassifier, RATE_PER_UNITS};
pub use swab::{SwabClassification, SwabClassifier, ZoneSummary, MAX_RETEST_SLA_HOURS};
pub use trend::{CategoryShare, ComplaintTrend, TrendPoint, TrendShaper};
