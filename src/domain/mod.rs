// ==========================================
// quickLOG 质量模块 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、会话上下文
// 约束: 不含网络访问逻辑, 不含判定引擎逻辑
// ==========================================

pub mod complaint;
pub mod environmental;
pub mod session;
pub mod thresholds;
pub mod types;

// 重导出核心类型
pub use complaint::{
    CategoryCount, Complaint, ComplaintCategory, ComplaintDraft, ComplaintSummary, GuidanceRule,
    MonthlyComplaintPoint,
};
pub use environmental::{
    AtpSample, AtpSampleInput, AtpSampleSubmission, AtpThresholdConfig, EnvironmentalLocation,
    RluThreshold,
};
pub use session::{Session, SessionError};
pub use thresholds::{RateThresholds, ThresholdConfig};
pub use types::{
    ComplaintSource, RateStatus, RiskType, SampleTiming, SeverityLevel, SwabStatus, UserRole, Zone,
};
