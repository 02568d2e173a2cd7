// ==========================================
// quickLOG 质量模块 - API 层
// ==========================================
// 职责: 基于 REST 后端的业务 API, 供命令行/界面调用
// ==========================================

pub mod authz;
pub mod complaint_api;
pub mod endpoints;
pub mod environmental_api;
pub mod error;
pub mod resource_api;
pub mod transport;
pub mod validator;

// 重导出核心类型
pub use complaint_api::{ComplaintApi, ComplaintDashboard, ComplaintFilter};
pub use environmental_api::{
    AtpOverview, AtpQuery, EnvironmentalApi, LocationInput, PendingRetest, RecordedSample,
};
pub use error::{ApiError, ApiResult, ErrorKind, ValidationViolation};
pub use resource_api::{RecordQuery, ResourceApi, ResourceKind};
pub use transport::{ApiTransport, HttpTransport, Method};
pub use validator::{AtpSampleValidator, ComplaintEntryValidator};
