// ==========================================
// quickLOG 质量模块 - 核心库
// ==========================================
// 范围: 投诉录入指引、CAPA 约束、投诉率色带、ATP 拭子判定
// 技术栈: Rust + REST 后端 + SQLite (本地令牌)
// 系统定位: 客户端判定层 (持久化由后端负责)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 判定规则
pub mod engine;

// 配置层 - 客户端配置与组件配置
pub mod config;

// 数据库基础设施（本地令牌库）
pub mod db;

// 本地仓储层
pub mod repository;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 后端接口
pub mod api;

// 应用层 - 会话与命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ComplaintSource, RateStatus, RiskType, SampleTiming, SeverityLevel, SwabStatus, UserRole, Zone,
};

// 领域实体
pub use domain::{
    AtpSample, AtpThresholdConfig, Complaint, ComplaintCategory, ComplaintDraft, GuidanceRule,
    RateThresholds, Session, ThresholdConfig,
};

// 引擎
pub use engine::{CapaEnforcer, GuidanceResolver, RateClassifier, SwabClassifier, TrendShaper};

// API
pub use api::{ApiError, ApiResult, ComplaintApi, EnvironmentalApi, ResourceApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "quickLOG Quality";
