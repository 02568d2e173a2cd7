// ==========================================
// quickLOG 质量模块 - 应用层
// ==========================================
// 职责: 会话/提示条状态与命令行命令分发
// ==========================================

pub mod banner;
pub mod commands;
pub mod state;

// 重导出
pub use banner::{Banner, BannerLevel, BannerQueue};
pub use commands::{run, Command, USAGE};
pub use state::{http_transport_factory, AppState, TransportFactory};
