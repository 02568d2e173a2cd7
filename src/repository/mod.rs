// ==========================================
// quickLOG 质量模块 - 本地仓储层
// ==========================================
// 职责: 本地持久化 (仅会话令牌)
// 业务实体一律由后端持久化, 不在此层缓存
// ==========================================

pub mod error;
pub mod token_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use token_repo::TokenRepository;
