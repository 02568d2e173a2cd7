// ==========================================
// quickLOG 质量模块 - 配置层
// ==========================================
// 职责: 客户端配置加载 (文件 + 环境变量覆写)
//       组件配置按组件键分版本解码
// ==========================================

pub mod config_manager;
pub mod widget_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, default_token_db_path, ClientConfig, ConfigManager};
pub use widget_config::{WidgetConfig, WidgetConfigError, WidgetKey, WIDGETS_BASE};
