// ==========================================
// quickLOG 质量模块 - 命令行入口
// ==========================================
// 用法见 `quicklog` (无参数) 输出
// ==========================================

use std::process::ExitCode;

use anyhow::Context;

use quicklog_quality::app::{self, AppState, Command};
use quicklog_quality::config::ConfigManager;
use quicklog_quality::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // 初始化日志系统
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(c) => c,
        Err(usage) => {
            eprintln!("{}", usage);
            return Ok(ExitCode::from(2));
        }
    };

    let config = ConfigManager::load().map_err(|e| anyhow::anyhow!("加载配置失败: {}", e))?;
    i18n::set_locale(&config.locale);
    tracing::debug!("quickLOG {} 启动, 后端: {}", quicklog_quality::VERSION, config.api_base);

    let mut state = AppState::new(config).context("初始化AppState失败")?;

    let code = match app::run(&mut state, command).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = ?e.kind(), "命令失败: {}", e);
            state.report(&e);
            ExitCode::FAILURE
        }
    };

    for message in state.visible_banners() {
        eprintln!("{}", message);
    }

    Ok(code)
}
