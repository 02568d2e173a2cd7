// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::types::{RateStatus, SwabStatus};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use quicklog_quality::i18n::t;
/// let msg = t("banner.fetch_failed");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use quicklog_quality::i18n::t_with_args;
/// let msg = t_with_args("banner.fetch_failed", &[("detail", "timeout")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 投诉率色带显示文案 (INDETERMINATE 显示 "—")
pub fn rate_status_label(status: RateStatus) -> String {
    t(status.label_key())
}

/// 拭子判定显示文案
pub fn swab_status_label(status: SwabStatus) -> String {
    match status {
        SwabStatus::Pass => t("swab_status.pass"),
        SwabStatus::Fail => t("swab_status.fail"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");

        set_locale("en");
        assert_eq!(current_locale(), "en");
    }

    #[test]
    fn test_status_labels() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(rate_status_label(RateStatus::Amber), "Amber");
        assert_eq!(rate_status_label(RateStatus::Indeterminate), "—");
        assert_eq!(swab_status_label(SwabStatus::Fail), "FAIL");

        set_locale("zh-CN");
        assert_eq!(rate_status_label(RateStatus::Red), "红");
        assert_eq!(rate_status_label(RateStatus::Indeterminate), "—");

        set_locale("en");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("banner.fetch_failed", &[("detail", "timeout")]);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("Could not load data"));

        set_locale("zh-CN");
        let msg = t_with_args("banner.validation_failed", &[("detail", "rlu")]);
        assert!(msg.contains("rlu"));
        assert!(msg.contains("校验失败"));

        set_locale("en");
    }
}
