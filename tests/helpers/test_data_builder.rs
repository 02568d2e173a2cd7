// ==========================================
// 测试数据构建器
// ==========================================

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use serde_json::{json, Value};

use quicklog_quality::domain::{
    ComplaintCategory, EnvironmentalLocation, GuidanceRule, RiskType, SeverityLevel, Session, Zone,
};

/// 构造未签名的 JWT 形式令牌
pub fn token_for(role: &str, sub: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "role": role, "sub": sub }).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn session_for(role: &str) -> Session {
    Session::from_token(&token_for(role, "tester")).unwrap()
}

pub fn category(id: i64, name: &str, sort_order: i32) -> ComplaintCategory {
    ComplaintCategory {
        id,
        name: name.to_string(),
        is_active: true,
        sort_order,
    }
}

pub fn rule(id: i64, category_id: i64, label: &str, severity: SeverityLevel) -> GuidanceRule {
    GuidanceRule {
        id,
        category_id,
        label: label.to_string(),
        risk_type: RiskType::Quality,
        severity_level: severity,
        always_severity3: false,
        is_active: true,
        sort_order: 0,
    }
}

pub fn location(id: i64, code: &str, zone: Zone) -> EnvironmentalLocation {
    EnvironmentalLocation {
        id,
        code: code.to_string(),
        name: format!("Location {}", code),
        zone,
        is_active: true,
    }
}

/// 后端投诉记录 JSON
pub fn complaint_json(id: i64, date: NaiveDate, severity: u8, capa: bool) -> Value {
    json!({
        "id": id,
        "complaint_date": date.format("%Y-%m-%d").to_string(),
        "categoryId": 1,
        "riskType": "QUALITY",
        "severityLevel": severity,
        "capaRequired": capa,
        "source": "CUSTOMER"
    })
}
