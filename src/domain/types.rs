// ==========================================
// quickLOG 质量模块 - 领域类型定义
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与后端一致)
// 数值型等级 (严重度/区域) 在线上以整数传输
// ==========================================

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

// ==========================================
// 风险类型 (Risk Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskType {
    #[default]
    Quality,              // 质量
    FoodSafetyRegulatory, // 食品安全/法规
}

impl fmt::Display for RiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskType::Quality => write!(f, "QUALITY"),
            RiskType::FoodSafetyRegulatory => write!(f, "FOOD_SAFETY_REGULATORY"),
        }
    }
}

// ==========================================
// 严重度等级 (Severity Level)
// ==========================================
// 顺序: S1 < S2 < S3, S3 强制 CAPA
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum SeverityLevel {
    #[default]
    S1, // 轻微
    S2, // 一般
    S3, // 严重
}

impl SeverityLevel {
    /// 是否为最高严重度 (触发 CAPA)
    pub fn is_critical(self) -> bool {
        self == SeverityLevel::S3
    }

    pub fn as_u8(self) -> u8 {
        match self {
            SeverityLevel::S1 => 1,
            SeverityLevel::S2 => 2,
            SeverityLevel::S3 => 3,
        }
    }
}

impl TryFrom<u8> for SeverityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SeverityLevel::S1),
            2 => Ok(SeverityLevel::S2),
            3 => Ok(SeverityLevel::S3),
            other => Err(format!("无效的严重度等级: {} (允许 1-3)", other)),
        }
    }
}

impl From<SeverityLevel> for u8 {
    fn from(level: SeverityLevel) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ==========================================
// 投诉来源 (Complaint Source)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintSource {
    #[default]
    Customer,    // 客户
    Internal,    // 内部
    Distributor, // 经销商
}

impl fmt::Display for ComplaintSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintSource::Customer => write!(f, "CUSTOMER"),
            ComplaintSource::Internal => write!(f, "INTERNAL"),
            ComplaintSource::Distributor => write!(f, "DISTRIBUTOR"),
        }
    }
}

// ==========================================
// 投诉率状态 (Rate Status)
// ==========================================
// Indeterminate: 投诉率缺失或非有限值, 显示 "—" 且不着色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateStatus {
    Green,
    Amber,
    Red,
    Indeterminate,
}

impl RateStatus {
    /// 对应的 i18n 键
    pub fn label_key(self) -> &'static str {
        match self {
            RateStatus::Green => "rate_status.green",
            RateStatus::Amber => "rate_status.amber",
            RateStatus::Red => "rate_status.red",
            RateStatus::Indeterminate => "rate_status.indeterminate",
        }
    }

    pub fn is_colored(self) -> bool {
        self != RateStatus::Indeterminate
    }
}

impl fmt::Display for RateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateStatus::Green => write!(f, "GREEN"),
            RateStatus::Amber => write!(f, "AMBER"),
            RateStatus::Red => write!(f, "RED"),
            RateStatus::Indeterminate => write!(f, "—"),
        }
    }
}

// ==========================================
// 拭子判定结果 (Swab Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwabStatus {
    Pass,
    Fail,
}

impl fmt::Display for SwabStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwabStatus::Pass => write!(f, "PASS"),
            SwabStatus::Fail => write!(f, "FAIL"),
        }
    }
}

// ==========================================
// 卫生区域 (Hygiene Zone)
// ==========================================
// 1 = 最高风险 (直接接触食品), 4 = 最低风险
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Zone {
    Z1,
    Z2,
    Z3,
    Z4,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Z1, Zone::Z2, Zone::Z3, Zone::Z4];

    pub fn as_u8(self) -> u8 {
        match self {
            Zone::Z1 => 1,
            Zone::Z2 => 2,
            Zone::Z3 => 3,
            Zone::Z4 => 4,
        }
    }
}

impl TryFrom<u8> for Zone {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Zone::Z1),
            2 => Ok(Zone::Z2),
            3 => Ok(Zone::Z3),
            4 => Ok(Zone::Z4),
            other => Err(format!("无效的卫生区域: {} (允许 1-4)", other)),
        }
    }
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> Self {
        zone.as_u8()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ==========================================
// 取样时机 (Sample Timing)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleTiming {
    PreOp,      // 开工前
    PostClean,  // 清洁后
    InProcess,  // 生产中
}

impl fmt::Display for SampleTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleTiming::PreOp => write!(f, "PRE_OP"),
            SampleTiming::PostClean => write!(f, "POST_CLEAN"),
            SampleTiming::InProcess => write!(f, "IN_PROCESS"),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 未知角色按 Viewer 处理 (只读)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum UserRole {
    #[default]
    Viewer,
    Operator,
    Manager,
    Admin,
}

impl UserRole {
    /// 从令牌中的角色字符串解析 (大小写不敏感)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => UserRole::Admin,
            "MANAGER" => UserRole::Manager,
            "OPERATOR" => UserRole::Operator,
            _ => UserRole::Viewer,
        }
    }

    /// 是否可以录入/编辑业务记录 (投诉、拭子)
    pub fn can_record(self) -> bool {
        self >= UserRole::Operator
    }

    /// 是否可以修改阈值/指导规则等配置
    pub fn can_configure(self) -> bool {
        self >= UserRole::Manager
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::parse(&s)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Viewer => write!(f, "VIEWER"),
            UserRole::Operator => write!(f, "OPERATOR"),
            UserRole::Manager => write!(f, "MANAGER"),
            UserRole::Admin => write!(f, "ADMIN"),
        }
    }
}
