// ==========================================
// quickLOG 质量模块 - 后端接口路径
// ==========================================
// 路径即契约, 不得改动
// ==========================================

pub const COMPLAINTS: &str = "/api/complaints";
pub const COMPLAINT_CATEGORIES: &str = "/api/complaints/categories";
pub const COMPLAINT_GUIDANCE_RULES: &str = "/api/complaints/guidance-rules";
pub const COMPLAINTS_SUMMARY_WIDGET: &str = "/api/analytics/widgets/complaints.summary";

pub const ENV_LOCATIONS: &str = "/api/analytics/environmental/locations";
pub const ENV_ATP: &str = "/api/analytics/environmental/atp";

pub const LABOR_MONTHLY: &str = "/api/analytics/labor/monthly";
pub const PRODUCTS: &str = "/api/products";
pub const ORDERS: &str = "/api/orders";
pub const INVENTORY: &str = "/api/inventory";
pub const TRACEABILITY_LOGS: &str = "/api/traceability-logs";
pub const LOGS: &str = "/api/logs";
pub const USERS: &str = "/api/users";

/// 单条记录路径: {collection}/{id}
pub fn item(collection: &str, id: i64) -> String {
    format!("{}/{}", collection.trim_end_matches('/'), id)
}
