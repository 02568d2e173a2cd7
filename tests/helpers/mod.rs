// ==========================================
// 测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod mock_transport;
pub mod test_data_builder;
