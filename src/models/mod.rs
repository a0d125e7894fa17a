//! 数据模型模块
//! 数据库行类型与请求/响应 DTO

pub mod auth;
pub mod category;
pub mod recipe;
pub mod user;
