//! # 产品目录服务
//!
//! 基于 Axum 的内存产品目录，提供产品的增删改查、分类过滤分页、名称搜索和分类统计。
//! - `app`：产品模型、存储、服务和 HTTP 处理器
//! - `core`：统一错误响应和中间件
//! - `infrastructure`：配置和日志

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::{
    build_router,
    product::{handler::AppState, model::Product, store::CatalogStore},
};
pub use crate::core::error::CoreError;
pub use infrastructure::config::{AppConfig, ConfigError};
