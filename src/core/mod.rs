//! 核心层：错误处理和中间件

pub mod error;
pub mod middleware;
