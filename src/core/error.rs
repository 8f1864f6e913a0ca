//! 核心错误处理模块
//!
//! 所有处理器都返回 `Result<_, CoreError>`，错误到 HTTP 响应的映射只在这里发生。

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// 未分类错误对外统一返回的消息，内部细节只写日志
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong on the server";

/// 核心错误类型
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    InternalServerError(String),
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 可以原样返回给调用方的消息
    pub fn user_message(&self) -> &str {
        match self {
            CoreError::BadRequest(msg) | CoreError::Unauthorized(msg) | CoreError::NotFound(msg) => {
                msg.as_str()
            }
            CoreError::InternalServerError(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            CoreError::InternalServerError(detail) => {
                error!(status = status.as_u16(), detail = %detail, "请求处理失败");
            }
            _ => warn!(status = status.as_u16(), message = %self, "请求被拒绝"),
        }

        let error_response = ErrorResponse {
            status: "error",
            message: self.user_message().to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for CoreError {
    fn from(rejection: QueryRejection) -> Self {
        CoreError::BadRequest(rejection.body_text())
    }
}
