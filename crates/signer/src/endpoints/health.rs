//! # GET /health

use axum::http::StatusCode;

/// 死活監視。鍵ストアには触れない。
pub async fn handle_health() -> StatusCode {
    StatusCode::OK
}
