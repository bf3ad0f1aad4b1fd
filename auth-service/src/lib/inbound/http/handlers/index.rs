use axum::http::StatusCode;

pub const BANNER: &str = "Authentication API with axum and PostgreSQL.";

pub async fn index() -> &'static str {
    BANNER
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Route not found.")
}
