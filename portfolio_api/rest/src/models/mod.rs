use serde::Serialize;

pub mod contact;

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ApiHealthStatus {
    pub http: bool,
    pub email: bool,
}
