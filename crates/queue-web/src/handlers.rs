//! HTTP处理器

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use queue_core::{AddPatientInput, PatientStatus, QueueError, UpdatePatientStatusInput};
use queue_engine::QueueEngine;
use serde::Deserialize;
use serde_json::json;

/// 各处理器共享的应用状态
pub type AppState = Arc<QueueEngine>;

/// API根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({
        "service": "Clinic Queue API",
        "version": "1.0.0",
        "status": "running",
        "endpoints": {
            "health": "/health",
            "api": "/api/v1",
            "views": "/ui"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// 挂号登记处理器
pub async fn add_patient(
    State(engine): State<AppState>,
    Json(input): Json<AddPatientInput>,
) -> Result<impl IntoResponse, ApiError> {
    let patient = engine.add_patient(input).await?;
    Ok(Json(patient))
}

/// 全部患者查询处理器（管理概览）
pub async fn get_all_patients(
    State(engine): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let patients = engine.all_patients().await?;
    Ok(Json(patients))
}

/// 全部候诊患者查询处理器
pub async fn get_waiting_patients(
    State(engine): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let patients = engine.waiting_patients().await?;
    Ok(Json(patients))
}

/// 诊室患者查询处理器（医生诊室视图，含历史记录）
pub async fn get_room_patients(
    State(engine): State<AppState>,
    Path(room): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let patients = engine.patients_by_room(room).await?;
    Ok(Json(patients))
}

/// 叫号处理器，候诊集为空时响应体为null
pub async fn call_next_patient(
    State(engine): State<AppState>,
    Path(room): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let patient = engine.call_next_patient(room).await?;
    Ok(Json(patient))
}

/// 状态更新请求体
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: PatientStatus,
}

/// 状态更新处理器
pub async fn update_patient_status(
    State(engine): State<AppState>,
    Path(patient_id): Path<i64>,
    Json(body): Json<UpdateStatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    let patient = engine
        .update_patient_status(UpdatePatientStatusInput {
            patient_id,
            status: body.status,
        })
        .await?;
    Ok(Json(patient))
}

/// 公共显示屏查询处理器，仅返回脱敏投影
pub async fn get_public_display(
    State(engine): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = engine.public_display().await?;
    Ok(Json(entries))
}

/// 错误处理
pub struct ApiError(QueueError);

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            QueueError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            QueueError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            err @ QueueError::InvalidStateTransition { .. } => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            QueueError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            err => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        let body = Json(json!({
            "error": true,
            "message": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
