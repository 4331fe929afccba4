//! Web服务器

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use queue_core::Result;
use queue_engine::QueueEngine;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    add_patient, api_root, call_next_patient, get_all_patients, get_public_display,
    get_room_patients, get_waiting_patients, health, update_patient_status, AppState,
};
use crate::static_files::view_routes;

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, engine: Arc<QueueEngine>) -> Self {
        let app = create_app(engine);
        Self { addr, app }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app).await?;

        Ok(())
    }
}

/// 组装完整的应用路由
pub fn create_app(engine: AppState) -> Router {
    Router::new()
        // 根路径
        .route("/", get(api_root))

        // 健康检查
        .route("/health", get(health))

        // API路由
        .nest("/api/v1", api_routes())

        // 浏览器视图
        .nest("/ui", view_routes())

        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(engine)
}

/// API v1 路由
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/patients", post(add_patient).get(get_all_patients))
        .route("/patients/waiting", get(get_waiting_patients))
        .route("/patients/:id/status", put(update_patient_status))
        .route("/rooms/:room/patients", get(get_room_patients))
        .route("/rooms/:room/call", post(call_next_patient))
        .route("/display", get(get_public_display))
}
