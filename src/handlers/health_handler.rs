use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    services::http_helpers::{service_unavailable_json, success_json},
};

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    success_json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let llm_ready = state.chat_service.llm_configured();

    let datastore = match state.chat_service.progress() {
        None => "disabled",
        Some(progress) => {
            if progress.health_check().await {
                "ok"
            } else {
                "error"
            }
        }
    };

    let ready = llm_ready && datastore != "error";
    let response = serde_json::json!({
        "status": if ready { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "llm": if llm_ready { "configured" } else { "missing" },
            "model": state.config.gemini_model,
            "datastore": datastore
        }
    });

    if ready {
        success_json(response)
    } else {
        service_unavailable_json(response)
    }
}
