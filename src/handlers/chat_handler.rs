use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::ChatRequest,
    services::http_helpers::{parse_json_body, read_body, success_json},
};

/// `POST /api/chat`. The body is read as raw bytes because the browser
/// client posts JSON without a JSON content type.
pub async fn chat(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req);

    let outcome = async {
        let body = read_body(payload, state.config.max_body_bytes).await?;
        let request: ChatRequest = parse_json_body(&body)?;
        state.chat_service.handle(request).await
    }
    .await;

    match outcome {
        Ok(response) => Ok(success_json(response)),
        Err(err) => {
            log::error!(
                "[{}] Backend error caught ({}): {}",
                request_id,
                err.error_code(),
                err
            );
            Err(err)
        }
    }
}

/// Every other method on `/api/chat`.
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse, AppError> {
    log::warn!(
        "[{}] Rejected {} {}",
        get_request_id(&req),
        req.method(),
        req.path()
    );
    Err(AppError::MethodNotAllowed)
}
