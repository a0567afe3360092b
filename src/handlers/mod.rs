pub mod chat_handler;
pub mod health_handler;

use actix_web::web;

pub use chat_handler::{chat, method_not_allowed};
pub use health_handler::{health_check, health_check_ready};

/// Mounts every route. Shared by the server binary and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/chat")
            .route(web::post().to(chat))
            .default_service(web::to(method_not_allowed)),
    )
    .service(health_check)
    .service(health_check_ready);
}
