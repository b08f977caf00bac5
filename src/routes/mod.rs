pub mod auth;
pub mod dashboard;
pub mod officers;
pub mod payments;
pub mod proposals;
pub mod users;

use actix_web::{web, HttpResponse};

/// Liveness only; the database is not consulted.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Every route the service exposes, for `App::configure`
pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .configure(auth::configure)
        .configure(proposals::configure)
        .configure(payments::configure)
        .configure(users::configure)
        .configure(officers::configure)
        .configure(dashboard::configure);
}
