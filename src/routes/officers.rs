use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::OfficerProfile;
use crate::routes::auth::MessageResponse;

/// GET /api/officer (staff)
pub async fn list_officers(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let officers =
        sqlx::query_as::<_, OfficerProfile>("SELECT id, name, email FROM officers ORDER BY id")
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(officers))
}

/// GET /api/officer/{id} (staff)
pub async fn get_officer(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;
    let officer_id = path.into_inner();

    let officer =
        sqlx::query_as::<_, OfficerProfile>("SELECT id, name, email FROM officers WHERE id = $1")
            .bind(officer_id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| AppError::not_found(format!("officer {}", officer_id)))?;

    Ok(HttpResponse::Ok().json(officer))
}

/// DELETE /api/officer/{id} (admin)
pub async fn delete_officer(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    let officer_id = path.into_inner();

    let result = sqlx::query("DELETE FROM officers WHERE id = $1")
        .bind(officer_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("officer {}", officer_id)));
    }

    tracing::info!(officer_id, admin = %user.subject(), "Officer deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Officer deleted successfully")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/officer")
            .route("", web::get().to(list_officers))
            .route("/{id}", web::get().to(get_officer))
            .route("/{id}", web::delete().to(delete_officer)),
    );
}
