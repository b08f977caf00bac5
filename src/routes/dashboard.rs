/// Dashboard Routes
///
/// Headline counts for the officer console.

use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{ClaimStatus, ProposalStatus};

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_officers: i64,
    pub total_proposals: i64,
    pub active_proposals: i64,
    pub total_claims: i64,
    pub pending_claims: i64,
}

/// GET /api/dashboard/stats (staff)
pub async fn stats(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let stats = sqlx::query_as::<_, DashboardStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS total_users,
            (SELECT COUNT(*) FROM officers) AS total_officers,
            (SELECT COUNT(*) FROM proposals) AS total_proposals,
            (SELECT COUNT(*) FROM proposals WHERE status = $1) AS active_proposals,
            (SELECT COUNT(*) FROM claims) AS total_claims,
            (SELECT COUNT(*) FROM claims WHERE status = $2) AS pending_claims
        "#,
    )
    .bind(ProposalStatus::Active.as_str())
    .bind(ClaimStatus::Pending.as_str())
    .fetch_one(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(stats))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/dashboard/stats", web::get().to(stats));
}
