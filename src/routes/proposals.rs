/// Proposal Routes
///
/// A proposal is a quote request for one vehicle. The premium is always
/// computed here from the vehicle type and package; clients cannot set it.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, ErrorContext};
use crate::models::{Proposal, ProposalStatus};
use crate::premium;
use crate::routes::auth::MessageResponse;
use crate::routes::users::ensure_user_exists;
use crate::validators::is_valid_vehicle_number;

pub(crate) const PROPOSAL_COLUMNS: &str = "id, user_id, vehicle_type, vehicle_number, policy_package, \
     premium_amount, submission_date, payment_date, transaction_id, status";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub policy_package: String,
}

/// POST /api/proposals/submit/{user_id}
///
/// # Errors
/// - 400: unknown vehicle type or package, malformed vehicle number
/// - 403: a USER submitting for any id but their own
/// - 404: no such user (staff only)
pub async fn submit_proposal(
    path: web::Path<i64>,
    form: web::Json<ProposalRequest>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("proposal_submission").with_user_id(user.subject().to_string());
    let result = async {        let user_id = path.into_inner();

        // Guard first: a USER sees 403 for every id that is not theirs, existing or not.
        user.require_owner_or_staff(&pool, user_id).await?;
        ensure_user_exists(&pool, user_id).await?;

        let vehicle_number = is_valid_vehicle_number(&form.vehicle_number)?;
        let premium_amount = premium::quote(&form.vehicle_type, &form.policy_package)?;

        let query = format!(
            r#"
            INSERT INTO proposals (user_id, vehicle_type, vehicle_number, policy_package, premium_amount, submission_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        );
        let proposal = sqlx::query_as::<_, Proposal>(&query)
            .bind(user_id)
            .bind(form.vehicle_type.trim())
            .bind(&vehicle_number)
            .bind(form.policy_package.trim())
            .bind(premium_amount)
            .bind(Utc::now().date_naive())
            .bind(ProposalStatus::ProposalSubmitted.as_str())
            .fetch_one(pool.get_ref())
            .await?;

        tracing::info!(
            request_id = %context.request_id,
            proposal_id = proposal.id,
            user_id,
            premium_amount,
            "Proposal submitted"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(proposal))
    }
    .await;

    context.record(result)
}

/// GET /api/proposals (staff)
pub async fn list_proposals(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let query = format!("SELECT {} FROM proposals ORDER BY id", PROPOSAL_COLUMNS);
    let proposals = sqlx::query_as::<_, Proposal>(&query)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(proposals))
}

/// GET /api/proposals/user/{user_id}
pub async fn list_user_proposals(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    user.require_owner_or_staff(&pool, user_id).await?;

    let query = format!(
        "SELECT {} FROM proposals WHERE user_id = $1 ORDER BY id",
        PROPOSAL_COLUMNS
    );
    let proposals = sqlx::query_as::<_, Proposal>(&query)
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(proposals))
}

/// GET /api/proposals/{id}
pub async fn get_proposal(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let proposal = fetch_proposal(&pool, path.into_inner()).await?;
    user.require_owner_or_staff(&pool, proposal.user_id).await?;

    Ok(HttpResponse::Ok().json(proposal))
}

/// DELETE /api/proposals/{id}
///
/// Claims filed against the proposal go with it.
pub async fn delete_proposal(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("proposal_deletion").with_user_id(user.subject().to_string());
    let result = async {        let proposal = fetch_proposal(&pool, path.into_inner()).await?;
        user.require_owner_or_staff(&pool, proposal.user_id).await?;

        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM claims WHERE proposal_id = $1")
            .bind(proposal.id)
            .execute(&mut tx)
            .await?;
        sqlx::query("DELETE FROM proposals WHERE id = $1")
            .bind(proposal.id)
            .execute(&mut tx)
            .await?;
        tx.commit().await?;

        tracing::info!(
            request_id = %context.request_id,
            proposal_id = proposal.id,
            "Proposal deleted"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(MessageResponse::new("Proposal deleted successfully")))
    }
    .await;

    context.record(result)
}

/// Loads one proposal, or `NotFound`
pub(crate) async fn fetch_proposal(pool: &PgPool, proposal_id: i64) -> Result<Proposal, AppError> {
    let query = format!("SELECT {} FROM proposals WHERE id = $1", PROPOSAL_COLUMNS);

    sqlx::query_as::<_, Proposal>(&query)
        .bind(proposal_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("proposal {}", proposal_id)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/proposals")
            .route("", web::get().to(list_proposals))
            .route("/submit/{user_id}", web::post().to(submit_proposal))
            .route("/user/{user_id}", web::get().to(list_user_proposals))
            .route("/{id}", web::get().to(get_proposal))
            .route("/{id}", web::delete().to(delete_proposal)),
    );
}
