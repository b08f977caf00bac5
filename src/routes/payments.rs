/// Payment and Claim Routes
///
/// Paying a proposal activates the policy; only active policies accept claims.
/// Claim review is an officer task.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, ErrorContext};
use crate::models::{Claim, ClaimStatus, Proposal, ProposalStatus};
use crate::routes::auth::MessageResponse;
use crate::routes::proposals::{fetch_proposal, PROPOSAL_COLUMNS};
use crate::validators::is_valid_reason;

const CLAIM_COLUMNS: &str = "id, user_id, proposal_id, reason, status, date_filed";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub proposal_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimQuery {
    pub user_id: i64,
    pub proposal_id: i64,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// `TXN` + epoch millis + a 0-999 suffix
fn new_transaction_id() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("TXN{}{}", Utc::now().timestamp_millis(), suffix)
}

/// POST /api/payments/process
///
/// # Errors
/// - 400: proposal already paid
/// - 403: a USER paying for someone else's proposal
/// - 404: no such proposal
pub async fn process_payment(
    form: web::Json<PaymentRequest>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("payment").with_user_id(user.subject().to_string());
    let result = async {
        let proposal = fetch_proposal(&pool, form.proposal_id).await?;
        user.require_owner_or_staff(&pool, proposal.user_id).await?;

        if proposal.is_active() {
            return Err(AppError::rejected("Proposal has already been paid"));
        }

        let transaction_id = new_transaction_id();
        let query = format!(
            r#"
            UPDATE proposals
            SET status = $1, payment_date = $2, transaction_id = $3
            WHERE id = $4 AND status <> $1
            RETURNING {}
            "#,
            PROPOSAL_COLUMNS
        );
        // Of two concurrent payments only one matches the status guard.
        let paid = sqlx::query_as::<_, Proposal>(&query)
            .bind(ProposalStatus::Active.as_str())
            .bind(Utc::now().date_naive())
            .bind(&transaction_id)
            .bind(proposal.id)
            .fetch_optional(pool.get_ref())
            .await?
            .ok_or_else(|| AppError::rejected("Proposal has already been paid"))?;

        tracing::info!(
            request_id = %context.request_id,
            proposal_id = paid.id,
            transaction_id = %transaction_id,
            "Payment processed"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(paid))
    }
    .await;

    context.record(result)
}

/// GET /api/payments/user/{user_id}
///
/// Paid proposals only.
pub async fn user_payments(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    user.require_owner_or_staff(&pool, user_id).await?;

    let query = format!(
        "SELECT {} FROM proposals WHERE user_id = $1 AND status = $2 ORDER BY payment_date, id",
        PROPOSAL_COLUMNS
    );
    let paid = sqlx::query_as::<_, Proposal>(&query)
        .bind(user_id)
        .bind(ProposalStatus::Active.as_str())
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(paid))
}

/// POST /api/payments/claim?userId=&proposalId=&reason=
///
/// # Errors
/// - 400: empty or oversized reason, proposal not owned by the user, proposal not active
/// - 403: a USER filing for someone else
/// - 404: no such proposal
pub async fn file_claim(
    query: web::Query<ClaimQuery>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("claim_filing").with_user_id(user.subject().to_string());
    let result = async {
        user.require_owner_or_staff(&pool, query.user_id).await?;
        let reason = is_valid_reason(&query.reason)?;

        let proposal = fetch_proposal(&pool, query.proposal_id).await?;
        if proposal.user_id != query.user_id {
            return Err(AppError::rejected("Proposal does not belong to this user"));
        }
        if !proposal.is_active() {
            return Err(AppError::rejected("Claims can only be filed against an active policy"));
        }

        let insert = format!(
            r#"
            INSERT INTO claims (user_id, proposal_id, reason, status, date_filed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            CLAIM_COLUMNS
        );
        let claim = sqlx::query_as::<_, Claim>(&insert)
            .bind(query.user_id)
            .bind(proposal.id)
            .bind(&reason)
            .bind(ClaimStatus::Pending.as_str())
            .bind(Utc::now().date_naive())
            .fetch_one(pool.get_ref())
            .await?;

        tracing::info!(
            request_id = %context.request_id,
            claim_id = claim.id,
            proposal_id = proposal.id,
            "Claim filed"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(claim))
    }
    .await;

    context.record(result)
}

/// GET /api/payments/claims (staff)
pub async fn list_claims(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let query = format!("SELECT {} FROM claims ORDER BY id", CLAIM_COLUMNS);
    let claims = sqlx::query_as::<_, Claim>(&query)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(claims))
}

/// GET /api/payments/claims/user/{user_id}
pub async fn user_claims(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    user.require_owner_or_staff(&pool, user_id).await?;

    let query = format!(
        "SELECT {} FROM claims WHERE user_id = $1 ORDER BY id",
        CLAIM_COLUMNS
    );
    let claims = sqlx::query_as::<_, Claim>(&query)
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(claims))
}

/// PUT /api/payments/claim/{id}/status?status= (staff)
pub async fn update_claim_status(
    path: web::Path<i64>,
    query: web::Query<StatusQuery>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;
    let claim_id = path.into_inner();
    let status: ClaimStatus = query.status.parse()?;

    let result = sqlx::query("UPDATE claims SET status = $1 WHERE id = $2")
        .bind(status.as_str())
        .bind(claim_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("claim {}", claim_id)));
    }

    tracing::info!(
        claim_id,
        status = %status,
        reviewer = %user.subject(),
        "Claim status updated"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Claim status updated to {}",
        status
    ))))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .route("/process", web::post().to(process_payment))
            .route("/user/{user_id}", web::get().to(user_payments))
            .route("/claim", web::post().to(file_claim))
            .route("/claims", web::get().to(list_claims))
            .route("/claims/user/{user_id}", web::get().to(user_claims))
            .route("/claim/{id}/status", web::put().to(update_claim_status)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_shape() {
        let id = new_transaction_id();

        assert!(id.starts_with("TXN"));
        let digits = &id[3..];
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        // 13-digit epoch millis plus up to three suffix digits
        assert!((14..=16).contains(&digits.len()), "unexpected id {}", id);
    }
}
