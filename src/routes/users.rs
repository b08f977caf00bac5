/// User Management Routes

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, ErrorContext};
use crate::models::{UserProfile, UserResponse};
use crate::routes::auth::MessageResponse;
use crate::validators::{is_valid_aadhaar, is_valid_address, is_valid_name, is_valid_pan};

const USER_COLUMNS: &str =
    "id, name, email, address, date_of_birth, aadhaar_number, pan_number, role";

/// Editable profile fields; email and date of birth are fixed at registration
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    pub address: String,
    pub aadhaar_number: String,
    pub pan_number: String,
}

/// GET /api/user (staff)
pub async fn list_users(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
    let today = Utc::now().date_naive();
    let users: Vec<UserResponse> = sqlx::query_as::<_, UserProfile>(&query)
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(|profile| UserResponse::new(profile, today))
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/user/{id}
pub async fn get_user(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    user.require_owner_or_staff(&pool, user_id).await?;
    let profile = fetch_user(&pool, user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::new(profile, Utc::now().date_naive())))
}

/// PUT /api/user/{id}
pub async fn update_user(
    path: web::Path<i64>,
    form: web::Json<UpdateUserRequest>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(user.subject().to_string());
    let result = async {
        let user_id = path.into_inner();
        user.require_owner_or_staff(&pool, user_id).await?;
        ensure_user_exists(&pool, user_id).await?;

        let name = is_valid_name(&form.name)?;
        let address = is_valid_address(&form.address)?;
        let aadhaar_number = is_valid_aadhaar(&form.aadhaar_number)?;
        let pan_number = is_valid_pan(&form.pan_number)?;

        let query = format!(
            r#"
            UPDATE users SET name = $1, address = $2, aadhaar_number = $3, pan_number = $4
            WHERE id = $5
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let profile = sqlx::query_as::<_, UserProfile>(&query)
            .bind(&name)
            .bind(&address)
            .bind(&aadhaar_number)
            .bind(&pan_number)
            .bind(user_id)
            .fetch_one(pool.get_ref())
            .await?;

        tracing::info!(request_id = %context.request_id, user_id, "User profile updated");

        Ok::<_, AppError>(HttpResponse::Ok().json(UserResponse::new(profile, Utc::now().date_naive())))
    }
    .await;

    context.record(result)
}

/// DELETE /api/user/{id} (admin)
///
/// Proposals and claims are removed by the foreign-key cascade.
pub async fn delete_user(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;
    let user_id = path.into_inner();

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("user {}", user_id)));
    }

    tracing::info!(user_id, admin = %user.subject(), "User deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("User deleted successfully")))
}

async fn fetch_user(pool: &PgPool, user_id: i64) -> Result<UserProfile, AppError> {
    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

    sqlx::query_as::<_, UserProfile>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user {}", user_id)))
}

/// `NotFound` unless a user row with this id exists
pub(crate) async fn ensure_user_exists(pool: &PgPool, user_id: i64) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(AppError::not_found(format!("user {}", user_id)))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/user")
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
