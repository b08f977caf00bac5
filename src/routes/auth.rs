/// Authentication Routes
///
/// Handles login for every account kind, user and officer registration,
/// token validation, and the identity of the current caller.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, AuthenticatedUser, LoginDispatcher, Role, TokenCodec};
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::middleware::bearer_token;
use crate::store::{AccountPartition, AccountStore, NewOfficer, NewUser};
use crate::validators::{
    is_valid_aadhaar, is_valid_address, is_valid_date_of_birth, is_valid_email, is_valid_name,
    is_valid_pan,
};

/// Login request; `userType` picks the account partition
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub aadhaar_number: String,
    pub pan_number: String,
}

#[derive(Deserialize)]
pub struct RegisterOfficerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Token echo returned by `/api/auth/validate`
#[derive(Serialize)]
pub struct ValidateResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
    pub role: Role,
}

/// POST /api/auth/login
///
/// # Errors
/// - 400: unknown `userType`, unknown email, or wrong password (one shared body)
pub async fn login(
    form: web::Json<LoginRequest>,
    dispatcher: web::Data<LoginDispatcher>,
) -> Result<HttpResponse, AppError> {
    let kind: Role = form.user_type.parse()?;
    let session = dispatcher.login(&form.email, &form.password, kind).await?;

    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/auth/register/user
///
/// # Errors
/// - 400: validation failure or email already registered
pub async fn register_user(
    form: web::Json<RegisterUserRequest>,
    accounts: web::Data<dyn AccountStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");
    let result = async {
        let email = is_valid_email(&form.email)?;
        let name = is_valid_name(&form.name)?;
        let address = is_valid_address(&form.address)?;
        let date_of_birth = is_valid_date_of_birth(form.date_of_birth, Utc::now().date_naive())?;
        let aadhaar_number = is_valid_aadhaar(&form.aadhaar_number)?;
        let pan_number = is_valid_pan(&form.pan_number)?;

        ensure_email_free(accounts.get_ref(), AccountPartition::Users, &email).await?;
        let password_hash = hash_password(&form.password)?;

        let user_id = accounts
            .create_user(NewUser {
                name,
                email,
                password_hash,
                address,
                date_of_birth,
                aadhaar_number,
                pan_number,
            })
            .await?;

        tracing::info!(
            request_id = %context.request_id,
            user_id,
            "User registered successfully"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(MessageResponse::new("User registered successfully")))
    }
    .await;

    context.record(result)
}

/// POST /api/auth/register/officer
///
/// # Errors
/// - 400: validation failure or email already registered
pub async fn register_officer(
    form: web::Json<RegisterOfficerRequest>,
    accounts: web::Data<dyn AccountStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("officer_registration");
    let result = async {
        let email = is_valid_email(&form.email)?;
        let name = is_valid_name(&form.name)?;

        ensure_email_free(accounts.get_ref(), AccountPartition::Officers, &email).await?;
        let password_hash = hash_password(&form.password)?;

        let officer_id = accounts
            .create_officer(NewOfficer {
                name,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(
            request_id = %context.request_id,
            officer_id,
            "Officer registered successfully"
        );

        Ok::<_, AppError>(HttpResponse::Ok().json(MessageResponse::new("Officer registered successfully")))
    }
    .await;

    context.record(result)
}

/// GET /api/auth/validate
///
/// Reads the bearer token directly rather than trusting the gate, so a stale
/// or forged token is reported instead of silently treated as anonymous.
pub async fn validate(
    req: HttpRequest,
    codec: web::Data<TokenCodec>,
) -> Result<HttpResponse, AppError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::TokenInvalid)?;
    let claims = codec.validate(&token)?;

    Ok(HttpResponse::Ok().json(ValidateResponse {
        token,
        username: claims.sub,
        role: claims.role,
    }))
}

/// GET /api/auth/me
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        username: user.subject().to_string(),
        role: user.role(),
    })
}

async fn ensure_email_free(
    accounts: &dyn AccountStore,
    partition: AccountPartition,
    email: &str,
) -> Result<(), AppError> {
    if accounts.find_by_email(partition, email).await?.is_some() {
        return Err(DatabaseError::UniqueConstraintViolation("Email already exists".to_string()).into());
    }
    Ok(())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/login", web::post().to(login))
            .route("/register/user", web::post().to(register_user))
            .route("/register/officer", web::post().to(register_officer))
            .route("/validate", web::get().to(validate))
            .route("/me", web::get().to(me)),
    );
}
