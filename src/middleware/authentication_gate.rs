/// Authentication Gate
///
/// Runs once per request, before any handler. A valid bearer token puts an
/// `AuthContext` into the request extensions; anything else (no header, a
/// token that does not decode, an expired token) lets the request continue
/// unauthenticated. Rejection is left to the handlers' `AuthenticatedUser`
/// extractor so that public routes keep working with a stale token.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{AuthContext, TokenCodec};
use crate::error::AuthError;

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub struct AuthenticationGate {
    codec: TokenCodec,
}

impl AuthenticationGate {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationGateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthenticationGateService {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

pub struct AuthenticationGateService<S> {
    service: Rc<S>,
    codec: TokenCodec,
}

impl<S> AuthenticationGateService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Option<AuthContext> {
        let token = bearer_token(req.headers())?;

        match self.codec.validate(&token) {
            Ok(claims) => {
                tracing::debug!(subject = %claims.sub, role = %claims.role, "Bearer token accepted");
                Some(AuthContext::from_claims(claims, token))
            }
            Err(AuthError::TokenExpired) => {
                tracing::debug!(path = %req.path(), "Expired bearer token ignored");
                None
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), error = %e, "Undecodable bearer token ignored");
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthenticationGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(context) = self.authenticate(&req) {
            req.extensions_mut().insert(context);
        }

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::configuration::JwtSettings;
    use actix_web::{http::StatusCode, test as actix_test, web, App, HttpRequest, HttpResponse};
    use chrono::{Duration, Utc};

    fn codec() -> TokenCodec {
        TokenCodec::new(&JwtSettings {
            secret: "gate-test-secret-0123456789-abcdefghij".to_string(),
            token_expiry: 3600,
            issuer: "test".to_string(),
        })
    }

    /// Always 200; reports what the gate attached.
    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<AuthContext>() {
            Some(ctx) => HttpResponse::Ok().body(format!("{}:{}", ctx.subject, ctx.role)),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    async fn call_with(header: Option<String>) -> (StatusCode, String) {
        let app = actix_test::init_service(
            App::new()
                .wrap(AuthenticationGate::new(codec()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let mut req = actix_test::TestRequest::get().uri("/whoami");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let resp = actix_test::call_service(&app, req.to_request()).await;
        let status = resp.status();
        let body = actix_test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[actix_web::test]
    async fn test_valid_token_attaches_identity() {
        let token = codec().issue("officer1@insurance.com", Role::Officer).unwrap();
        let (status, body) = call_with(Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "officer1@insurance.com:OFFICER");
    }

    #[actix_web::test]
    async fn test_missing_header_proceeds_unauthenticated() {
        let (status, body) = call_with(None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_garbage_token_proceeds_unauthenticated() {
        let (status, body) = call_with(Some("Bearer not-a-jwt".to_string())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_expired_token_proceeds_unauthenticated() {
        let token = codec()
            .issue_at("john.doe@example.com", Role::User, Utc::now() - Duration::hours(3))
            .unwrap();
        let (status, body) = call_with(Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_token_signed_elsewhere_proceeds_unauthenticated() {
        let foreign = TokenCodec::new(&JwtSettings {
            secret: "some-other-service-secret-0123456789".to_string(),
            token_expiry: 3600,
            issuer: "test".to_string(),
        })
        .issue("admin@insurance.com", Role::Admin)
        .unwrap();
        let (status, body) = call_with(Some(format!("Bearer {}", foreign))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }
}
