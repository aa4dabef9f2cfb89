use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::jwt::get_jwt_service;
use crate::api::services::finance::{ErrorCode, ErrorResponse};

pub const NO_TOKEN_MESSAGE: &str = "No token provided";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid token";

/// 已认证用户，由 `UserAuth` 写入 request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| {
            // 路由未挂载 UserAuth 时才会走到这里
            actix_web::error::InternalError::from_response(
                INVALID_TOKEN_MESSAGE,
                unauthorized_response(ErrorCode::Unauthorized, INVALID_TOKEN_MESSAGE),
            )
            .into()
        }))
    }
}

fn unauthorized_response(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(StatusCode::UNAUTHORIZED)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ErrorResponse {
            code,
            message: message.to_string(),
        })
}

/// Bearer JWT authentication middleware
#[derive(Clone, Default)]
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    fn handle_unauthorized(
        req: ServiceRequest,
        code: ErrorCode,
        message: &str,
    ) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Authentication failed for {} {}: {}",
            req.method(),
            req.path(),
            message
        );
        req.into_response(unauthorized_response(code, message).map_into_right_body())
    }

    /// 从 Authorization header 提取 Bearer token
    ///
    /// 返回 None 表示 header 缺失或为空。
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_whitespace().nth(1))
            .map(|s| s.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(
                    req,
                    ErrorCode::TokenMissing,
                    NO_TOKEN_MESSAGE,
                ));
            };

            match get_jwt_service().validate_token(&token) {
                Ok(claims) => {
                    trace!("Bearer token validation successful");
                    debug!("Authenticated user {}", claims.sub);
                    req.extensions_mut().insert(AuthenticatedUser {
                        user_id: claims.sub,
                    });
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(e) => {
                    debug!("Bearer token validation failed: {}", e);
                    Ok(Self::handle_unauthorized(
                        req,
                        ErrorCode::TokenInvalid,
                        INVALID_TOKEN_MESSAGE,
                    ))
                }
            }
        })
    }
}
