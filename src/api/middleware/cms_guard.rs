//! CMS write guard
//!
//! Reads are public. Writes and `preview=true` reads need
//! `Authorization: Bearer <cms.api_token>`; with no token configured both are
//! refused. Visitor submissions (new feedback, visitor increments) bypass the
//! guard; only requests with a valid token carry [`CmsAuthorized`].

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse, HttpResponseBuilder,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use crate::api::services::cms::PreviewQuery;
use crate::api::services::helpers::{ApiResponse, ErrorCode};

/// 无需鉴权的写入路由（相对 CMS 前缀）
const PUBLIC_SUBMISSIONS: &[&str] = &["/feedbacks", "/visitor-count/increment"];

/// 请求携带了有效 token，写入 request extensions
#[derive(Clone, Copy, Debug)]
pub struct CmsAuthorized;

#[derive(Clone)]
pub struct CmsWriteGuard {
    prefix: Arc<str>,
    token: Option<Arc<str>>,
}

impl CmsWriteGuard {
    pub fn new(prefix: &str, api_token: &str) -> Self {
        Self {
            prefix: Arc::from(prefix.trim_end_matches('/')),
            token: (!api_token.is_empty()).then(|| Arc::from(api_token)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CmsWriteGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CmsWriteGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CmsWriteGuardMiddleware {
            service: Rc::new(service),
            prefix: self.prefix.clone(),
            token: self.token.clone(),
        }))
    }
}

pub struct CmsWriteGuardMiddleware<S> {
    service: Rc<S>,
    prefix: Arc<str>,
    token: Option<Arc<str>>,
}

fn is_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn is_public_submission(method: &Method, path: &str, prefix: &str) -> bool {
    if *method != Method::POST {
        return false;
    }
    let relative = path.strip_prefix(prefix).unwrap_or(path);
    let relative = relative.trim_end_matches('/');
    PUBLIC_SUBMISSIONS.contains(&relative)
}

fn wants_preview(query_string: &str) -> bool {
    web::Query::<PreviewQuery>::from_query(query_string)
        .map(|q| q.include_drafts())
        .unwrap_or(false)
}

fn bearer_matches(header: Option<&str>, expected: &str) -> bool {
    let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return false;
    };
    token.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn reject<B>(
    req: ServiceRequest,
    mut builder: HttpResponseBuilder,
    code: ErrorCode,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = builder
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            code: code as i32,
            message: message.to_string(),
            data: None,
        });
    req.into_response(response.map_into_right_body())
}

impl<S, B> Service<ServiceRequest> for CmsWriteGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        let authorized = self.token.as_deref().is_some_and(|expected| {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());
            bearer_matches(header, expected)
        });
        if authorized {
            req.extensions_mut().insert(CmsAuthorized);
        }

        let allowed = authorized
            || if is_read(req.method()) {
                !wants_preview(req.query_string())
            } else {
                is_public_submission(req.method(), req.path(), &self.prefix)
            };

        if !allowed {
            if self.token.is_none() {
                debug!(
                    "CMS request refused, no API token configured: {} {}",
                    req.method(),
                    req.path()
                );
                return Box::pin(async move {
                    Ok(reject(
                        req,
                        HttpResponse::Forbidden(),
                        ErrorCode::Forbidden,
                        "CMS writes and previews are disabled",
                    ))
                });
            }
            info!(
                "CMS request rejected, invalid or missing token: {} {}",
                req.method(),
                req.path()
            );
            return Box::pin(async move {
                Ok(reject(
                    req,
                    HttpResponse::Unauthorized(),
                    ErrorCode::Unauthorized,
                    "Unauthorized: Invalid or missing token",
                ))
            });
        }

        Box::pin(async move {
            let res = srv.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_submission_paths() {
        assert!(is_public_submission(&Method::POST, "/cms/feedbacks", "/cms"));
        assert!(is_public_submission(
            &Method::POST,
            "/cms/visitor-count/increment/",
            "/cms"
        ));
        assert!(!is_public_submission(&Method::DELETE, "/cms/feedbacks", "/cms"));
        assert!(!is_public_submission(&Method::POST, "/cms/feedbacks/3", "/cms"));
        assert!(!is_public_submission(&Method::POST, "/cms/skills", "/cms"));
    }

    #[test]
    fn test_wants_preview() {
        assert!(wants_preview("preview=true"));
        assert!(wants_preview("page=2&preview=true"));
        assert!(!wants_preview("preview=false"));
        assert!(!wants_preview("page=2"));
        assert!(!wants_preview(""));
    }

    #[test]
    fn test_bearer_matches() {
        assert!(bearer_matches(Some("Bearer s3cret"), "s3cret"));
        assert!(!bearer_matches(Some("Bearer s3cre"), "s3cret"));
        assert!(!bearer_matches(Some("s3cret"), "s3cret"));
        assert!(!bearer_matches(None, "s3cret"));
    }
}
