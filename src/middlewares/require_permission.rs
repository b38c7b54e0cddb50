/*!
 * 权限校验中间件
 *
 * 必须放在 RequireJWT 之后。按角色权限表判断当前用户是否拥有
 * `资源.操作` 权限，没有则返回 403。
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::get().to(list_students).wrap(RequirePermission::new(Resource::Students, Action::Read)))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::{
        entities::User,
        permissions::{Action, Resource},
    },
};

use super::create_error_response;

#[derive(Clone, Copy)]
pub struct RequirePermission {
    resource: Resource,
    action: Action,
}

impl RequirePermission {
    pub fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    pub fn read(resource: Resource) -> Self {
        Self::new(resource, Action::Read)
    }

    pub fn create(resource: Resource) -> Self {
        Self::new(resource, Action::Create)
    }

    pub fn update(resource: Resource) -> Self {
        Self::new(resource, Action::Update)
    }

    pub fn delete(resource: Resource) -> Self {
        Self::new(resource, Action::Delete)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            resource: self.resource,
            action: self.action,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    resource: Resource,
    action: Action,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
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
        let resource = self.resource;
        let action = self.action;

        Box::pin(async move {
            let role = req.extensions().get::<User>().map(|user| user.role);

            let Some(role) = role else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if !role.has_permission(resource, action) {
                info!(
                    "Permission {}.{} denied for role {} on {}",
                    resource,
                    action,
                    role,
                    req.path()
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        &format!("Missing permission: {resource}.{action}"),
                    )
                    .map_into_right_body(),
                ));
            }

            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
