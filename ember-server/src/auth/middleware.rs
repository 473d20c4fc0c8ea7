//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件。
//!
//! 分两层：
//!
//! 1. [`attach_auth_user`] 全局挂载 — 解析 `Authorization: Bearer <token>`
//!    并注入 [`CurrentUser`]。没有令牌视为匿名访问，不是错误。
//! 2. [`require_auth`] / [`require_staff`] / [`require_admin`] 按路由挂载 —
//!    检查注入结果并强制角色要求。

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;

/// 身份注入中间件 - 解析令牌并加载用户
///
/// 验证成功后从数据库加载最新用户数据并注入请求扩展
/// (`req.extensions_mut().insert(user)`)。
///
/// 以下情况按匿名处理（继续执行，不注入用户）：
/// - 无 Authorization 头
/// - 令牌无效或过期
/// - 令牌有效但用户已不存在
pub async fn attach_auth_user(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(JwtService::extract_from_header) else {
        return next.run(req).await;
    };

    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected, continuing as anonymous");
            return next.run(req).await;
        }
    };

    // 从数据库加载最新数据，角色变更即时生效
    match state.user_repository().find_by_id(&claims.sub).await {
        Ok(Some(user)) => {
            let current = CurrentUser {
                id: user.id_string(),
                email: user.email.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                role: user.role,
                loyalty_points: user.loyalty_points,
            };
            req.extensions_mut().insert(current);
        }
        Ok(None) => {
            tracing::debug!(user_id = %claims.sub, "Token subject no longer exists");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve authenticated user");
        }
    }

    next.run(req).await
}

/// 认证中间件 - 要求用户登录
///
/// # 错误
///
/// 未认证返回 401 Unauthorized
pub async fn require_auth(req: Request, next: Next) -> Result<Response, AppError> {
    if req.extensions().get::<CurrentUser>().is_none() {
        return Err(AppError::unauthorized());
    }
    Ok(next.run(req).await)
}

/// 员工中间件 - 要求 STAFF 或 ADMIN 角色
///
/// # 错误
///
/// 未认证返回 401，角色不符返回 403
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_staff() {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            "Staff access denied"
        );
        return Err(AppError::forbidden("Staff access required"));
    }
    Ok(next.run(req).await)
}

/// 管理员中间件 - 要求 ADMIN 角色
///
/// # 错误
///
/// 未认证返回 401，非管理员返回 403
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        tracing::warn!(
            user_id = %user.id,
            role = %user.role,
            "Admin access denied"
        );
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(next.run(req).await)
}
