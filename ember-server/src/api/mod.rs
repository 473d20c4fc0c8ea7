//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录 / 当前用户
//! - [`menu`] - 菜单浏览 (公开)
//! - [`cart`] - 购物车管理
//! - [`orders`] - 下单与状态流转
//! - [`kitchen`] - 厨房队列与指标 (员工)
//! - [`analytics`] - 汇总 / 仪表盘 / 事件 (管理员)

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;

use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::utils::AppError;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Parse the authenticated user's id into a RecordId
///
/// The id always came out of the database, so a parse failure means the
/// token/extension plumbing is broken, not the caller.
pub(crate) fn current_user_rid(user: &CurrentUser) -> Result<RecordId, AppError> {
    user.id
        .parse()
        .map_err(|_| AppError::internal(format!("Malformed user id: {}", user.id)))
}
