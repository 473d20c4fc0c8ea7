//! 认证模块
//!
//! - [`jwt`] - JWT 令牌服务
//! - [`middleware`] - 认证与角色守卫中间件
//! - [`password`] - Argon2 密码哈希

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{attach_auth_user, require_admin, require_auth, require_staff};
pub use password::{hash_password, verify_password};
