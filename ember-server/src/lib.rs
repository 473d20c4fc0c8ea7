//! Ember Server - 餐厅在线点餐平台服务端
//!
//! # 架构概述
//!
//! 本模块是 Ember Server 的主入口，提供以下核心功能：
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **通知总线** (`realtime`): 订单/厨房事件实时推送 (Socket.IO)
//! - **订单流程** (`orders`): 购物车结算、价格快照、状态流转
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! ember-server/src/
//! ├── core/          # 配置、状态、服务器装配
//! ├── auth/          # JWT 认证、角色守卫
//! ├── db/            # 数据库层 (models + repositories)
//! ├── orders/        # 订单服务与金额计算
//! ├── realtime/      # 通知总线与 websocket 层
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod realtime;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use realtime::{EventBus, EventPublisher};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 初始化运行环境 (dotenv + 日志)
///
/// 必须在读取 [`Config`] 之前调用
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在不是错误 (生产环境用真实环境变量)
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ______          __
   / ____/___ ___  / /_  ___  _____
  / __/ / __ `__ \/ __ \/ _ \/ ___/
 / /___/ / / / / / /_/ /  __/ /
/_____/_/ /_/ /_/_.___/\___/_/
    "#
    );
}
