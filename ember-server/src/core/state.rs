use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::repository::{
    AnalyticsRepository, CartRepository, MenuRepository, OrderRepository, UserRepository,
};
use crate::db::{DbService, seed};
use crate::orders::OrderService;
use crate::realtime::{EventBus, EventPublisher};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是平台的核心数据结构，使用 Arc 实现浅拷贝，
/// 克隆成本极低，可安全注入每个请求处理器。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | event_bus | Arc<EventBus> | 通知总线 (显式依赖，非全局单例) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 通知总线
    pub event_bus: Arc<EventBus>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            event_bus,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/ember.db, 含建表)
    /// 3. 演示数据 (可选)
    /// 4. JWT 服务与通知总线
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("ember.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::finish_init(config, db_service.db).await
    }

    /// 初始化内存态服务器状态 (测试与临时运行)
    pub async fn initialize_in_memory(config: &Config) -> Self {
        let db_service = DbService::memory()
            .await
            .expect("Failed to initialize in-memory database");
        Self::finish_init(config, db_service.db).await
    }

    async fn finish_init(config: &Config, db: Surreal<Db>) -> Self {
        if config.seed_demo_data {
            // 种子失败不阻止启动，空菜单的服务器仍然可用
            if let Err(e) = seed::run(&db).await {
                tracing::warn!(error = %e, "Demo data seeding failed");
            }
        }

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let event_bus = Arc::new(EventBus::with_capacity(config.bus_capacity));

        Self::new(config.clone(), db, jwt_service, event_bus)
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取通知总线
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// 事件发布接口 (供服务注入)
    pub fn publisher(&self) -> Arc<dyn EventPublisher> {
        self.event_bus.clone()
    }

    // ── 服务与仓储工厂 ────────────────────────────────────────────

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.get_db(), self.publisher())
    }

    pub fn user_repository(&self) -> UserRepository {
        UserRepository::new(self.get_db())
    }

    pub fn cart_repository(&self) -> CartRepository {
        CartRepository::new(self.get_db())
    }

    pub fn menu_repository(&self) -> MenuRepository {
        MenuRepository::new(self.get_db())
    }

    pub fn order_repository(&self) -> OrderRepository {
        OrderRepository::new(self.get_db())
    }

    pub fn analytics_repository(&self) -> AnalyticsRepository {
        AnalyticsRepository::new(self.get_db())
    }
}
