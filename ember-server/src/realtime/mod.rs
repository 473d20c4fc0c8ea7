//! 实时通知模块
//!
//! # 架构
//!
//! ```text
//! OrderService ──publish()──▶ EventBus (broadcast) ──▶ socket pump ──▶ Socket.IO rooms
//!                                                         │
//!                                      kitchen:subscribe ─┤ station:{station}
//!                                      orders:subscribe  ─┘ orders:{user_id}
//! ```
//!
//! 总线是显式依赖（[`EventPublisher`] 注入到需要它的服务），不是模块级单例。
//! 投递语义为 at-most-once：无订阅者时事件被丢弃，不排队、不重试、不回放。

pub mod bus;
pub mod socket;

pub use bus::{EventBus, EventPublisher};
