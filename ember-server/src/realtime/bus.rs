//! 通知总线核心实现
//!
//! # 消息流
//!
//! ```text
//! Services ──▶ publish() ──▶ broadcast::Sender<Event> ──▶ Subscribers
//! ```
//!
//! 发布是 fire-and-forget：没有订阅者时事件被静默丢弃（不是错误），
//! 迟到的订阅者收不到历史事件。

use shared::realtime::Event;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// 事件发布接口
///
/// 服务通过该接口发布事件，测试用记录型假实现替换。
pub trait EventPublisher: Send + Sync {
    /// 发布事件 (at-most-once，不产生背压)
    fn publish(&self, event: Event);
}

/// 通知总线 - 进程内事件扇出点
///
/// # 职责
///
/// - 事件发布 (publish)
/// - 订阅管理 (subscribe — 每个订阅者独立接收全部事件)
///
/// 慢订阅者超过通道容量时丢最旧的事件 (broadcast lagging)，
/// 与"仪表盘式系统"的投递要求一致。
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl EventBus {
    /// 默认容量 (1024) 的通知总线
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// 创建指定容量的通知总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 订阅事件流
    ///
    /// 只收到订阅之后发布的事件。
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// 获取关闭令牌 (用于监控关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭通知总线
    ///
    /// 通知泵任务退出；已入队的事件不再投递。
    pub fn shutdown(&self) {
        tracing::info!("Shutting down event bus");
        self.shutdown_token.cancel();
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: Event) {
        // 无订阅者时 send 返回 Err —— 按规约静默丢弃
        if let Err(e) = self.tx.send(event) {
            tracing::debug!(event = %e.0.name(), "Event dropped (no subscribers)");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::realtime::{KitchenUpdatePayload, OrderUpdatePayload};

    fn order_event(order_id: &str) -> Event {
        Event::OrderUpdate(OrderUpdatePayload {
            order_id: order_id.to_string(),
            status: "PENDING".to_string(),
            user_id: "user:1".to_string(),
            total: 25.0,
        })
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        // Must not panic or error: events with no audience are dropped
        bus.publish(order_event("order:1"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(order_event("order:7"));

        let event = rx.recv().await.expect("event expected");
        match event {
            Event::OrderUpdate(p) => assert_eq!(p.order_id, "order:7"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_history() {
        let bus = EventBus::new();

        // Published with nobody listening, gone forever
        bus.publish(order_event("order:lost"));

        let mut rx = bus.subscribe();
        bus.publish(Event::KitchenUpdate(KitchenUpdatePayload {
            order_id: "order:next".to_string(),
            status: "READY".to_string(),
            items: None,
        }));

        // Only the post-subscription event arrives
        let event = rx.recv().await.expect("event expected");
        match event {
            Event::KitchenUpdate(p) => assert_eq!(p.order_id, "order:next"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_fanout_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(order_event("order:both"));

        for rx in [&mut rx1, &mut rx2] {
            match rx.recv().await.expect("event expected") {
                Event::OrderUpdate(p) => assert_eq!(p.order_id, "order:both"),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }
}
