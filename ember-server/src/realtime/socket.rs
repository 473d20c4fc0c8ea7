//! Socket.IO 层
//!
//! 把通知总线接到 websocket 订阅者：
//!
//! - 客户端 emit `kitchen:subscribe(station)` 加入 `station:{station}` 房间
//! - 客户端 emit `orders:subscribe(user_id)` 加入 `orders:{user_id}` 房间
//! - 泵任务订阅 [`EventBus`] 并把事件转发到对应房间
//!
//! 加入/离开是以连接为键的幂等集合操作 (Socket.IO 房间语义)。
//! station 是客户端任意选择的分组键，服务端不校验其存在性。

use socketioxide::{
    SocketIo,
    extract::{Data, SocketRef},
    layer::SocketIoLayer,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use shared::realtime::{self, Event};

use super::bus::EventBus;

/// Build the Socket.IO layer and start the bus→room pump
pub fn layer(bus: &EventBus) -> (SocketIoLayer, SocketIo) {
    let (layer, io) = SocketIo::new_layer();
    io.ns("/", on_connect);

    tokio::spawn(pump(
        io.clone(),
        bus.subscribe(),
        bus.shutdown_token().clone(),
    ));

    (layer, io)
}

/// Per-connection setup: register the subscribe handlers
async fn on_connect(socket: SocketRef) {
    tracing::debug!(socket_id = %socket.id, "Realtime client connected");

    socket.on(
        realtime::KITCHEN_SUBSCRIBE,
        async |socket: SocketRef, Data(station): Data<Option<String>>| {
            let Some(station) = station.filter(|s| !s.is_empty()) else {
                return;
            };
            tracing::debug!(socket_id = %socket.id, station = %station, "Kitchen subscribe");
            let _ = socket.join(realtime::station_topic(&station));
        },
    );

    socket.on(
        realtime::ORDERS_SUBSCRIBE,
        async |socket: SocketRef, Data(user_id): Data<Option<String>>| {
            let Some(user_id) = user_id.filter(|s| !s.is_empty()) else {
                return;
            };
            tracing::debug!(socket_id = %socket.id, user_id = %user_id, "Orders subscribe");
            let _ = socket.join(realtime::order_topic(&user_id));
        },
    );
}

/// Forward bus events into Socket.IO rooms until the bus shuts down
async fn pump(io: SocketIo, mut rx: broadcast::Receiver<Event>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = rx.recv() => match received {
                Ok(event) => deliver(&io, event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // 仪表盘式投递：慢消费者丢最旧事件，继续前进
                    tracing::warn!(skipped, "Realtime pump lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!("Realtime pump stopped");
}

async fn deliver(io: &SocketIo, event: Event) {
    match &event {
        Event::OrderUpdate(payload) => {
            let room = realtime::order_topic(&payload.user_id);
            if let Err(e) = io.to(room).emit(realtime::ORDER_UPDATE, payload).await {
                tracing::debug!(error = %e, "order:update emit failed");
            }
        }
        Event::KitchenUpdate(payload) => {
            // 扇出到所有 station 房间；没有厨房订阅者时静默丢弃
            let rooms: Vec<String> = match io.rooms().await {
                Ok(rooms) => rooms
                    .into_iter()
                    .map(|r| r.to_string())
                    .filter(|r| r.starts_with("station:"))
                    .collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to enumerate rooms");
                    return;
                }
            };
            if rooms.is_empty() {
                return;
            }
            if let Err(e) = io.to(rooms).emit(realtime::KITCHEN_UPDATE, payload).await {
                tracing::debug!(error = %e, "kitchen:update emit failed");
            }
        }
    }
}
