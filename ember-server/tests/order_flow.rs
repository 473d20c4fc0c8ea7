//! End-to-end order flow against an in-memory store
//!
//! Drives the cart → order → status path through the real repositories and
//! OrderService, with a recording publisher standing in for the websocket
//! layer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use ember_server::AppError;
use ember_server::db::DbService;
use ember_server::db::models::{MenuItemCreate, OrderStatus, Role, UserCreate};
use ember_server::db::repository::{
    CartRepository, MenuRepository, OrderRepository, RepoError, UserRepository,
};
use ember_server::orders::OrderService;
use ember_server::realtime::EventPublisher;
use shared::realtime::Event;

/// Test double that records everything published
#[derive(Default)]
struct RecordingPublisher {
    events: Mutex<Vec<Event>>,
}

impl RecordingPublisher {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

struct TestHarness {
    db: Surreal<Db>,
    publisher: Arc<RecordingPublisher>,
    service: OrderService,
}

impl TestHarness {
    async fn new() -> Self {
        let db_service = DbService::memory().await.expect("in-memory db");
        let db = db_service.db;
        let publisher = Arc::new(RecordingPublisher::default());
        let service = OrderService::new(db.clone(), publisher.clone());
        Self {
            db,
            publisher,
            service,
        }
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    fn carts(&self) -> CartRepository {
        CartRepository::new(self.db.clone())
    }

    fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.db.clone())
    }

    fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.db.clone())
    }

    async fn create_user(&self, email: &str) -> RecordId {
        let user = self
            .users()
            .create(UserCreate {
                email: email.to_string(),
                password_hash: "$argon2-test-hash$".to_string(),
                first_name: "Test".to_string(),
                last_name: "Diner".to_string(),
                phone: None,
                role: Role::Customer,
            })
            .await
            .expect("user created");
        user.id.expect("user id")
    }

    async fn create_menu_item(&self, name: &str, price: f64) -> RecordId {
        let category = self
            .menu()
            .find_category_by_slug("mains")
            .await
            .expect("category query");
        let category = match category {
            Some(c) => c,
            None => self
                .menu()
                .create_category("mains", "Main Course", None)
                .await
                .expect("category created"),
        };
        let item = self
            .menu()
            .create_item(MenuItemCreate::new(
                name,
                price,
                category.id.expect("category id"),
            ))
            .await
            .expect("item created");
        item.id.expect("item id")
    }
}

#[tokio::test]
async fn test_place_order_locks_total_and_clears_cart() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;
    let soda = h.create_menu_item("Soda", 5.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.clone().unwrap();
    h.carts().add_item(&cart_id, &pizza, 2, None).await.unwrap();
    h.carts().add_item(&cart_id, &soda, 1, None).await.unwrap();

    let order = h
        .service
        .place_order(&user, &cart_id.to_string(), None, None)
        .await
        .expect("order placed");

    // {price: 10.00, qty: 2} + {price: 5.00, qty: 1} => 25.00
    assert_eq!(order.total, 25.00);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);

    // Source cart has zero lines after submission
    let lines = h.carts().lines(&cart_id).await.unwrap();
    assert!(lines.is_empty());

    // Both event kinds were fanned out after the commit
    let events = h.publisher.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::OrderUpdate(p) => {
            assert_eq!(p.total, 25.00);
            assert_eq!(p.status, "PENDING");
            assert_eq!(p.user_id, user.to_string());
        }
        other => panic!("expected order update first, got {other:?}"),
    }
    match &events[1] {
        Event::KitchenUpdate(p) => {
            assert_eq!(p.status, "PENDING");
            assert!(p.items.is_none());
        }
        other => panic!("expected kitchen update, got {other:?}"),
    }
}

#[tokio::test]
async fn test_place_order_uses_live_menu_price() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.clone().unwrap();
    h.carts().add_item(&cart_id, &pizza, 2, None).await.unwrap();

    // Price changes between add-to-cart and checkout
    h.db.query("UPDATE $item SET price = $price")
        .bind(("item", pizza.clone()))
        .bind(("price", 12.50_f64))
        .await
        .unwrap()
        .check()
        .unwrap();

    let order = h
        .service
        .place_order(&user, &cart_id.to_string(), None, None)
        .await
        .unwrap();

    // Submission-time price is what gets locked in
    assert_eq!(order.total, 25.00);
    assert_eq!(order.items[0].price, 12.50);

    // ...and later menu edits no longer move the frozen order
    h.db.query("UPDATE $item SET price = $price")
        .bind(("item", pizza))
        .bind(("price", 99.0_f64))
        .await
        .unwrap()
        .check()
        .unwrap();
    let reloaded = h
        .orders()
        .view(&order.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.total, 25.00);
    assert_eq!(reloaded.items[0].price, 12.50);
}

#[tokio::test]
async fn test_place_order_rejects_empty_cart() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();

    let err = h
        .service
        .place_order(&user, &cart_id.to_string(), None, None)
        .await
        .expect_err("empty cart must be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // No events for a failed placement
    assert!(h.publisher.events().is_empty());
}

#[tokio::test]
async fn test_place_order_rejects_foreign_cart() {
    let h = TestHarness::new().await;
    let owner = h.create_user("owner@test.local").await;
    let attacker = h.create_user("other@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&owner).await.unwrap();
    let cart_id = cart.id.unwrap();
    h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();

    let err = h
        .service
        .place_order(&attacker, &cart_id.to_string(), None, None)
        .await
        .expect_err("foreign cart must be invisible");
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // The owner's cart is untouched
    assert_eq!(h.carts().lines(&cart_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_item_twice_merges_lines() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();

    h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
    let line = h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();

    // One line with summed quantity, never two lines
    assert_eq!(line.quantity, 2);
    let lines = h.carts().lines(&cart_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
}

#[tokio::test]
async fn test_add_item_keeps_first_notes() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();

    h.carts()
        .add_item(&cart_id, &pizza, 1, Some("no basil".to_string()))
        .await
        .unwrap();
    let line = h
        .carts()
        .add_item(&cart_id, &pizza, 1, Some("extra basil".to_string()))
        .await
        .unwrap();

    assert_eq!(line.notes.as_deref(), Some("no basil"));
}

#[tokio::test]
async fn test_cart_quantity_validation() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();

    let err = h.carts().add_item(&cart_id, &pizza, 0, None).await;
    assert!(matches!(err, Err(RepoError::Validation(_))));

    let line = h.carts().add_item(&cart_id, &pizza, 3, None).await.unwrap();
    let line_id = line.id.unwrap().to_string();

    let err = h.carts().update_item(&line_id, 0).await;
    assert!(matches!(err, Err(RepoError::Validation(_))));

    let updated = h.carts().update_item(&line_id, 5).await.unwrap();
    assert_eq!(updated.quantity, 5);
}

#[tokio::test]
async fn test_missing_cart_lines_are_not_found() {
    let h = TestHarness::new().await;

    let err = h.carts().update_item("cart_item:nope", 2).await;
    assert!(matches!(err, Err(RepoError::NotFound(_))));

    let err = h.carts().remove_item("cart_item:nope").await;
    assert!(matches!(err, Err(RepoError::NotFound(_))));
}

#[tokio::test]
async fn test_get_or_create_returns_same_cart() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;

    let first = h.carts().get_or_create(&user).await.unwrap();
    let second = h.carts().get_or_create(&user).await.unwrap();
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_set_status_round_trip_is_permissive() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();
    h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
    let order = h
        .service
        .place_order(&user, &cart_id.to_string(), None, None)
        .await
        .unwrap();
    let order_id = order.id_string();

    // Any recognized status may follow any other, terminal or not
    for status in ["CANCELLED", "PENDING", "IN_PROGRESS", "READY", "COMPLETED"] {
        let updated = h.service.set_status(&order_id, status).await.unwrap();
        assert_eq!(updated.status.to_string(), status);
    }

    // Status changes carry the items on the kitchen channel
    let events = h.publisher.events();
    let kitchen_with_items = events.iter().any(|e| {
        matches!(e, Event::KitchenUpdate(p) if p.items.as_ref().is_some_and(|i| !i.is_empty()))
    });
    assert!(kitchen_with_items);
}

#[tokio::test]
async fn test_set_status_rejects_unknown_value() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let cart = h.carts().get_or_create(&user).await.unwrap();
    let cart_id = cart.id.unwrap();
    h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
    let order = h
        .service
        .place_order(&user, &cart_id.to_string(), None, None)
        .await
        .unwrap();
    let order_id = order.id_string();
    let events_before = h.publisher.events().len();

    let err = h
        .service
        .set_status(&order_id, "BOGUS")
        .await
        .expect_err("unknown status must be rejected");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // Row unchanged, nothing published
    let reloaded = h
        .orders()
        .view(&order.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, OrderStatus::Pending);
    assert_eq!(h.publisher.events().len(), events_before);
}

#[tokio::test]
async fn test_kitchen_queue_excludes_terminal_orders() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let mut order_ids = Vec::new();
    for _ in 0..3 {
        let cart = h.carts().get_or_create(&user).await.unwrap();
        let cart_id = cart.id.unwrap();
        h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
        let order = h
            .service
            .place_order(&user, &cart_id.to_string(), None, None)
            .await
            .unwrap();
        order_ids.push(order.id_string());
        // keep created_at strictly increasing for the oldest-first check
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    h.service
        .set_status(&order_ids[0], "COMPLETED")
        .await
        .unwrap();
    h.service
        .set_status(&order_ids[2], "CANCELLED")
        .await
        .unwrap();
    h.service
        .set_status(&order_ids[1], "IN_PROGRESS")
        .await
        .unwrap();

    let queue = h.orders().kitchen_queue().await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id_string(), order_ids[1]);
    assert!(queue.iter().all(|o| !o.status.is_terminal()));
}

#[tokio::test]
async fn test_kitchen_queue_is_oldest_first() {
    let h = TestHarness::new().await;
    let user = h.create_user("diner@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    let mut order_ids = Vec::new();
    for _ in 0..3 {
        let cart = h.carts().get_or_create(&user).await.unwrap();
        let cart_id = cart.id.unwrap();
        h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
        let order = h
            .service
            .place_order(&user, &cart_id.to_string(), None, None)
            .await
            .unwrap();
        order_ids.push(order.id_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let queue = h.orders().kitchen_queue().await.unwrap();
    let queued: Vec<String> = queue.iter().map(|o| o.id_string()).collect();
    assert_eq!(queued, order_ids);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let h = TestHarness::new().await;
    h.create_user("dup@test.local").await;

    let err = h
        .users()
        .create(UserCreate {
            email: "dup@test.local".to_string(),
            password_hash: "$argon2-test-hash$".to_string(),
            first_name: "Second".to_string(),
            last_name: "Diner".to_string(),
            phone: None,
            role: Role::Customer,
        })
        .await;
    assert!(matches!(err, Err(RepoError::Duplicate(_))));
}

#[tokio::test]
async fn test_on_disk_database_opens_and_reopens() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("ember.db");

    {
        let service = DbService::new(&path.to_string_lossy())
            .await
            .expect("first open");
        UserRepository::new(service.db.clone())
            .create(UserCreate {
                email: "persist@test.local".to_string(),
                password_hash: "$argon2-test-hash$".to_string(),
                first_name: "Persist".to_string(),
                last_name: "Diner".to_string(),
                phone: None,
                role: Role::Customer,
            })
            .await
            .expect("user created");
    }

    // Give the first handle time to release the storage lock
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Schema re-application is idempotent and data survives a reopen
    let service = DbService::new(&path.to_string_lossy())
        .await
        .expect("second open");
    let found = UserRepository::new(service.db.clone())
        .find_by_email("persist@test.local")
        .await
        .expect("query");
    assert!(found.is_some());
}

#[tokio::test]
async fn test_orders_listing_scopes() {
    let h = TestHarness::new().await;
    let alice = h.create_user("alice@test.local").await;
    let bob = h.create_user("bob@test.local").await;
    let pizza = h.create_menu_item("Pizza", 10.00).await;

    for user in [&alice, &bob] {
        let cart = h.carts().get_or_create(user).await.unwrap();
        let cart_id = cart.id.unwrap();
        h.carts().add_item(&cart_id, &pizza, 1, None).await.unwrap();
        h.service
            .place_order(user, &cart_id.to_string(), None, None)
            .await
            .unwrap();
    }

    let own = h.service.list_for(&alice, false).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].user, alice);

    let all = h.service.list_for(&alice, true).await.unwrap();
    assert_eq!(all.len(), 2);
}
