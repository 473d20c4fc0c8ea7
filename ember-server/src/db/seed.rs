//! Demo Data Seeding
//!
//! Populates an empty store with a small menu and demo accounts so a fresh
//! checkout is immediately usable. Gated on `SEED_DEMO_DATA` and only runs
//! against empty tables, so existing data is never touched.

use crate::auth::password::hash_password;
use crate::db::models::{MenuItemCreate, Role, UserCreate};
use crate::db::repository::{MenuRepository, UserRepository};
use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Demo account credentials (development only)
const DEMO_ACCOUNTS: [(&str, &str, &str, &str, Role); 3] = [
    ("admin@ember.local", "ember-admin-1", "Avery", "Admin", Role::Admin),
    ("staff@ember.local", "ember-staff-1", "Sam", "Station", Role::Staff),
    ("diner@ember.local", "ember-diner-1", "Dana", "Diner", Role::Customer),
];

/// Seed demo accounts and menu into an empty store
pub async fn run(db: &Surreal<Db>) -> Result<(), AppError> {
    seed_users(db).await?;
    seed_menu(db).await?;
    Ok(())
}

async fn seed_users(db: &Surreal<Db>) -> Result<(), AppError> {
    let users = UserRepository::new(db.clone());
    if users.count().await? > 0 {
        return Ok(());
    }

    for (email, password, first_name, last_name, role) in DEMO_ACCOUNTS {
        let password_hash = hash_password(password)
            .map_err(|e| AppError::internal(format!("Failed to hash seed password: {e}")))?;
        users
            .create(UserCreate {
                email: email.to_string(),
                password_hash,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                phone: None,
                role,
            })
            .await?;
    }

    tracing::warn!("Seeded demo accounts (admin@ember.local / staff@ember.local / diner@ember.local)");
    Ok(())
}

async fn seed_menu(db: &Surreal<Db>) -> Result<(), AppError> {
    let menu = MenuRepository::new(db.clone());
    if menu.count_categories().await? > 0 {
        return Ok(());
    }

    let categories = [
        ("appetizers", "Appetizers", "Utensils"),
        ("mains", "Main Course", "ChefHat"),
        ("salads", "Salads", "Leaf"),
        ("desserts", "Desserts", "Cake"),
        ("beverages", "Beverages", "Coffee"),
    ];

    let mut category_ids = std::collections::HashMap::new();
    for (slug, name, icon) in categories {
        let created = menu.create_category(slug, name, Some(icon)).await?;
        if let Some(id) = created.id {
            category_ids.insert(slug, id);
        }
    }

    let items = [
        (
            "Margherita Pizza",
            "Fresh mozzarella, tomato sauce, basil leaves on crispy thin crust",
            18.99,
            "mains",
            &["vegetarian"][..],
            &["gluten", "dairy"][..],
            0,
            15,
            true,
        ),
        (
            "Chicken Caesar Salad",
            "Grilled chicken breast, romaine lettuce, parmesan, croutons with caesar dressing",
            14.99,
            "salads",
            &["protein-rich"][..],
            &["dairy", "eggs"][..],
            0,
            10,
            false,
        ),
        (
            "Spicy Thai Curry",
            "Authentic red curry with coconut milk, vegetables, and jasmine rice",
            16.99,
            "mains",
            &["vegan", "gluten-free"][..],
            &[][..],
            3,
            20,
            true,
        ),
        (
            "Chocolate Lava Cake",
            "Warm chocolate cake with molten center, served with vanilla ice cream",
            8.99,
            "desserts",
            &["vegetarian"][..],
            &["gluten", "dairy", "eggs"][..],
            0,
            12,
            true,
        ),
        (
            "Bruschetta Trio",
            "Toasted baguette with tomato-basil, olive tapenade, and whipped ricotta",
            9.49,
            "appetizers",
            &["vegetarian"][..],
            &["gluten", "dairy"][..],
            0,
            8,
            false,
        ),
        (
            "Fresh Lemonade",
            "House-squeezed lemonade with mint",
            4.50,
            "beverages",
            &["vegan", "gluten-free"][..],
            &[][..],
            0,
            3,
            false,
        ),
    ];

    for (name, description, price, category_slug, dietary, allergens, spice, prep, popular) in items
    {
        let Some(category) = category_ids.get(category_slug) else {
            continue;
        };
        let mut item = MenuItemCreate::new(name, price, category.clone());
        item.description = Some(description.to_string());
        item.dietary = dietary.iter().map(|s| s.to_string()).collect();
        item.allergens = allergens.iter().map(|s| s.to_string()).collect();
        item.spice_level = spice;
        item.prep_time_minutes = Some(prep);
        item.is_popular = popular;
        menu.create_item(item).await?;
    }

    tracing::info!("Seeded demo menu ({} categories)", categories.len());
    Ok(())
}
