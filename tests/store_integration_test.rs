//! Store integration tests
//!
//! These run against a throwaway Postgres pointed to by
//! BAZARBOT_TEST_DATABASE_URL and are skipped when it is not set or not
//! reachable.

use serial_test::serial;
use sqlx::PgPool;

use BazarBot::catalog::CatalogPruner;
use BazarBot::database::DatabaseService;
use BazarBot::models::channel_post::CreateChannelPostRequest;
use BazarBot::models::category::CreateCategoryRequest;
use BazarBot::models::product::CreateProductRequest;
use BazarBot::utils::errors::BazarBotError;

async fn test_database() -> Option<DatabaseService> {
    let url = std::env::var("BAZARBOT_TEST_DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    sqlx::migrate!("./migrations").run(&pool).await.ok()?;

    // Start from a clean slate
    sqlx::query("TRUNCATE cart_items, order_items, orders, customers, products, categories, channel_posts RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .ok()?;

    Some(DatabaseService::new(pool))
}

fn channel_post(message_id: i64) -> CreateChannelPostRequest {
    CreateChannelPostRequest {
        channel_id: -100123,
        message_id,
        name: "Sneakers".to_string(),
        caption: "Sneakers $40 #shoes".to_string(),
        price: 40,
        category: "Footwear".to_string(),
        image_file_id: None,
    }
}

#[tokio::test]
#[serial]
async fn channel_post_insert_is_idempotent() {
    let Some(db) = test_database().await else { return };

    let first = db.channel_posts.insert(channel_post(1)).await.unwrap();
    assert!(first.is_some());

    // Re-delivering the same source message must not create a duplicate
    let second = db.channel_posts.insert(channel_post(1)).await.unwrap();
    assert!(second.is_none());

    assert_eq!(db.channel_posts.count().await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn pruner_removes_only_expired_posts() {
    let Some(db) = test_database().await else { return };

    let old = db.channel_posts.insert(channel_post(10)).await.unwrap().unwrap();
    let fresh = db.channel_posts.insert(channel_post(11)).await.unwrap().unwrap();

    // Backdate one entry past the retention window, one inside it
    let pool_query = |id: i64, days: i64| {
        format!("UPDATE channel_posts SET posted_at = NOW() - INTERVAL '{} days' WHERE id = {}", days, id)
    };
    let pool = {
        let url = std::env::var("BAZARBOT_TEST_DATABASE_URL").unwrap();
        PgPool::connect(&url).await.unwrap()
    };
    sqlx::query(&pool_query(old.id, 15)).execute(&pool).await.unwrap();
    sqlx::query(&pool_query(fresh.id, 10)).execute(&pool).await.unwrap();

    let removed = CatalogPruner::prune_once(&db.channel_posts, 14).await.unwrap();
    assert_eq!(removed, 1);

    let remaining = db.channel_posts.list_by_category("Footwear").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, fresh.id);
}

#[tokio::test]
#[serial]
async fn cart_add_bumps_quantity_and_checkout_snapshots_prices() {
    let Some(db) = test_database().await else { return };

    let category = db
        .categories
        .create(CreateCategoryRequest {
            name: "Footwear".to_string(),
            description: None,
            image_url: None,
        })
        .await
        .unwrap();

    let product = db
        .products
        .create(CreateProductRequest {
            name: "Sneakers".to_string(),
            description: None,
            price: 40,
            image_url: None,
            category_id: category.id,
        })
        .await
        .unwrap();

    let customer = db.initialize_customer(777, Some("Test Customer".to_string())).await.unwrap();

    // Adding the same product twice bumps the quantity
    db.carts.add_item(customer.id, product.id, 1).await.unwrap();
    db.carts.add_item(customer.id, product.id, 2).await.unwrap();

    let lines = db.carts.get_lines(customer.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 3);

    let (order, order_lines) = db.orders.checkout(customer.id, None).await.unwrap();
    assert_eq!(order_lines.len(), 1);
    assert_eq!(order_lines[0].price, 40);
    assert_eq!(order_lines[0].quantity, 3);

    // The cart is emptied by the checkout transaction
    assert_eq!(db.carts.count_items(customer.id).await.unwrap(), 0);

    // A price change after checkout must not touch the snapshot
    db.products
        .update(
            product.id,
            BazarBot::models::product::UpdateProductRequest {
                price: Some(99),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = db.orders.get_items(order.id).await.unwrap();
    assert_eq!(stored[0].price, 40);
}

#[tokio::test]
#[serial]
async fn second_checkout_of_empty_cart_is_rejected() {
    let Some(db) = test_database().await else { return };

    let customer = db.initialize_customer(888, None).await.unwrap();

    let result = db.orders.checkout(customer.id, None).await;
    assert!(matches!(result, Err(BazarBotError::EmptyCart)));
}
