//! 数据访问层集成测试

use chrono::{Duration, Utc};
use serial_test::serial;

mod common;
use common::{create_test_user, setup_test_db};

use recipe_service::repository::{CategoryRepository, RecipeRepository, TokenRepository};

#[tokio::test]
#[serial]
async fn test_token_revoke_is_idempotent() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = TokenRepository::new(pool);

    let expires_at = Utc::now() + Duration::hours(1);

    assert!(!repo.is_revoked("tok-1").await.unwrap());

    repo.revoke("tok-1", expires_at).await.unwrap();
    assert!(repo.is_revoked("tok-1").await.unwrap());

    // 再次撤销同一令牌不报错
    repo.revoke("tok-1", expires_at).await.unwrap();
    assert!(repo.is_revoked("tok-1").await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_prune_removes_only_expired_entries() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let repo = TokenRepository::new(pool);

    repo.revoke("expired-tok", Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    repo.revoke("live-tok", Utc::now() + Duration::hours(1))
        .await
        .unwrap();

    let pruned = repo.prune_expired().await.unwrap();
    assert_eq!(pruned, 1);

    assert!(!repo.is_revoked("expired-tok").await.unwrap());
    assert!(repo.is_revoked("live-tok").await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_category_owner_scoping() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let alice = create_test_user(&pool, "alice@example.com", "abcdef")
        .await
        .unwrap();
    let bob = create_test_user(&pool, "bob@example.com", "abcdef")
        .await
        .unwrap();

    let repo = CategoryRepository::new(pool);
    let category = repo.create(alice, "Stews").await.unwrap();

    // 所有查询都带 owner 约束
    assert!(repo
        .find_by_id(alice, category.category_id)
        .await
        .unwrap()
        .is_some());
    assert!(repo
        .find_by_id(bob, category.category_id)
        .await
        .unwrap()
        .is_none());

    assert_eq!(repo.count(alice, "").await.unwrap(), 1);
    assert_eq!(repo.count(bob, "").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_delete_user_cascades() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;

    let alice = create_test_user(&pool, "alice@example.com", "abcdef")
        .await
        .unwrap();

    let categories = CategoryRepository::new(pool.clone());
    let recipes = RecipeRepository::new(pool.clone());

    let category = categories.create(alice, "Stews").await.unwrap();
    recipes
        .create(category.category_id, "Beef Stew", "beef", "simmer")
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(alice)
        .execute(&pool)
        .await
        .unwrap();

    // 用户删除后其分类与菜谱一并消失
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
