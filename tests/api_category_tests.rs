//! 分类 API 集成测试

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

mod common;
use common::{
    body_json, create_category, create_test_app_state, register_and_login, send_json,
    setup_test_db,
};

#[tokio::test]
#[serial]
async fn test_create_category() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;

    let response = send_json(
        app,
        "POST",
        "/categories/",
        Some(&token),
        Some(json!({ "category_name": "Stews" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["category_name"], "Stews");
    assert!(json["category_id"].is_i64());
    assert!(json["created_by"].is_i64());
}

#[tokio::test]
#[serial]
async fn test_create_category_duplicate_name() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;
    create_category(&app, &token, "Stews").await;

    let response = send_json(
        app,
        "POST",
        "/categories/",
        Some(&token),
        Some(json!({ "category_name": "Stews" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn test_same_name_allowed_for_different_owners() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token_a = register_and_login(&app, "a@b.com", "abcdef").await;
    let token_b = register_and_login(&app, "b@b.com", "abcdef").await;

    create_category(&app, &token_a, "Stews").await;
    // 另一个用户可以用同名分类
    create_category(&app, &token_b, "Stews").await;
}

#[tokio::test]
#[serial]
async fn test_create_category_invalid_name() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;

    for bad_name in ["", "   ", "12345", "!!!"] {
        let response = send_json(
            app.clone(),
            "POST",
            "/categories/",
            Some(&token),
            Some(json!({ "category_name": bad_name })),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "name {:?} should be rejected",
            bad_name
        );
    }
}

#[tokio::test]
#[serial]
async fn test_list_categories_pagination() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;
    for i in 1..=7 {
        create_category(&app, &token, &format!("Category {}", i)).await;
    }

    // 默认 page=1, per_page=5
    let response = send_json(app.clone(), "GET", "/categories/", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 5);
    assert_eq!(json["total"], 7);
    assert_eq!(json["page"], 1);
    assert_eq!(json["per_page"], 5);

    let response = send_json(
        app.clone(),
        "GET",
        "/categories/?page=2&per_page=5",
        Some(&token),
        None,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 2);
    assert_eq!(json["page"], 2);

    // 极端 page 值不能让请求崩溃，只会落到一个空页
    let response = send_json(
        app,
        "GET",
        "/categories/?page=9223372036854775807",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 0);
    assert_eq!(json["total"], 7);
}

#[tokio::test]
#[serial]
async fn test_list_categories_filter_case_insensitive() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;
    create_category(&app, &token, "Beef Stews").await;
    create_category(&app, &token, "Salads").await;

    let response = send_json(
        app,
        "GET",
        "/categories/?q=stew",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["categories"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category_name"], "Beef Stews");
}

#[tokio::test]
#[serial]
async fn test_cross_user_isolation() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token_a = register_and_login(&app, "a@b.com", "abcdef").await;
    let token_b = register_and_login(&app, "b@b.com", "abcdef").await;

    let category_id = create_category(&app, &token_a, "Stews").await;

    // B 的列表为空，看不到 A 的分类
    let response = send_json(app.clone(), "GET", "/categories/", Some(&token_b), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 0);
    assert_eq!(json["total"], 0);

    // B 对 A 的分类 get/update/delete 一律 404
    let uri = format!("/categories/{}", category_id);
    let response = send_json(app.clone(), "GET", &uri, Some(&token_b), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        app.clone(),
        "PUT",
        &uri,
        Some(&token_b),
        Some(json!({ "category_name": "Hijacked" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(app.clone(), "DELETE", &uri, Some(&token_b), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A 自己仍然可以访问
    let response = send_json(app, "GET", &uri, Some(&token_a), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_update_category() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;
    let category_id = create_category(&app, &token, "Stews").await;

    let response = send_json(
        app.clone(),
        "PUT",
        &format!("/categories/{}", category_id),
        Some(&token),
        Some(json!({ "category_name": "Soups" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["category_name"], "Soups");

    // 改名撞上已有分类 → 409
    create_category(&app, &token, "Salads").await;
    let response = send_json(
        app,
        "PUT",
        &format!("/categories/{}", category_id),
        Some(&token),
        Some(json!({ "category_name": "Salads" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[serial]
async fn test_delete_category_idempotence() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool).await;
    let app = recipe_service::routes::create_router(state);

    let token = register_and_login(&app, "a@b.com", "abcdef").await;
    let category_id = create_category(&app, &token, "Stews").await;

    let uri = format!("/categories/{}", category_id);

    // 第一次删除成功，第二次 404
    let response = send_json(app.clone(), "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_json(app.clone(), "DELETE", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(app, "GET", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
