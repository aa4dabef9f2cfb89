//! Budget API integration tests
//!
//! CRUD, derived spending figures and threshold alerts.

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{authed_delete, authed_get, authed_post, authed_put, test_env};

macro_rules! create_budget {
    ($app:expr, $token:expr, $body:expr) => {{
        let resp = test::call_service(
            &$app,
            authed_post("/api/budgets", &$token, $body).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["budget"].clone()
    }};
}

macro_rules! spend {
    ($app:expr, $token:expr, $category:expr, $amount:expr, $date:expr) => {{
        let resp = test::call_service(
            &$app,
            authed_post(
                "/api/transactions",
                &$token,
                json!({
                    "type": "expense",
                    "amount": $amount,
                    "category": $category,
                    "description": "spend",
                    "date": $date,
                }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }};
}

fn food_budget(amount: f64) -> Value {
    json!({
        "name": "Groceries",
        "category": "Food",
        "amount": amount,
        "period": "monthly",
        "startDate": "2025-06-01",
        "endDate": "2025-06-30",
    })
}

#[actix_rt::test]
async fn test_create_budget_defaults() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "budget-create@example.com");

    let budget = create_budget!(app, token, food_budget(300.0));

    assert_eq!(budget["name"], "Groceries");
    assert_eq!(budget["category"], "Food");
    assert_eq!(budget["amount"], 300.0);
    assert_eq!(budget["spent"], 0.0);
    assert_eq!(budget["remaining"], 300.0);
    assert_eq!(budget["percentageUsed"], 0.0);
    assert_eq!(budget["period"], "monthly");
    assert_eq!(budget["alerts"], json!({"enabled": true, "threshold": 80}));
    assert!(
        budget["endDate"]
            .as_str()
            .unwrap()
            .starts_with("2025-06-30T23:59:59")
    );
}

#[actix_rt::test]
async fn test_create_budget_validation() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "budget-invalid@example.com");

    let mut income_category = food_budget(100.0);
    income_category["category"] = json!("Salary");

    let mut negative = food_budget(100.0);
    negative["amount"] = json!(-10);

    let mut reversed = food_budget(100.0);
    reversed["startDate"] = json!("2025-07-01");

    let mut bad_threshold = food_budget(100.0);
    bad_threshold["alerts"] = json!({"threshold": 150});

    let mut blank_name = food_budget(100.0);
    blank_name["name"] = json!("  ");

    for payload in [income_category, negative, reversed, bad_threshold, blank_name] {
        let resp = test::call_service(
            &app,
            authed_post("/api/budgets", &token, payload.clone()).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 4001, "payload: {}", payload);
    }

    let mut bad_date = food_budget(100.0);
    bad_date["endDate"] = json!("end of june");
    let resp = test::call_service(
        &app,
        authed_post("/api/budgets", &token, bad_date).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1012);
}

#[actix_rt::test]
async fn test_budget_spent_tracks_matching_expenses() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "budget-spent@example.com");

    let budget = create_budget!(app, token, food_budget(200.0));
    let uri = format!("/api/budgets/{}", budget["id"].as_str().unwrap());

    spend!(app, token, "Food", 50, "2025-06-05");
    spend!(app, token, "Food", 50, "2025-06-30T18:00:00Z");
    // 以下均不计入：其他分类、窗口外、收入
    spend!(app, token, "Bills", 80, "2025-06-10");
    spend!(app, token, "Food", 999, "2025-07-01");
    let resp = test::call_service(
        &app,
        authed_post(
            "/api/transactions",
            &token,
            json!({"type": "income", "amount": 500, "category": "Other", "description": "refund", "date": "2025-06-12"}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, authed_get(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let budget = &body["budget"];
    assert_eq!(budget["spent"], 100.0);
    assert_eq!(budget["remaining"], 100.0);
    assert_eq!(budget["percentageUsed"], 50.0);
}

#[actix_rt::test]
async fn test_update_and_delete_budget() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "budget-update@example.com");

    let budget = create_budget!(app, token, food_budget(100.0));
    let uri = format!("/api/budgets/{}", budget["id"].as_str().unwrap());

    let resp = test::call_service(
        &app,
        authed_put(
            &uri,
            &token,
            json!({"amount": 150, "alerts": {"enabled": false}}),
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["budget"]["amount"], 150.0);
    assert_eq!(body["budget"]["name"], "Groceries");
    assert_eq!(
        body["budget"]["alerts"],
        json!({"enabled": false, "threshold": 80})
    );

    // 新结束日期早于开始日期
    let resp = test::call_service(
        &app,
        authed_put(&uri, &token, json!({"endDate": "2025-05-01"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, authed_delete(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Budget deleted successfully");

    let resp = test::call_service(&app, authed_get(&uri, &token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);
    assert_eq!(body["message"], "Budget not found");
}

#[actix_rt::test]
async fn test_list_budgets_is_per_user() {
    let env = test_env().await;
    let app = finance_app!(env);
    let alice = register_user!(app, "budget-alice@example.com");
    let bob = register_user!(app, "budget-bob@example.com");

    create_budget!(app, alice, food_budget(100.0));
    let mut second = food_budget(50.0);
    second["name"] = json!("Streaming");
    second["category"] = json!("Entertainment");
    create_budget!(app, alice, second);

    let resp = test::call_service(&app, authed_get("/api/budgets", &alice).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    let budgets = body["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 2);
    // 最新创建的在前
    assert_eq!(budgets[0]["name"], "Streaming");

    let resp = test::call_service(&app, authed_get("/api/budgets", &bob).to_request()).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["budgets"], json!([]));

    let uri = format!("/api/budgets/{}", budgets[0]["id"].as_str().unwrap());
    let resp = test::call_service(&app, authed_delete(&uri, &bob).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_check_alerts_threshold() {
    let env = test_env().await;
    let app = finance_app!(env);
    let token = register_user!(app, "budget-alerts@example.com");

    // 85% 使用，阈值 80 → 触发
    let food = create_budget!(app, token, food_budget(100.0));
    spend!(app, token, "Food", 85, "2025-06-10");

    // 50% 使用 → 不触发
    let mut bills = food_budget(100.0);
    bills["name"] = json!("Utilities");
    bills["category"] = json!("Bills");
    create_budget!(app, token, bills);
    spend!(app, token, "Bills", 50, "2025-06-10");

    // 超支但关闭提醒 → 不触发
    let mut travel = food_budget(10.0);
    travel["name"] = json!("Trips");
    travel["category"] = json!("Travel");
    travel["alerts"] = json!({"enabled": false});
    create_budget!(app, token, travel);
    spend!(app, token, "Travel", 100, "2025-06-10");

    // 阈值 0 → 即使未花费也触发
    let mut health = food_budget(100.0);
    health["name"] = json!("Doctor");
    health["category"] = json!("Healthcare");
    health["alerts"] = json!({"threshold": 0});
    create_budget!(app, token, health);

    let resp = test::call_service(
        &app,
        authed_get("/api/budgets/alerts/check", &token).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);

    let food_alert = alerts
        .iter()
        .find(|a| a["budgetId"] == food["id"])
        .expect("food alert missing");
    assert_eq!(food_alert["name"], "Groceries");
    assert_eq!(food_alert["category"], "Food");
    assert_eq!(food_alert["spent"], 85.0);
    assert_eq!(food_alert["budget"], 100.0);
    assert_eq!(food_alert["percentageUsed"], 85);
    assert_eq!(food_alert["threshold"], 80);

    assert!(alerts.iter().any(|a| a["name"] == "Doctor"));
}
