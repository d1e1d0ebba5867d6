use rust_decimal::Decimal;
use serde_json::{json, Value};

mod common;
use common::TestApp;

/// Decimal fields may serialize as JSON strings or numbers depending on
/// serde configuration; accept both.
fn as_decimal(v: &Value) -> Decimal {
    match v {
        Value::String(s) => s.parse().expect("invalid decimal string"),
        Value::Number(n) => n.to_string().parse().expect("invalid decimal number"),
        _ => panic!("not a decimal value: {v}"),
    }
}

async fn create_account(app: &TestApp, name: &str, balance: f64) -> String {
    let payload = json!({
        "name": name,
        "type": "checking",
        "balance": balance
    });
    let response = app.post("/api/v1/accounts", &payload).await;
    assert_eq!(response.status(), 201);
    let body = response.json().await;
    body["id"].as_str().unwrap().to_string()
}

async fn create_category(app: &TestApp, name: &str, category_type: &str) -> String {
    let payload = json!({
        "name": name,
        "type": category_type,
        "color": "#4CAF50"
    });
    let response = app.post("/api/v1/categories", &payload).await;
    assert_eq!(response.status(), 201);
    let body = response.json().await;
    body["id"].as_str().unwrap().to_string()
}

async fn account_balance(app: &TestApp, account_id: &str) -> Decimal {
    let response = app.get(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;
    as_decimal(&body["balance"])
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await;
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_create_account_applies_defaults() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Defaults Checking",
        "type": "checking"
    });

    let response = app.post("/api/v1/accounts", &payload).await;

    assert_eq!(response.status(), 201);
    let body = response.json().await;
    assert_eq!(as_decimal(&body["balance"]), Decimal::ZERO);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["isActive"], true);
    assert_eq!(body["type"], "checking");
}

#[actix_rt::test]
async fn test_get_nonexistent_account_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/v1/accounts/00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status(), 404);
    let body = response.json().await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_get_nonexistent_transaction_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .get("/api/v1/transactions/00000000-0000-0000-0000-000000000000")
        .await;

    assert_eq!(response.status(), 404);
    let body = response.json().await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_update_and_delete_account() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Renamable", 0.0).await;

    let payload = json!({
        "name": "Renamed",
        "type": "savings",
        "currency": "EUR",
        "isActive": false
    });
    let response = app.put(&format!("/api/v1/accounts/{account_id}"), &payload).await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["type"], "savings");
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["isActive"], false);

    let response = app.delete(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(response.status(), 404);
}

#[actix_rt::test]
async fn test_income_increases_account_balance() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Income Target", 100.0).await;
    let category_id = create_category(&app, "Salary Inc", "income").await;

    let payload = json!({
        "amount": 50.25,
        "description": "Paycheck",
        "date": "2001-02-03",
        "categoryId": category_id,
        "type": "income",
        "accountId": account_id
    });

    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);

    let balance = account_balance(&app, &account_id).await;
    assert_eq!(balance, "150.25".parse::<Decimal>().unwrap());
}

#[actix_rt::test]
async fn test_expense_decreases_account_balance() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Expense Source", 100.0).await;
    let category_id = create_category(&app, "Food Exp", "expense").await;

    let payload = json!({
        "amount": 30.50,
        "description": "Dinner",
        "date": "2001-02-04",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });

    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);

    let balance = account_balance(&app, &account_id).await;
    assert_eq!(balance, "69.50".parse::<Decimal>().unwrap());
}

#[actix_rt::test]
async fn test_transfer_leaves_balance_unchanged() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Transfer Acct", 100.0).await;
    let category_id = create_category(&app, "Transfers Cat", "both").await;

    let payload = json!({
        "amount": 500.00,
        "description": "Move to savings",
        "date": "2001-02-05",
        "categoryId": category_id,
        "type": "transfer",
        "accountId": account_id
    });

    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);

    let balance = account_balance(&app, &account_id).await;
    assert_eq!(balance, "100.00".parse::<Decimal>().unwrap());
}

#[actix_rt::test]
async fn test_delete_transaction_reverses_balance_effect() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Delete Reverses", 200.0).await;
    let category_id = create_category(&app, "Del Cat", "expense").await;

    let payload = json!({
        "amount": 75.00,
        "description": "Refundable",
        "date": "2001-02-06",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });
    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);
    let transaction_id = response.json().await["id"].as_str().unwrap().to_string();

    assert_eq!(
        account_balance(&app, &account_id).await,
        "125.00".parse::<Decimal>().unwrap()
    );

    let response = app
        .delete(&format!("/api/v1/transactions/{transaction_id}"))
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(
        account_balance(&app, &account_id).await,
        "200.00".parse::<Decimal>().unwrap()
    );

    // A second delete finds nothing
    let response = app
        .delete(&format!("/api/v1/transactions/{transaction_id}"))
        .await;
    assert_eq!(response.status(), 404);
}

#[actix_rt::test]
async fn test_update_transaction_adjusts_by_delta_difference() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Update Delta", 100.0).await;
    let category_id = create_category(&app, "Upd Cat", "both").await;

    let payload = json!({
        "amount": 40.00,
        "description": "Was an expense",
        "date": "2001-02-07",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });
    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);
    let transaction_id = response.json().await["id"].as_str().unwrap().to_string();

    assert_eq!(
        account_balance(&app, &account_id).await,
        "60.00".parse::<Decimal>().unwrap()
    );

    // Flip to an income of 25: reverse -40, apply +25
    let payload = json!({
        "amount": 25.00,
        "description": "Now an income",
        "date": "2001-02-07",
        "categoryId": category_id,
        "type": "income",
        "accountId": account_id
    });
    let response = app
        .put(&format!("/api/v1/transactions/{transaction_id}"), &payload)
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(
        account_balance(&app, &account_id).await,
        "125.00".parse::<Decimal>().unwrap()
    );
}

#[actix_rt::test]
async fn test_update_transaction_migrates_balance_across_accounts() {
    let app = TestApp::new().await;
    let source_id = create_account(&app, "Migrate Source", 0.0).await;
    let target_id = create_account(&app, "Migrate Target", 0.0).await;
    let category_id = create_category(&app, "Mig Cat", "income").await;

    let payload = json!({
        "amount": 50.00,
        "description": "Lands on source",
        "date": "2001-02-08",
        "categoryId": category_id,
        "type": "income",
        "accountId": source_id
    });
    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);
    let transaction_id = response.json().await["id"].as_str().unwrap().to_string();

    assert_eq!(
        account_balance(&app, &source_id).await,
        "50.00".parse::<Decimal>().unwrap()
    );

    let payload = json!({
        "amount": 50.00,
        "description": "Moved to target",
        "date": "2001-02-08",
        "categoryId": category_id,
        "type": "income",
        "accountId": target_id
    });
    let response = app
        .put(&format!("/api/v1/transactions/{transaction_id}"), &payload)
        .await;
    assert_eq!(response.status(), 200);

    assert_eq!(account_balance(&app, &source_id).await, Decimal::ZERO);
    assert_eq!(
        account_balance(&app, &target_id).await,
        "50.00".parse::<Decimal>().unwrap()
    );
}

#[actix_rt::test]
async fn test_update_nonexistent_transaction_returns_404() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Upd Missing Tx", 0.0).await;
    let category_id = create_category(&app, "Upd Missing Cat", "expense").await;

    let payload = json!({
        "amount": 15.00,
        "description": "No such transaction",
        "date": "2001-02-07",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });

    let response = app
        .put(
            "/api/v1/transactions/00000000-0000-0000-0000-000000000000",
            &payload,
        )
        .await;

    assert_eq!(response.status(), 404);
    let body = response.json().await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_update_transaction_to_missing_account_fails() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Upd Bad Target", 100.0).await;
    let category_id = create_category(&app, "Upd Bad Cat", "expense").await;

    let payload = json!({
        "amount": 40.00,
        "description": "Stays put",
        "date": "2001-02-07",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });
    let response = app.post("/api/v1/transactions", &payload).await;
    assert_eq!(response.status(), 201);
    let transaction_id = response.json().await["id"].as_str().unwrap().to_string();

    let payload = json!({
        "amount": 40.00,
        "description": "Pointed at nothing",
        "date": "2001-02-07",
        "categoryId": category_id,
        "type": "expense",
        "accountId": "00000000-0000-0000-0000-000000000000"
    });
    let response = app
        .put(&format!("/api/v1/transactions/{transaction_id}"), &payload)
        .await;

    assert_eq!(response.status(), 404);
    let body = response.json().await;
    assert_eq!(body["error"], "NOT_FOUND");

    // The failed replace must not have touched the original account
    assert_eq!(
        account_balance(&app, &account_id).await,
        "60.00".parse::<Decimal>().unwrap()
    );
}

#[actix_rt::test]
async fn test_create_transaction_against_missing_account_fails() {
    let app = TestApp::new().await;
    let category_id = create_category(&app, "Orphan Cat", "expense").await;

    let payload = json!({
        "amount": 10.00,
        "description": "No account",
        "date": "2001-02-09",
        "categoryId": category_id,
        "type": "expense",
        "accountId": "00000000-0000-0000-0000-000000000000"
    });

    let response = app.post("/api/v1/transactions", &payload).await;

    assert_eq!(response.status(), 404);
    let body = response.json().await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_create_transaction_rejects_non_positive_amount() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Neg Amount", 0.0).await;
    let category_id = create_category(&app, "Neg Cat", "expense").await;

    let payload = json!({
        "amount": -5.00,
        "description": "Bad amount",
        "date": "2001-02-10",
        "categoryId": category_id,
        "type": "expense",
        "accountId": account_id
    });

    let response = app.post("/api/v1/transactions", &payload).await;

    assert_eq!(response.status(), 400);
    let body = response.json().await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_list_transactions_filters_by_category() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "List Acct", 0.0).await;
    let category_id = create_category(&app, "List Cat", "expense").await;

    for (amount, day) in [(10.0, 11), (20.0, 12), (30.0, 13)] {
        let payload = json!({
            "amount": amount,
            "description": format!("item {day}"),
            "date": format!("2002-03-{day}"),
            "categoryId": category_id,
            "type": "expense",
            "accountId": account_id
        });
        let response = app.post("/api/v1/transactions", &payload).await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .get(&format!(
            "/api/v1/transactions?categoryId={category_id}&limit=2&page=1"
        ))
        .await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    // Sorted by date descending, with the category embedded
    assert_eq!(body["data"][0]["date"], "2002-03-13");
    assert_eq!(body["data"][0]["category"]["name"], "List Cat");
}

#[actix_rt::test]
async fn test_monthly_report_sums_income_and_expenses() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Report Acct", 0.0).await;
    let salary_id = create_category(&app, "Report Salary", "income").await;
    let food_id = create_category(&app, "Report Food", "expense").await;

    // A far-past month keeps the window isolated from other tests
    let entries = [
        (100.0, "1985-03-05", &salary_id, "income"),
        (200.0, "1985-03-20", &salary_id, "income"),
        (50.0, "1985-03-12", &food_id, "expense"),
        // Outside the month, must not be counted
        (999.0, "1985-04-01", &food_id, "expense"),
    ];
    for (amount, date, category_id, tx_type) in entries {
        let payload = json!({
            "amount": amount,
            "description": "report entry",
            "date": date,
            "categoryId": category_id,
            "type": tx_type,
            "accountId": account_id
        });
        let response = app.post("/api/v1/transactions", &payload).await;
        assert_eq!(response.status(), 201);
    }

    let response = app.get("/api/v1/transactions/report/1985/3").await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;

    assert_eq!(as_decimal(&body["income"]), "300".parse::<Decimal>().unwrap());
    assert_eq!(as_decimal(&body["expenses"]), "50".parse::<Decimal>().unwrap());

    let by_category = body["byCategory"].as_array().unwrap();
    let salary_total = by_category
        .iter()
        .find(|entry| entry["category"] == "Report Salary")
        .map(|entry| as_decimal(&entry["total"]))
        .unwrap();
    let food_total = by_category
        .iter()
        .find(|entry| entry["category"] == "Report Food")
        .map(|entry| as_decimal(&entry["total"]))
        .unwrap();
    assert_eq!(salary_total, "300".parse::<Decimal>().unwrap());
    assert_eq!(food_total, "50".parse::<Decimal>().unwrap());
}

#[actix_rt::test]
async fn test_monthly_report_rejects_invalid_month() {
    let app = TestApp::new().await;

    let response = app.get("/api/v1/transactions/report/2025/13").await;

    assert_eq!(response.status(), 400);
    let body = response.json().await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_sankey_links_sum_flows_per_category_and_account() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Sankey Acct", 0.0).await;
    let category_id = create_category(&app, "Sankey Cat", "expense").await;

    for (amount, day) in [(20.0, 10), (30.0, 15)] {
        let payload = json!({
            "amount": amount,
            "description": "flow entry",
            "date": format!("1983-05-{day}"),
            "categoryId": category_id,
            "type": "expense",
            "accountId": account_id
        });
        let response = app.post("/api/v1/transactions", &payload).await;
        assert_eq!(response.status(), 201);
    }

    let response = app
        .get("/api/v1/transactions/sankey?startDate=1983-05-01&endDate=1983-05-31")
        .await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;

    let link = body["links"]
        .as_array()
        .unwrap()
        .iter()
        .find(|link| link["source"] == category_id.as_str() && link["target"] == account_id.as_str())
        .expect("link for category/account pair missing");
    assert_eq!(as_decimal(&link["value"]), "50".parse::<Decimal>().unwrap());
    assert_eq!(link["type"], "expense");

    let nodes = body["nodes"].as_array().unwrap();
    assert!(nodes
        .iter()
        .any(|node| node["id"] == category_id.as_str() && node["type"] == "category"));
    assert!(nodes
        .iter()
        .any(|node| node["id"] == account_id.as_str() && node["type"] == "account"));
}

#[actix_rt::test]
async fn test_category_crud() {
    let app = TestApp::new().await;

    // Invalid color is rejected
    let payload = json!({
        "name": "Bad Color",
        "type": "expense",
        "color": "red"
    });
    let response = app.post("/api/v1/categories", &payload).await;
    assert_eq!(response.status(), 400);

    let category_id = create_category(&app, "CRUD Cat", "expense").await;

    let payload = json!({
        "name": "CRUD Cat Renamed",
        "type": "both",
        "color": "#2196F3",
        "budget": 250.00
    });
    let response = app
        .put(&format!("/api/v1/categories/{category_id}"), &payload)
        .await;
    assert_eq!(response.status(), 200);
    let body = response.json().await;
    assert_eq!(body["name"], "CRUD Cat Renamed");
    assert_eq!(body["type"], "both");
    assert_eq!(as_decimal(&body["budget"]), "250".parse::<Decimal>().unwrap());

    let response = app.delete(&format!("/api/v1/categories/{category_id}")).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/categories/{category_id}")).await;
    assert_eq!(response.status(), 404);
}

#[actix_rt::test]
async fn test_recurring_template_crud() {
    let app = TestApp::new().await;
    let account_id = create_account(&app, "Recurring Acct", 0.0).await;
    let category_id = create_category(&app, "Recurring Cat", "expense").await;

    // End date before start date is rejected
    let payload = json!({
        "amount": 1200.00,
        "description": "Rent",
        "categoryId": category_id,
        "accountId": account_id,
        "type": "expense",
        "frequency": "monthly",
        "startDate": "2025-01-01",
        "endDate": "2024-12-01"
    });
    let response = app.post("/api/v1/recurring", &payload).await;
    assert_eq!(response.status(), 400);

    let payload = json!({
        "amount": 1200.00,
        "description": "Rent",
        "categoryId": category_id,
        "accountId": account_id,
        "type": "expense",
        "frequency": "monthly",
        "startDate": "2025-01-01"
    });
    let response = app.post("/api/v1/recurring", &payload).await;
    assert_eq!(response.status(), 201);
    let body = response.json().await;
    let recurring_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["frequency"], "monthly");
    assert!(body["lastProcessed"].is_null());

    let response = app.get(&format!("/api/v1/recurring/{recurring_id}")).await;
    assert_eq!(response.status(), 200);

    let response = app.delete(&format!("/api/v1/recurring/{recurring_id}")).await;
    assert_eq!(response.status(), 200);

    let response = app.get(&format!("/api/v1/recurring/{recurring_id}")).await;
    assert_eq!(response.status(), 404);
}
