#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        setup_test_app, setup_test_app_with_services, FAKE_AUTH_USER, TEST_PASSWORD, TEST_USER_1,
        TEST_USER_2,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;

    async fn test_server() -> TestServer {
        TestServer::new(setup_test_app().await).unwrap()
    }

    fn dec(value: &Value) -> Decimal {
        match value {
            Value::String(s) => Decimal::from_str(s).unwrap(),
            Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap(),
            other => panic!("not a decimal: {}", other),
        }
    }

    /// POSTs `body` and returns the created resource, failing on anything but 201.
    async fn create(server: &TestServer, path: &str, body: Value) -> Value {
        let response = server.post(path).json(&body).await;
        if response.status_code() != StatusCode::CREATED {
            panic!(
                "Expected 201 Created from {}, got {}: {}",
                path,
                response.status_code(),
                response.text()
            );
        }
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        body.data
    }

    fn accounts_path(user: &str) -> String {
        format!("/api/v1/users/{}/accounts", user)
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let health: HealthResponse = response.json();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.database, "connected");
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let server = test_server().await;

        let created = create(
            &server,
            "/api/v1/users",
            json!({ "id": "user-3", "email": "three@example.com", "displayName": "Three" }),
        )
        .await;
        assert_eq!(created["id"], "user-3");
        assert_eq!(created["displayName"], "Three");

        let response = server.get("/api/v1/users/user-3").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["email"], "three@example.com");

        let response = server.get("/api/v1/users").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 3);
    }

    #[tokio::test]
    async fn test_create_duplicate_user_conflicts() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "id": TEST_USER_1, "email": "again@example.com" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let error: ErrorResponse = response.json();
        assert!(!error.success);
        assert_eq!(error.code, "CONSTRAINT_VIOLATION");
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "id": "user-3", "email": "not-an-email" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_user_clears_display_name() {
        let server = test_server().await;

        let response = server
            .put("/api/v1/users/user-1")
            .json(&json!({ "displayName": "First" }))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .put("/api/v1/users/user-1")
            .json(&json!({ "displayName": null }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert!(body.data["displayName"].is_null());
        assert_eq!(body.data["email"], "one@example.com");
    }

    #[tokio::test]
    async fn test_delete_user_removes_owned_rows() {
        let server = test_server().await;
        create(
            &server,
            &accounts_path(TEST_USER_1),
            json!({ "name": "Checking", "type": "checking" }),
        )
        .await;

        server.delete("/api/v1/users/user-1").await.assert_status(StatusCode::OK);

        server.get("/api/v1/users/user-1").await.assert_status(StatusCode::NOT_FOUND);
        server
            .get(&accounts_path(TEST_USER_1))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server.delete("/api/v1/users/user-1").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preferences_default_then_update() {
        let server = test_server().await;

        let response = server.get("/api/v1/users/user-1/preferences").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["showOnboarding"], true);
        assert_eq!(body.data["debtStrategy"], "avalanche");

        let response = server
            .put("/api/v1/users/user-1/preferences")
            .json(&json!({ "debtStrategy": "snowball", "extraDebtPayment": "150.00" }))
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Value> = server.get("/api/v1/users/user-1/preferences").await.json();
        assert_eq!(body.data["debtStrategy"], "snowball");
        assert_eq!(dec(&body.data["extraDebtPayment"]), Decimal::new(150, 0));
        assert_eq!(body.data["showOnboarding"], true);
    }

    #[tokio::test]
    async fn test_preferences_of_unknown_user_not_found() {
        let server = test_server().await;

        let response = server.get("/api/v1/users/nobody/preferences").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_accounts_list_primary_first() {
        let server = test_server().await;
        let path = accounts_path(TEST_USER_1);

        create(&server, &path, json!({ "name": "Savings", "type": "savings", "balance": "900.00" })).await;
        create(&server, &path, json!({ "name": "Visa", "type": "credit card" })).await;
        create(
            &server,
            &path,
            json!({ "name": "Main", "type": "checking", "isPrimary": true }),
        )
        .await;

        let body: ApiResponse<Vec<Value>> = server.get(&path).await.json();
        let names: Vec<&str> = body.data.iter().map(|a| a["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Main", "Savings", "Visa"]);
        assert_eq!(body.data[2]["type"], "credit card");
    }

    #[tokio::test]
    async fn test_new_primary_account_clears_previous() {
        let server = test_server().await;
        let path = accounts_path(TEST_USER_1);

        let first = create(&server, &path, json!({ "name": "Old", "type": "checking", "isPrimary": true })).await;
        let second = create(&server, &path, json!({ "name": "New", "type": "checking" })).await;

        let response = server
            .put(&format!("{}/{}", path, second["id"]))
            .json(&json!({ "isPrimary": true }))
            .await;
        response.assert_status(StatusCode::OK);

        let old: ApiResponse<Value> = server.get(&format!("{}/{}", path, first["id"])).await.json();
        assert_eq!(old.data["isPrimary"], false);

        let body: ApiResponse<Vec<Value>> = server.get(&path).await.json();
        let primaries = body.data.iter().filter(|a| a["isPrimary"] == true).count();
        assert_eq!(primaries, 1);
        assert_eq!(body.data[0]["name"], "New");
    }

    #[tokio::test]
    async fn test_partial_account_update_keeps_other_fields() {
        let server = test_server().await;
        let path = accounts_path(TEST_USER_1);
        let account = create(
            &server,
            &path,
            json!({
                "name": "Joint",
                "type": "savings",
                "balance": "100.00",
                "isPrimary": true,
                "institution": "Credit Union"
            }),
        )
        .await;

        let response = server
            .put(&format!("{}/{}", path, account["id"]))
            .json(&json!({ "balance": "2500.75" }))
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(dec(&body.data["balance"]), Decimal::new(250_075, 2));
        assert_eq!(body.data["name"], "Joint");
        assert_eq!(body.data["type"], "savings");
        assert_eq!(body.data["isPrimary"], true);
        assert_eq!(body.data["institution"], "Credit Union");
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_their_owner() {
        let server = test_server().await;
        let account = create(
            &server,
            &accounts_path(TEST_USER_1),
            json!({ "name": "Private", "type": "checking" }),
        )
        .await;
        let foreign = format!("{}/{}", accounts_path(TEST_USER_2), account["id"]);

        let response = server.get(&foreign).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "ACCOUNT_NOT_FOUND");

        server
            .put(&foreign)
            .json(&json!({ "name": "Stolen" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server.delete(&foreign).await.assert_status(StatusCode::NOT_FOUND);

        let body: ApiResponse<Vec<Value>> = server.get(&accounts_path(TEST_USER_2)).await.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_account_name_validation() {
        let server = test_server().await;

        let response = server
            .post(&accounts_path(TEST_USER_1))
            .json(&json!({ "name": "", "type": "checking" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_conflicts() {
        let server = test_server().await;
        let path = "/api/v1/users/user-1/categories";

        create(&server, path, json!({ "name": "Food", "kind": "expense" })).await;
        let response = server
            .post(path)
            .json(&json!({ "name": "Food", "kind": "expense" }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        // Names are unique per user only
        create(&server, "/api/v1/users/user-2/categories", json!({ "name": "Food", "kind": "expense" })).await;
    }

    #[tokio::test]
    async fn test_deleting_category_detaches_transactions() {
        let server = test_server().await;
        let category = create(
            &server,
            "/api/v1/users/user-1/categories",
            json!({ "name": "Dining", "kind": "expense", "color": "#ff8800" }),
        )
        .await;
        let transaction = create(
            &server,
            "/api/v1/users/user-1/transactions",
            json!({
                "categoryId": category["id"],
                "description": "Pizza",
                "amount": "-24.50",
                "date": "2024-05-03"
            }),
        )
        .await;

        server
            .delete(&format!("/api/v1/users/user-1/categories/{}", category["id"]))
            .await
            .assert_status(StatusCode::OK);

        let body: ApiResponse<Value> = server
            .get(&format!("/api/v1/users/user-1/transactions/{}", transaction["id"]))
            .await
            .json();
        assert!(body.data["categoryId"].is_null());
        assert_eq!(body.data["description"], "Pizza");
    }

    #[tokio::test]
    async fn test_budget_category_rejects_foreign_category() {
        let server = test_server().await;
        let category = create(
            &server,
            "/api/v1/users/user-2/categories",
            json!({ "name": "Fuel", "kind": "expense" }),
        )
        .await;

        let response = server
            .post("/api/v1/users/user-1/budget-categories")
            .json(&json!({ "name": "Fuel", "budgetedAmount": "120.00", "categoryId": category["id"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_variable_expense_lifecycle() {
        let server = test_server().await;
        let budget = create(
            &server,
            "/api/v1/users/user-1/budget-categories",
            json!({ "name": "Groceries", "budgetedAmount": "600.00" }),
        )
        .await;
        let path = "/api/v1/users/user-1/variable-expenses";

        let expense = create(
            &server,
            path,
            json!({
                "budgetCategoryId": budget["id"],
                "name": "Market",
                "amount": "82.40",
                "date": "2024-03-09",
                "notes": "weekly shop"
            }),
        )
        .await;
        let item = format!("{}/{}", path, expense["id"]);

        let response = server.put(&item).json(&json!({ "notes": null, "amount": "90.00" })).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert!(body.data["notes"].is_null());
        assert_eq!(dec(&body.data["amount"]), Decimal::new(90, 0));
        assert_eq!(body.data["budgetCategoryId"], budget["id"]);

        server.delete(&item).await.assert_status(StatusCode::OK);
        server.get(&item).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recurring_end_before_start_rejected() {
        let server = test_server().await;
        let path = "/api/v1/users/user-1/recurring-transactions";

        let response = server
            .post(path)
            .json(&json!({
                "name": "Gym",
                "kind": "expense",
                "amount": "40.00",
                "frequency": "monthly",
                "startDate": "2024-06-01",
                "endDate": "2024-01-01"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let recurring = create(
            &server,
            path,
            json!({
                "name": "Gym",
                "kind": "expense",
                "amount": "40.00",
                "frequency": "monthly",
                "startDate": "2024-06-01"
            }),
        )
        .await;
        let response = server
            .put(&format!("{}/{}", path, recurring["id"]))
            .json(&json!({ "endDate": "2024-05-31" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transactions_newest_first() {
        let server = test_server().await;
        let account = create(
            &server,
            &accounts_path(TEST_USER_1),
            json!({ "name": "Main", "type": "checking" }),
        )
        .await;
        let path = "/api/v1/users/user-1/transactions";

        for (description, date) in [("Rent", "2024-01-01"), ("Coffee", "2024-03-15"), ("Books", "2024-02-10")] {
            create(
                &server,
                path,
                json!({
                    "accountId": account["id"],
                    "description": description,
                    "amount": "-10.00",
                    "date": date
                }),
            )
            .await;
        }

        let body: ApiResponse<Vec<Value>> = server.get(path).await.json();
        let descriptions: Vec<&str> = body.data.iter().map(|t| t["description"].as_str().unwrap()).collect();
        assert_eq!(descriptions, vec!["Coffee", "Books", "Rent"]);
    }

    #[tokio::test]
    async fn test_transaction_with_foreign_account_rejected() {
        let server = test_server().await;
        let account = create(
            &server,
            &accounts_path(TEST_USER_2),
            json!({ "name": "Other", "type": "checking" }),
        )
        .await;

        let response = server
            .post("/api/v1/users/user-1/transactions")
            .json(&json!({
                "accountId": account["id"],
                "description": "Sneaky",
                "amount": "5.00",
                "date": "2024-01-01"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_debt_validation() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users/user-1/debts")
            .json(&json!({
                "name": "Card",
                "type": "credit-card",
                "balance": "1000.00",
                "apr": "19.99",
                "minimumPayment": "35.00",
                "paymentDay": 40
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/users/user-1/debts")
            .json(&json!({
                "name": "Card",
                "type": "credit-card",
                "balance": "-5.00",
                "apr": "19.99",
                "minimumPayment": "35.00",
                "paymentDay": 15
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_counts_debt_minimums_every_month() {
        let server = test_server().await;
        create(
            &server,
            "/api/v1/users/user-1/debts",
            json!({
                "name": "Car",
                "type": "auto-loan",
                "balance": "12000.00",
                "apr": "5.49",
                "minimumPayment": "350.00",
                "paymentDay": 31
            }),
        )
        .await;
        create(
            &server,
            "/api/v1/users/user-1/recurring-transactions",
            json!({
                "name": "Salary",
                "kind": "income",
                "amount": "5000.00",
                "frequency": "monthly",
                "startDate": "2023-01-28"
            }),
        )
        .await;

        let response = server.get("/api/v1/users/user-1/forecast?year=2024").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        let months = body.data["months"].as_array().unwrap();
        assert_eq!(months.len(), 12);
        assert_eq!(months[1]["end"], "2024-02-29");
        assert!(months.iter().all(|m| dec(&m["debtPayments"]) == Decimal::new(350, 0)));
        assert_eq!(dec(&body.data["totals"]["debtPayments"]), Decimal::new(4_200, 0));
        assert_eq!(dec(&body.data["totals"]["income"]), Decimal::new(60_000, 0));
        assert_eq!(dec(&body.data["totals"]["net"]), Decimal::new(55_800, 0));
    }

    #[tokio::test]
    async fn test_forecast_cache_invalidated_by_writes() {
        let server = test_server().await;
        let path = "/api/v1/users/user-1/forecast?year=2025";

        let first: ApiResponse<Value> = server.get(path).await.json();
        assert_eq!(first.message, "Forecast computed successfully");
        assert!(dec(&first.data["totals"]["net"]).is_zero());

        let second: ApiResponse<Value> = server.get(path).await.json();
        assert_eq!(second.message, "Forecast retrieved from cache");

        create(
            &server,
            "/api/v1/users/user-1/budget-categories",
            json!({ "name": "Groceries", "budgetedAmount": "600.00" }),
        )
        .await;

        let third: ApiResponse<Value> = server.get(path).await.json();
        assert_eq!(third.message, "Forecast computed successfully");
        assert_eq!(dec(&third.data["totals"]["variableBudget"]), Decimal::new(7_200, 0));
    }

    #[tokio::test]
    async fn test_forecast_rejects_out_of_range_year() {
        let server = test_server().await;

        let response = server.get("/api/v1/users/user-1/forecast?year=12").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_debt_plan_snowball() {
        let server = test_server().await;
        let small = create(
            &server,
            "/api/v1/users/user-1/debts",
            json!({
                "name": "Store card",
                "type": "credit-card",
                "balance": "500.00",
                "apr": "0",
                "minimumPayment": "50.00",
                "paymentDay": 5
            }),
        )
        .await;
        create(
            &server,
            "/api/v1/users/user-1/debts",
            json!({
                "name": "Family loan",
                "type": "personal-loan",
                "balance": "1000.00",
                "apr": "0",
                "minimumPayment": "100.00",
                "paymentDay": 20
            }),
        )
        .await;

        let response = server
            .get("/api/v1/users/user-1/debt-plan?strategy=snowball&extraPayment=100&start=2025-01-15")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        let plan = &body.data;
        assert_eq!(plan["strategy"], "snowball");
        assert_eq!(plan["monthsToDebtFree"], 6);
        assert_eq!(plan["debtFreeDate"], "2025-06-30");
        assert_eq!(dec(&plan["totalBalance"]), Decimal::new(1_500, 0));
        assert_eq!(dec(&plan["totalMinimumPayment"]), Decimal::new(150, 0));
        assert!(dec(&plan["totalInterest"]).is_zero());
        assert_eq!(plan["debts"][0]["debtId"], small["id"]);
        assert_eq!(plan["debts"][0]["payoffMonth"], 4);
    }

    #[tokio::test]
    async fn test_debt_plan_uses_stored_preferences() {
        let server = test_server().await;
        server
            .put("/api/v1/users/user-1/preferences")
            .json(&json!({ "debtStrategy": "snowball", "extraDebtPayment": "25.00" }))
            .await
            .assert_status(StatusCode::OK);

        let response = server.get("/api/v1/users/user-1/debt-plan?start=2025-01-01").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["strategy"], "snowball");
        assert_eq!(dec(&body.data["extraPayment"]), Decimal::new(25, 0));
        assert_eq!(body.data["monthsToDebtFree"], 0);
    }

    #[tokio::test]
    async fn test_debt_plan_never_paid_off() {
        let server = test_server().await;
        create(
            &server,
            "/api/v1/users/user-1/debts",
            json!({
                "name": "Payday",
                "type": "other",
                "balance": "10000.00",
                "apr": "24.00",
                "minimumPayment": "100.00",
                "paymentDay": 1
            }),
        )
        .await;

        let response = server.get("/api/v1/users/user-1/debt-plan?start=2025-01-01").await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "PAYOFF_NOT_REACHED");
    }

    #[tokio::test]
    async fn test_metrics_not_mounted_in_tests() {
        let server = test_server().await;

        server.get("/metrics").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unconfigured_services_unavailable() {
        let server = test_server().await;

        let response = server.get("/api/v1/auth/me").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "AUTH_NOT_CONFIGURED");

        let response = server
            .post("/api/v1/ai/categorize-transaction")
            .json(&json!({ "description": "Coffee" }))
            .await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "AI_NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_login_onboarding_logout() {
        let (app, _state) = setup_test_app_with_services(json!({})).await;
        let server = TestServer::new(app).unwrap();

        server.get("/api/v1/auth/me").await.assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "email": "person@example.com", "password": "wrong" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: ApiResponse<Value> = response.json();
        assert!(!body.success);
        assert_eq!(body.data["success"], false);
        assert!(body.data["error"].is_string());

        let response = server
            .post("/api/v1/auth/login")
            .json(&json!({ "email": "person@example.com", "password": TEST_PASSWORD }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["redirect"], "/dashboard");

        let me: ApiResponse<Value> = server.get("/api/v1/auth/me").await.json();
        assert_eq!(me.data["id"], FAKE_AUTH_USER);
        assert_eq!(me.data["displayName"], "Test Person");
        assert_eq!(me.data["showOnboarding"], true);

        let response = server.post("/api/v1/auth/onboarding/complete").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["showOnboarding"], false);
        assert!(body.data["notice"].is_null());

        let prefs: ApiResponse<Value> = server
            .get(&format!("/api/v1/users/{}/preferences", FAKE_AUTH_USER))
            .await
            .json();
        assert_eq!(prefs.data["showOnboarding"], false);

        let body: ApiResponse<Value> = server.post("/api/v1/auth/logout").await.json();
        assert_eq!(body.data["redirect"], "/login");
        server.get("/api/v1/auth/me").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_categorize_transaction_suggestion() {
        let (app, _state) =
            setup_test_app_with_services(json!({ "category": "Groceries", "confidence": 0.92 })).await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/ai/categorize-transaction")
            .json(&json!({ "description": "WHOLE FOODS #123" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["category"], "Groceries");

        let response = server
            .post("/api/v1/ai/categorize-transaction")
            .json(&json!({ "description": "" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggestion_out_of_schema_is_bad_gateway() {
        let (app, _state) =
            setup_test_app_with_services(json!({ "category": "Groceries", "confidence": 0.92 })).await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/ai/suggest-expense-categories")
            .json(&json!({ "description": "Weekend trip to the coast" }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "AI_UPSTREAM_ERROR");
    }

    /// Request body of a named row for each name-ordered resource.
    fn named_body(resource: &str, name: &str) -> Value {
        match resource {
            "categories" => json!({ "name": name, "kind": "expense" }),
            "budget-categories" => json!({ "name": name, "budgetedAmount": "100.00" }),
            "variable-expenses" => json!({ "name": name, "amount": "12.00", "date": "2024-04-01" }),
            "debts" => json!({
                "name": name,
                "type": "other",
                "balance": "500.00",
                "apr": "5.00",
                "minimumPayment": "25.00",
                "paymentDay": 10
            }),
            "recurring-transactions" => json!({
                "name": name,
                "kind": "expense",
                "amount": "30.00",
                "frequency": "monthly",
                "startDate": "2024-01-01"
            }),
            other => panic!("unknown resource {}", other),
        }
    }

    #[tokio::test]
    async fn test_named_lists_ordered_by_name_then_id() {
        let server = test_server().await;

        for resource in [
            "categories",
            "budget-categories",
            "variable-expenses",
            "debts",
            "recurring-transactions",
        ] {
            let path = format!("/api/v1/users/{}/{}", TEST_USER_1, resource);
            // Category names are unique per user
            let names: &[&str] = if resource == "categories" {
                &["Charlie", "Alpha", "Bravo"]
            } else {
                &["Charlie", "Alpha", "Bravo", "Alpha"]
            };
            for name in names {
                create(&server, &path, named_body(resource, name)).await;
            }

            let body: ApiResponse<Vec<Value>> = server.get(&path).await.json();
            let listed: Vec<&str> = body.data.iter().map(|r| r["name"].as_str().unwrap()).collect();
            let mut expected = names.to_vec();
            expected.sort();
            assert_eq!(listed, expected, "{} order", resource);

            let ids: Vec<i64> = body
                .data
                .iter()
                .filter(|r| r["name"] == "Alpha")
                .map(|r| r["id"].as_i64().unwrap())
                .collect();
            assert!(ids.windows(2).all(|w| w[0] < w[1]), "{} ties by id", resource);
        }
    }

    #[tokio::test]
    async fn test_named_resources_scoped_to_their_owner() {
        let server = test_server().await;

        for resource in [
            "categories",
            "budget-categories",
            "variable-expenses",
            "debts",
            "recurring-transactions",
        ] {
            let own = format!("/api/v1/users/{}/{}", TEST_USER_1, resource);
            let other = format!("/api/v1/users/{}/{}", TEST_USER_2, resource);
            let row = create(&server, &own, named_body(resource, "Mine")).await;
            let foreign = format!("{}/{}", other, row["id"]);

            server.get(&foreign).await.assert_status(StatusCode::NOT_FOUND);
            server
                .put(&foreign)
                .json(&json!({ "name": "Taken" }))
                .await
                .assert_status(StatusCode::NOT_FOUND);
            server.delete(&foreign).await.assert_status(StatusCode::NOT_FOUND);

            let body: ApiResponse<Vec<Value>> = server.get(&other).await.json();
            assert!(body.data.is_empty(), "{} leaked to another user", resource);

            let body: ApiResponse<Value> = server.get(&format!("{}/{}", own, row["id"])).await.json();
            assert_eq!(body.data["name"], "Mine", "{} changed by another user", resource);
        }
    }

    #[tokio::test]
    async fn test_debt_plan_with_runaway_balance_is_unprocessable() {
        let server = test_server().await;
        create(
            &server,
            "/api/v1/users/user-1/debts",
            json!({
                "name": "Runaway",
                "type": "other",
                "balance": "1000000000",
                "apr": "100",
                "minimumPayment": "0",
                "paymentDay": 1
            }),
        )
        .await;

        let response = server.get("/api/v1/users/user-1/debt-plan?start=2025-01-01").await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let error: ErrorResponse = response.json();
        assert_eq!(error.code, "PAYOFF_NOT_REACHED");
    }
}
