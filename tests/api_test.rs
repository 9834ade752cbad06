use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use duty_roster::api::build_router;
use duty_roster::app_state::AppState;
use duty_roster::config::Config;
use duty_roster::db::sqlite::SqliteStore;
use duty_roster::db::store::RecordStore;

struct TestApp {
    base: String,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open_in_memory().await.unwrap());
        let config = Config {
            database_url: "sqlite::memory:".into(),
            server_addr: "127.0.0.1:0".parse().unwrap(),
            log_dir: std::env::temp_dir(),
            seed_sample_data: false,
        };
        let app = build_router(AppState::new(store, config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            client: Client::new(),
        }
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(format!("{}{}", self.base, path)).send().await.unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .put(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await
            .unwrap();
        (res.status(), res.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.delete(format!("{}{}", self.base, path)).send().await.unwrap();
        (res.status(), res.json().await.unwrap())
    }

    /// Ann, Bob and Cid plus a "Cleaning" task.
    async fn with_cleaning_crew(self) -> Self {
        for name in ["Ann", "Bob", "Cid"] {
            let (status, _) = self.post("/employees", json!({ "name": name })).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, _) = self.post("/tasks", json!({ "description": "Cleaning" })).await;
        assert_eq!(status, StatusCode::CREATED);
        self
    }
}

fn weekly_cleaning() -> Value {
    json!({
        "task_id": 1,
        "employee_ids": [1, 2, 3],
        "start_date": "2024-01-01",
        "end_date": "2024-01-15",
        "recurrence": "weekly",
    })
}

fn row_names(report: &Value) -> Vec<String> {
    report["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["employee_name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = TestApp::spawn().await;
    let (status, body) = app.get("/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn employee_lifecycle() {
    let app = TestApp::spawn().await;

    let (status, body) = app.post("/employees", json!({ "name": "Ann" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"], json!({ "id": 1, "name": "Ann" }));

    let (status, body) = app.put("/employees/1", json!({ "name": "Anne" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Anne");

    let (status, body) = app.get("/employees").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.delete("/employees/1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/employees/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = TestApp::spawn().await;
    let (status, _) = app.post("/employees", json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.post("/tasks", json!({ "description": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assignment_keeps_slot_order() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;

    let (status, body) = app
        .post(
            "/assignments",
            json!({ "task_id": 1, "employee_ids": [3, 1, 3], "recurrence": "monthly" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["employee_ids"], json!([3, 1, 3]));
    assert_eq!(body["data"]["recurrence"], "monthly");

    let (status, _) = app
        .post("/assignments", json!({ "task_id": 1, "employee_ids": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weekly_rotation_report() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;

    let (status, body) = app.post("/reports", weekly_cleaning()).await;
    assert_eq!(status, StatusCode::OK);

    let report = &body["data"];
    assert_eq!(report["task_description"], "Cleaning");
    assert_eq!(row_names(report), ["Ann", "Bob", "Cid"]);
    assert_eq!(report["rows"][1]["date"], "2024-01-08");
}

#[tokio::test]
async fn shared_duty_report_lists_everyone() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let mut request = weekly_cleaning();
    request["rotation_enabled"] = json!(false);

    let (status, body) = app.post("/reports", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn missing_preconditions_are_reported() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;

    let mut no_task = weekly_cleaning();
    no_task["task_id"] = Value::Null;
    let (status, body) = app.post("/reports", no_task).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["missing"], "task");

    let mut no_dates = weekly_cleaning();
    no_dates["start_date"] = Value::Null;
    let (status, body) = app.post("/reports", no_dates).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["missing"], "date_range");
}

#[tokio::test]
async fn deleted_employee_shows_placeholder() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    app.delete("/employees/2").await;

    let (status, body) = app.post("/reports", weekly_cleaning()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_names(&body["data"]), ["Ann", "Employee not found", "Cid"]);
}

#[tokio::test]
async fn print_shows_cursor_employee_for_shared_duty() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let mut request = weekly_cleaning();
    request["rotation_enabled"] = json!(false);

    let res = app
        .client
        .post(format!("{}/reports/print?cursor=1", app.base))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();

    assert!(html.contains("<td>15/01/2024</td>"));
    assert_eq!(html.matches("<td>Bob</td>").count(), 3);
    assert!(!html.contains("<td>Ann</td>"));
}

#[tokio::test]
async fn sorting_rows_by_name() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let (_, body) = app.post("/reports", weekly_cleaning()).await;

    let (status, sorted) = app
        .post(
            "/reports/sort",
            json!({ "rows": body["data"]["rows"], "key": "employee_name", "direction": "desc" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sorted["data"]["sort"], json!({ "key": "employee_name", "direction": "desc" }));
    let names: Vec<_> = sorted["data"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["employee_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Cid", "Bob", "Ann"]);
}

#[tokio::test]
async fn clicking_the_active_column_flips_direction() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let (_, body) = app.post("/reports", weekly_cleaning()).await;

    let (status, sorted) = app
        .post(
            "/reports/sort",
            json!({
                "rows": body["data"]["rows"],
                "key": "date",
                "current": { "key": "date", "direction": "asc" }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sorted["data"]["sort"]["direction"], "desc");
    assert_eq!(sorted["data"]["rows"][0]["date"], "2024-01-15");
}

#[tokio::test]
async fn oversized_report_is_refused() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let mut request = weekly_cleaning();
    request["start_date"] = json!("0001-01-01");
    request["end_date"] = json!("9999-12-31");
    request["recurrence"] = json!("daily");

    let (status, body) = app.post("/reports", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["limit"], 100_000);
}

#[tokio::test]
async fn stored_assignment_report() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    app.post(
        "/assignments",
        json!({
            "task_id": 1,
            "employee_ids": [2, 3],
            "recurrence": "biweekly",
            "start_date": "2024-03-01",
            "end_date": "2024-03-31"
        }),
    )
    .await;

    let (status, body) = app.get("/assignments/1/report?rotation_enabled=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(row_names(&body["data"]), ["Bob", "Cid", "Bob"]);

    let (status, _) = app.get("/assignments/42/report").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rotation_editing_endpoints() {
    let app = TestApp::spawn().await;
    let order = json!([
        { "id": 1, "name": "Ann" },
        { "id": 2, "name": "Bob" },
        { "id": 3, "name": "Cid" }
    ]);

    let (status, body) = app
        .post(
            "/rotation-order/reorder",
            json!({ "order": order, "source": 2, "destination": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Cid");

    let (status, _) = app
        .post(
            "/rotation-order/reorder",
            json!({ "order": order, "source": 5, "destination": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/rotation-order/sync",
            json!({
                "order": order,
                "selected": [{ "id": 3, "name": "Cid" }, { "id": 4, "name": "Dee" }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([{ "id": 3, "name": "Cid" }, { "id": 4, "name": "Dee" }])
    );

    let (_, body) = app
        .post("/rotation-cursor/next", json!({ "cursor": 2, "employee_count": 3 }))
        .await;
    assert_eq!(body["data"]["cursor"], 0);

    let (status, body) = app
        .post(
            "/rotation-cursor/next",
            json!({ "cursor": u64::MAX, "employee_count": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["cursor"], 1);
}

#[tokio::test]
async fn export_then_import_round_trip() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;
    let (status, exported) = app.get("/data/export").await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = exported["data"].clone();
    assert_eq!(snapshot["employees"].as_array().unwrap().len(), 3);

    app.delete("/employees/1").await;

    let (status, body) = app.post("/data/import", snapshot.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "employees": 3, "tasks": 1, "assignments": 0 }));

    let (_, after) = app.get("/data/export").await;
    assert_eq!(after["data"], snapshot);
}

#[tokio::test]
async fn incomplete_import_changes_nothing() {
    let app = TestApp::spawn().await.with_cleaning_crew().await;

    let (status, body) = app
        .post("/data/import", json!({ "employees": [], "tasks": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = app.get("/employees").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}
