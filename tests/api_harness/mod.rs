//! HTTP-level test suite shared by every store backend.
//!
//! The `api_tests!` macro generates tests that drive the full router:
//! JSON → HTTP request → handler → store → HTTP response → JSON.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod api_harness;
//!
//! api_tests!(InMemoryStore::new());
//! ```
//!
//! `$store_factory` must produce an `impl CompanyStore + InvoiceStore + 'static`
//! with empty tables.

#![allow(dead_code)]

use axum_test::TestServer;
use biztime::prelude::*;
use serde_json::{Value, json};

/// The company every scenario starts from
pub fn test_company() -> Value {
    json!({ "code": "test", "name": "Test", "description": "Used for testing" })
}

/// A second company, only ever created by the tests themselves
pub fn second_company() -> Value {
    json!({ "code": "test2", "name": "Test2", "description": "Used for creating new company" })
}

/// Build a test server over the given store
pub fn server_for<S>(store: S) -> TestServer
where
    S: CompanyStore + InvoiceStore + 'static,
{
    let app = ServerBuilder::new()
        .with_store(store)
        .build()
        .expect("router should build");
    TestServer::try_new(app).expect("test server should start")
}

/// POST the test company and return the response body
pub async fn seed_company(server: &TestServer) -> Value {
    server.post("/companies").json(&test_company()).await.json()
}

/// POST an invoice for `comp_code` and return its id
pub async fn seed_invoice(server: &TestServer, comp_code: &str, amt: i64) -> i64 {
    let body: Value = server
        .post("/invoices")
        .json(&json!({ "comp_code": comp_code, "amt": amt }))
        .await
        .json();
    body["invoice"]["id"]
        .as_i64()
        .expect("created invoice should carry an id")
}

/// Generate the REST test suite for a store backend.
///
/// # Generated Tests
///
/// ## Companies
/// - list projection, ordering, detail with invoice ids, round-trip create,
///   duplicate conflict, malformed body, update, delete, 404s, delete
///   blocked by invoices
///
/// ## Invoices
/// - list projection, detail with nested company, create (201), unknown
///   company, amount formatting, amount-only update, delete, 404s
///
/// ## Misc
/// - health routes, unknown route envelope
#[macro_export]
macro_rules! api_tests {
    ($store_factory:expr) => {
        mod api_tests {
            use super::*;
            use crate::api_harness::{
                second_company, seed_company, seed_invoice, server_for, test_company,
            };
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use serde_json::{Value, json};

            async fn make_server() -> TestServer {
                server_for($store_factory)
            }

            // ==============================================================
            // Companies
            // ==============================================================

            #[tokio::test]
            async fn test_list_companies_projects_code_and_name() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server.get("/companies").await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                assert_eq!(body, json!({ "companies": [{ "code": "test", "name": "Test" }] }));
            }

            #[tokio::test]
            async fn test_list_companies_empty() {
                let server = make_server().await;

                let body: Value = server.get("/companies").await.json();
                assert_eq!(body, json!({ "companies": [] }));
            }

            #[tokio::test]
            async fn test_list_companies_ordered_by_name_and_stable() {
                let server = make_server().await;
                for (code, name) in [("ibm", "IBM"), ("apple", "Apple"), ("zeta", "Calm")] {
                    server
                        .post("/companies")
                        .json(&json!({ "code": code, "name": name, "description": "" }))
                        .await
                        .assert_status(StatusCode::CREATED);
                }

                let first: Value = server.get("/companies").await.json();
                let names: Vec<&str> = first["companies"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|c| c["name"].as_str().unwrap())
                    .collect();
                assert_eq!(names, vec!["Apple", "Calm", "IBM"]);

                let second: Value = server.get("/companies").await.json();
                assert_eq!(first, second);
            }

            #[tokio::test]
            async fn test_get_company_with_no_invoices() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server.get("/companies/test").await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                assert_eq!(
                    body,
                    json!({ "company": {
                        "code": "test",
                        "name": "Test",
                        "description": "Used for testing",
                        "invoices": []
                    }})
                );
            }

            #[tokio::test]
            async fn test_get_company_lists_invoice_ids_ascending() {
                let server = make_server().await;
                seed_company(&server).await;
                server.post("/companies").json(&second_company()).await;

                let first = seed_invoice(&server, "test", 100).await;
                let other = seed_invoice(&server, "test2", 50).await;
                let second = seed_invoice(&server, "test", 200).await;

                let body: Value = server.get("/companies/test").await.json();
                assert_eq!(body["company"]["invoices"], json!([first, second]));

                let body: Value = server.get("/companies/test2").await.json();
                assert_eq!(body["company"]["invoices"], json!([other]));
            }

            #[tokio::test]
            async fn test_get_company_not_found() {
                let server = make_server().await;

                let resp = server.get("/companies/disney").await;
                resp.assert_status(StatusCode::NOT_FOUND);

                let body: Value = resp.json();
                assert_eq!(body["error"]["status"], 404);
                assert_eq!(body["error"]["code"], "NOT_FOUND");
            }

            #[tokio::test]
            async fn test_get_company_code_is_case_sensitive() {
                let server = make_server().await;
                seed_company(&server).await;

                server
                    .get("/companies/TEST")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_create_company_round_trip() {
                let server = make_server().await;

                let resp = server.post("/companies").json(&second_company()).await;
                resp.assert_status(StatusCode::CREATED);
                let body: Value = resp.json();
                assert_eq!(body, json!({ "company": second_company() }));

                let body: Value = server.get("/companies/test2").await.json();
                let mut expected = second_company();
                expected["invoices"] = json!([]);
                assert_eq!(body, json!({ "company": expected }));
            }

            #[tokio::test]
            async fn test_create_duplicate_company_conflicts() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server.post("/companies").json(&test_company()).await;
                resp.assert_status(StatusCode::CONFLICT);

                let body: Value = resp.json();
                assert_eq!(body["error"]["code"], "CONFLICT");
            }

            #[tokio::test]
            async fn test_create_company_missing_field_is_bad_request() {
                let server = make_server().await;

                let resp = server
                    .post("/companies")
                    .json(&json!({ "code": "nameless" }))
                    .await;
                resp.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = resp.json();
                assert_eq!(body["error"]["code"], "INVALID_BODY");
            }

            #[tokio::test]
            async fn test_update_company_changes_name_and_description_only() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server
                    .put("/companies/test")
                    .json(&json!({ "name": "Test", "description": "New description test" }))
                    .await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                assert_eq!(
                    body,
                    json!({ "company": {
                        "code": "test",
                        "name": "Test",
                        "description": "New description test"
                    }})
                );

                let body: Value = server.get("/companies/test").await.json();
                assert_eq!(body["company"]["code"], "test");
                assert_eq!(body["company"]["description"], "New description test");
            }

            #[tokio::test]
            async fn test_update_company_ignores_code_in_body() {
                let server = make_server().await;
                seed_company(&server).await;

                let body: Value = server
                    .put("/companies/test")
                    .json(&json!({ "code": "renamed", "name": "Renamed", "description": "x" }))
                    .await
                    .json();
                assert_eq!(body["company"]["code"], "test");

                server
                    .get("/companies/renamed")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_update_company_not_found() {
                let server = make_server().await;

                server
                    .put("/companies/disney")
                    .json(&json!({ "name": "Disney", "description": "Mickey Mouse" }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_company() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server.delete("/companies/test").await;
                resp.assert_status(StatusCode::OK);
                let body: Value = resp.json();
                assert_eq!(body, json!({ "status": "deleted" }));

                server
                    .get("/companies/test")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_company_not_found() {
                let server = make_server().await;

                server
                    .delete("/companies/disney")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_company_with_invoices_conflicts() {
                let server = make_server().await;
                seed_company(&server).await;
                seed_invoice(&server, "test", 100).await;

                server
                    .delete("/companies/test")
                    .await
                    .assert_status(StatusCode::CONFLICT);

                server
                    .get("/companies/test")
                    .await
                    .assert_status(StatusCode::OK);
            }

            // ==============================================================
            // Invoices
            // ==============================================================

            #[tokio::test]
            async fn test_list_invoices_projects_id_and_comp_code() {
                let server = make_server().await;
                seed_company(&server).await;
                let id = seed_invoice(&server, "test", 100).await;

                let resp = server.get("/invoices").await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                assert_eq!(body, json!({ "invoices": [{ "id": id, "comp_code": "test" }] }));
            }

            #[tokio::test]
            async fn test_list_invoices_ordered_by_id() {
                let server = make_server().await;
                seed_company(&server).await;
                let ids = vec![
                    seed_invoice(&server, "test", 1).await,
                    seed_invoice(&server, "test", 2).await,
                    seed_invoice(&server, "test", 3).await,
                ];

                let body: Value = server.get("/invoices").await.json();
                let listed: Vec<i64> = body["invoices"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|inv| inv["id"].as_i64().unwrap())
                    .collect();
                assert_eq!(listed, ids);
            }

            #[tokio::test]
            async fn test_get_invoice_nests_company() {
                let server = make_server().await;
                seed_company(&server).await;
                let id = seed_invoice(&server, "test", 100).await;

                let resp = server.get(&format!("/invoices/{}", id)).await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                let invoice = &body["invoice"];
                assert_eq!(invoice["id"], id);
                assert_eq!(invoice["amt"], "100.00");
                assert_eq!(invoice["paid"], false);
                assert!(invoice["add_date"].is_string());
                assert_eq!(invoice["paid_date"], Value::Null);
                assert_eq!(invoice["company"], test_company());
                assert!(invoice.get("comp_code").is_none());
            }

            #[tokio::test]
            async fn test_get_invoice_not_found() {
                let server = make_server().await;

                server
                    .get("/invoices/0")
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_get_invoice_non_numeric_id_is_not_found() {
                let server = make_server().await;

                let resp = server.get("/invoices/abc").await;
                resp.assert_status(StatusCode::NOT_FOUND);

                let body: Value = resp.json();
                assert_eq!(body["error"]["code"], "NOT_FOUND");
            }

            #[tokio::test]
            async fn test_create_invoice() {
                let server = make_server().await;
                seed_company(&server).await;

                let resp = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "test", "amt": 234 }))
                    .await;
                resp.assert_status(StatusCode::CREATED);

                let body: Value = resp.json();
                let invoice = &body["invoice"];
                assert!(invoice["id"].is_number());
                assert_eq!(invoice["comp_code"], "test");
                assert_eq!(invoice["amt"], "234.00");
                assert_eq!(invoice["paid"], false);
                assert!(invoice["add_date"].is_string());
                assert_eq!(invoice["paid_date"], Value::Null);
            }

            #[tokio::test]
            async fn test_create_invoice_accepts_string_amount() {
                let server = make_server().await;
                seed_company(&server).await;

                let body: Value = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "test", "amt": "12.5" }))
                    .await
                    .json();
                assert_eq!(body["invoice"]["amt"], "12.50");
            }

            #[tokio::test]
            async fn test_create_invoice_for_unknown_company() {
                let server = make_server().await;

                let resp = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "nobody", "amt": 10 }))
                    .await;
                resp.assert_status(StatusCode::BAD_REQUEST);

                let body: Value = resp.json();
                assert_eq!(body["error"]["code"], "INVALID_REFERENCE");
            }

            #[tokio::test]
            async fn test_update_invoice_changes_amount_only() {
                let server = make_server().await;
                seed_company(&server).await;

                let created: Value = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "test", "amt": 100 }))
                    .await
                    .json();
                let before = &created["invoice"];
                let id = before["id"].as_i64().unwrap();

                let resp = server
                    .put(&format!("/invoices/{}", id))
                    .json(&json!({ "amt": 1337 }))
                    .await;
                resp.assert_status(StatusCode::OK);

                let body: Value = resp.json();
                let after = &body["invoice"];
                assert_eq!(after["amt"], "1337.00");
                for field in ["id", "comp_code", "paid", "add_date", "paid_date"] {
                    assert_eq!(after[field], before[field], "{} changed", field);
                }
            }

            #[tokio::test]
            async fn test_update_invoice_not_found() {
                let server = make_server().await;

                server
                    .put("/invoices/0")
                    .json(&json!({ "amt": 1337 }))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_invoice_then_get_is_not_found() {
                let server = make_server().await;
                seed_company(&server).await;
                let id = seed_invoice(&server, "test", 100).await;

                let resp = server.delete(&format!("/invoices/{}", id)).await;
                resp.assert_status(StatusCode::OK);
                let body: Value = resp.json();
                assert_eq!(body, json!({ "status": "deleted" }));

                server
                    .get(&format!("/invoices/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);
                server
                    .delete(&format!("/invoices/{}", id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                let body: Value = server.get("/companies/test").await.json();
                assert_eq!(body["company"]["invoices"], json!([]));
            }

            // ==============================================================
            // Misc
            // ==============================================================

            #[tokio::test]
            async fn test_health_routes() {
                let server = make_server().await;

                for path in ["/health", "/healthz"] {
                    let resp = server.get(path).await;
                    resp.assert_status(StatusCode::OK);
                    let body: Value = resp.json();
                    assert_eq!(body["status"], "ok");
                }
            }

            #[tokio::test]
            async fn test_unknown_route_uses_error_envelope() {
                let server = make_server().await;

                let resp = server.get("/nope").await;
                resp.assert_status(StatusCode::NOT_FOUND);

                let body: Value = resp.json();
                assert_eq!(body["error"]["status"], 404);
            }
        }
    };
}
