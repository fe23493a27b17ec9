//! Repository behavior against a mocked backend.

use rentdesk_data::{BackendConfig, DataError, Repositories, Upload};
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_partial_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Repositories) {
    let server = MockServer::start().await;
    let config = BackendConfig {
        url: server.uri(),
        api_key: "test-key".to_string(),
        max_strikes: 3,
        ..Default::default()
    };
    let repos = Repositories::connect(&config).unwrap();
    (server, repos)
}

fn request_bodies(requests: &[wiremock::Request], method_name: &str, url_path: &str) -> Vec<Value> {
    requests
        .iter()
        .filter(|r| r.method.as_str() == method_name && r.url.path() == url_path)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_client_list_hides_deleted_and_struck_out() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param("deleted_at", "is.null"))
        .and(query_param("strikes", "lte.3"))
        .and(header("apikey", "test-key"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1,
                "name": "Ana",
                "last_name": "Ruiz",
                "phone": "555-0101",
                "isForeign": false,
                "client_type": [{"type_name": "Persona"}]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let clients = repos.clients.list().await.unwrap();

    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Ana");
    assert_eq!(clients[0].foreign_label(), "No");
    assert_eq!(clients[0].client_type.as_deref(), Some("Persona"));
}

#[tokio::test]
async fn test_local_clients_exclude_foreign() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param("isForeign", "is.false"))
        .and(query_param("deleted_at", "is.null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(repos.clients.list_local().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soft_delete_sets_deleted_at() {
    let (server, repos) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/clients"))
        .and(query_param("id", "eq.5"))
        .and(query_param("strikes", "lte.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5}])))
        .expect(1)
        .mount(&server)
        .await;

    repos.clients.soft_delete(5).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let bodies = request_bodies(&requests, "PATCH", "/rest/v1/clients");
    let stamp = bodies[0]["deleted_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[tokio::test]
async fn test_soft_delete_of_hidden_client_is_not_found() {
    let (server, repos) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = repos.clients.soft_delete(9).await.unwrap_err();
    assert!(matches!(err, DataError::NotFound { table: "clients", .. }));
}

#[tokio::test]
async fn test_client_detail_carries_type_id() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clients"))
        .and(query_param("select", "*,client_type(id,type_name)"))
        .and(query_param("id", "eq.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 4,
            "name": "Luis",
            "last_name": "Mora",
            "isForeign": false,
            "strikes": 0,
            "client_type": {"id": 2, "type_name": "Empresa"}
        }])))
        .mount(&server)
        .await;

    let client = repos.clients.get_by_id(4).await.unwrap();
    assert_eq!(client.client_type_id(), Some(2));
}

#[tokio::test]
async fn test_client_update_reads_back_embedded_type() {
    let (server, repos) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/clients"))
        .and(query_param("select", "*,client_type(id,type_name)"))
        .and(query_param("id", "eq.4"))
        .and(body_partial_json(json!({"client_type": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 4,
            "name": "Luis",
            "last_name": "Mora",
            "client_type": {"id": 2, "type_name": "Empresa"}
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let updated = repos
        .clients
        .update(4, &json!({"client_type": 2}))
        .await
        .unwrap();
    assert_eq!(updated.full_name(), "Luis Mora");
    assert_eq!(updated.client_type_id(), Some(2));
}

#[tokio::test]
async fn test_get_missing_row_is_not_found() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/equipment"))
        .and(query_param("id", "eq.77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = repos.equipment.get_by_id(77).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_backend_error_becomes_status() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/equipment_type"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let err = repos.equipment.types().await.unwrap_err();
    assert!(matches!(err, DataError::Status { status: 500, ref message } if message == "boom"));
}

#[tokio::test]
async fn test_equipment_lookups_become_select_options() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/equipment_status"))
        .and(query_param("order", "id.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "status_name": "Disponible"},
            {"id": 2, "status_name": "Alquilado"}
        ])))
        .mount(&server)
        .await;

    let statuses = repos.equipment.statuses().await.unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[1].value, "2");
    assert_eq!(statuses[1].label, "Alquilado");
}

#[tokio::test]
async fn test_rental_detail_resolves_renter() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/rentals"))
        .and(query_param("id", "eq.3"))
        .and(query_param("deleted_at", "is.null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "clients": {"id": 8, "name": "Ana", "last_name": "Ruiz"},
            "user_id": "u1",
            "end_date": "2026-11-30T00:00:00+00:00",
            "equipment": [
                {"type": {"type_name": "Drill"}, "reference": "Bosch"},
                {"type": {"type_name": "Ladder"}, "reference": "3m"}
            ]
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "luis@example.com",
            "user_metadata": {"name": "Luis", "lastname": "Mora"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detail = repos.rentals.get_by_id(3).await.unwrap();

    assert_eq!(detail.client, "Ana Ruiz");
    assert_eq!(detail.client_id, Some(8));
    assert_eq!(detail.renter, "Luis Mora");
    assert_eq!(detail.end_date, "2026-11-30");
    assert_eq!(detail.items, vec!["Drill: Bosch", "Ladder: 3m"]);
}

#[tokio::test]
async fn test_rental_detail_fails_when_renter_lookup_fails() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/rentals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "user_id": "gone",
            "equipment": []
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"msg": "User not found"})))
        .mount(&server)
        .await;

    let err = repos.rentals.get_by_id(3).await.unwrap_err();
    assert!(matches!(err, DataError::Status { status: 404, ref message } if message == "User not found"));
}

#[tokio::test]
async fn test_rental_update_reactivates_running_rentals() {
    let (server, repos) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/rentals"))
        .and(query_param("id", "eq.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/rentals"))
        .and(query_param("deleted_at", "is.null"))
        .and(body_partial_json(json!({"status": "ACTIVO"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}, {"id": 4}])))
        .expect(1)
        .mount(&server)
        .await;

    let rental = repos
        .rentals
        .update(3, &json!({"end_date": "2026-12-31"}))
        .await
        .unwrap();
    assert_eq!(rental.id, 3);

    let requests = server.received_requests().await.unwrap();
    let second = requests.last().unwrap();
    let end_filter = second
        .url
        .query_pairs()
        .find(|(k, _)| k == "end_date")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(end_filter.starts_with("gt."));
}

#[tokio::test]
async fn test_rental_history_lists_deleted_rows() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/all_rentals"))
        .and(query_param("deleted_at", "not.is.null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "cliente": "Ana Ruiz", "deleted_at": "2026-01-02T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let history = repos.rentals.history().await.unwrap();
    assert_eq!(history[0].id, 1);
    assert_eq!(history[0].columns["cliente"], "Ana Ruiz");
}

#[tokio::test]
async fn test_contract_create_uploads_before_insert() {
    let (server, repos) = setup().await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/attachments/[0-9a-f-]{36}/contract\.pdf$"))
        .and(header("content-type", "application/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/contracts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            {"id": "c1", "rental_id": 3, "files": ["c1/contract.pdf"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut row = Map::new();
    row.insert("rental_id".to_string(), json!(3));
    let upload = Upload::new("contract.pdf", b"%PDF-1.7".to_vec(), "application/pdf");

    repos.contracts.create(row, vec![upload]).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let upload_path = requests[0].url.path().to_string();
    let inserted = &request_bodies(&requests, "POST", "/rest/v1/contracts")[0];
    let id = inserted["id"].as_str().unwrap();

    assert!(uuid::Uuid::parse_str(id).is_ok());
    assert_eq!(upload_path, format!("/storage/v1/object/attachments/{id}/contract.pdf"));
    assert_eq!(inserted["files"], json!([format!("{id}/contract.pdf")]));
    assert_eq!(inserted["rental_id"], 3);
}

#[tokio::test]
async fn test_bill_update_keeps_existing_files() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/bills"))
        .and(query_param("select", "files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"files": ["b1/old.pdf"]}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/storage/v1/object/attachments/b1/new.png"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/bills"))
        .and(query_param("id", "eq.b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b1", "files": ["b1/old.pdf", "b1/new.png"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let bill = repos
        .bills
        .update("b1", Map::new(), vec![Upload::new("new.png", vec![1, 2], "image/png")])
        .await
        .unwrap();
    assert_eq!(bill.files.len(), 2);

    let requests = server.received_requests().await.unwrap();
    let patch = &request_bodies(&requests, "PATCH", "/rest/v1/bills")[0];
    assert_eq!(patch["files"], json!(["b1/old.pdf", "b1/new.png"]));
}

#[tokio::test]
async fn test_attachment_listing_and_removal() {
    let (server, repos) = setup().await;

    Mock::given(method("POST"))
        .and(path("/storage/v1/object/list/attachments"))
        .and(body_partial_json(json!({"prefix": "c1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "contract.pdf", "id": "obj-1"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/storage/v1/object/attachments"))
        .and(body_partial_json(json!({"prefixes": ["c1/contract.pdf"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/v1/object/attachments/c1/contract.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
        .mount(&server)
        .await;

    let files = repos.contracts.list_files("c1").await.unwrap();
    assert_eq!(files[0].name, "contract.pdf");

    let bytes = repos.contracts.download_file("c1", "contract.pdf").await.unwrap();
    assert_eq!(bytes, b"%PDF");

    repos.contracts.remove_file("c1", "contract.pdf").await.unwrap();
}

#[tokio::test]
async fn test_users_and_audit_log() {
    let (server, repos) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": "u1", "email": "a@example.com"}, {"id": "u2"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/audit_log"))
        .and(query_param("order", "created_at.desc"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "action": "UPDATE", "table_name": "rentals", "old_record": {"id": 3}}
        ])))
        .mount(&server)
        .await;

    let users = repos.users.list().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email.as_deref(), Some("a@example.com"));

    let entries = repos.audit_log.recent(5).await.unwrap();
    assert_eq!(entries[0].action.as_deref(), Some("UPDATE"));
    assert_eq!(entries[0].details["old_record"], json!({"id": 3}));
}
