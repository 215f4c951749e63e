//! Integration tests against a live single-node cluster.
//!
//! Run with a reachable ScyllaDB/Cassandra node:
//!
//! ```text
//! RINGFRONT_TEST_URI=127.0.0.1:9042 cargo test --features integration
//! ```
//!
//! Each run bootstraps a throwaway keyspace and drops it at the end.

#![cfg(feature = "integration")]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use ringfront::api::HttpServer;
use ringfront::config::{ApiConfig, StoreConfig};
use ringfront::store::{ensure_schema, ClusterConnection, ClusterNode, UserRepository};

struct TestCluster {
    conn: ClusterConnection,
    store: StoreConfig,
}

impl TestCluster {
    async fn setup() -> Self {
        let uri = std::env::var("RINGFRONT_TEST_URI")
            .unwrap_or_else(|_| "127.0.0.1:9042".to_string());

        let store = StoreConfig {
            contact_points: vec![uri],
            keyspace: format!("ringfront_it_{}", Uuid::new_v4().simple()),
            table: "users".to_string(),
            replication_factor: 1,
            connect_timeout_secs: 10,
        };

        let conn = ClusterConnection::open(&store).await.expect("connect");
        ensure_schema(conn.session(), &store).await.expect("bootstrap");

        Self { conn, store }
    }

    async fn repo(&self) -> UserRepository {
        UserRepository::prepare(&self.conn, &self.store)
            .await
            .expect("prepare")
    }

    async fn teardown(self) {
        self.conn
            .session()
            .query(format!("DROP KEYSPACE IF EXISTS {}", self.store.keyspace), &[])
            .await
            .expect("drop keyspace");
    }
}

#[tokio::test]
async fn schema_bootstrap_is_idempotent() {
    let cluster = TestCluster::setup().await;
    // Second run against an existing keyspace and table must not error
    ensure_schema(cluster.conn.session(), &cluster.store)
        .await
        .expect("re-bootstrap");
    cluster.teardown().await;
}

#[tokio::test]
async fn create_then_get_roundtrip() {
    let cluster = TestCluster::setup().await;
    let repo = cluster.repo().await;

    let created = repo
        .create(Some("Ana".into()), Some("a@x.com".into()))
        .await
        .expect("create");
    let second = repo.create(None, None).await.expect("create");
    assert_ne!(created.id, second.id, "successive creates must not collide");

    let fetched = repo
        .get(&created.id.to_string())
        .await
        .expect("get")
        .expect("row present");
    assert_eq!(fetched, created);

    cluster.teardown().await;
}

#[tokio::test]
async fn get_unknown_id_is_none_and_malformed_id_is_rejected() {
    let cluster = TestCluster::setup().await;
    let repo = cluster.repo().await;

    let absent = repo.get(&Uuid::new_v4().to_string()).await.expect("get");
    assert!(absent.is_none());

    let err = repo.get("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, ringfront::Error::InvalidId(_)));

    cluster.teardown().await;
}

#[tokio::test]
async fn update_is_full_replacement_and_upserts() {
    let cluster = TestCluster::setup().await;
    let repo = cluster.repo().await;

    let user = repo
        .create(Some("Ana".into()), Some("a@x.com".into()))
        .await
        .expect("create");

    // Updating with an absent email must overwrite email to null
    repo.update(&user.id.to_string(), Some("Ana B".into()), None)
        .await
        .expect("update");
    let fetched = repo
        .get(&user.id.to_string())
        .await
        .expect("get")
        .expect("row present");
    assert_eq!(fetched.name.as_deref(), Some("Ana B"));
    assert_eq!(fetched.email, None);

    // Blind update on a never-created id writes a new row (CQL upsert)
    let ghost = Uuid::new_v4();
    repo.update(&ghost.to_string(), Some("Ghost".into()), None)
        .await
        .expect("update absent id");
    let row = repo.get(&ghost.to_string()).await.expect("get");
    assert_eq!(row.expect("upserted row").name.as_deref(), Some("Ghost"));

    cluster.teardown().await;
}

#[tokio::test]
async fn delete_is_idempotent_and_list_reflects_it() {
    let cluster = TestCluster::setup().await;
    let repo = cluster.repo().await;

    let a = repo.create(Some("A".into()), None).await.expect("create");
    let b = repo.create(Some("B".into()), None).await.expect("create");
    let c = repo.create(Some("C".into()), None).await.expect("create");

    repo.delete(&b.id.to_string()).await.expect("delete");
    repo.delete(&b.id.to_string()).await.expect("second delete is not an error");

    assert!(repo.get(&b.id.to_string()).await.expect("get").is_none());

    let mut ids: Vec<Uuid> = repo
        .list_all()
        .await
        .expect("list")
        .into_iter()
        .map(|u| u.id)
        .collect();
    ids.sort();
    let mut expected = vec![a.id, c.id];
    expected.sort();
    assert_eq!(ids, expected);

    cluster.teardown().await;
}

#[tokio::test]
async fn topology_reports_reachable_members() {
    let cluster = TestCluster::setup().await;

    let nodes: Vec<ClusterNode> = cluster.conn.topology();
    assert!(!nodes.is_empty(), "at least the contact point must be known");
    for node in &nodes {
        assert!(!node.address.is_empty());
    }

    cluster.teardown().await;
}

#[tokio::test]
async fn http_end_to_end_scenario() {
    let cluster = TestCluster::setup().await;
    let repo = cluster.repo().await;

    let server = HttpServer::new(ApiConfig::default(), repo, cluster.conn.clone());
    let app = server.router();

    // POST /users
    let response = app
        .clone()
        .oneshot(
            Request::post("/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"Ana","email":"a@x.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(created["name"], "Ana");
    assert_eq!(created["email"], "a@x.com");
    let id = created["id"].as_str().expect("generated id").to_string();

    // GET /users/{id} echoes the fields
    let response = app
        .clone()
        .oneshot(Request::get(format!("/users/{}", id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let fetched: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(fetched, created);

    // GET /users/{malformed} is a client error
    let response = app
        .clone()
        .oneshot(Request::get("/users/not-a-uuid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // DELETE /users/{id}
    let response = app
        .clone()
        .oneshot(Request::delete(format!("/users/{}", id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // GET /users/{id} is now 404 with an error body
    let response = app
        .clone()
        .oneshot(Request::get(format!("/users/{}", id)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(err["error"].as_str().unwrap().contains("not found"));

    // GET /cluster/nodes count matches list length
    let response = app
        .clone()
        .oneshot(Request::get("/cluster/nodes").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let topo: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let count = topo["node_count"].as_u64().unwrap();
    assert_eq!(count as usize, topo["nodes"].as_array().unwrap().len());
    assert!(count >= 1);

    cluster.teardown().await;
}
