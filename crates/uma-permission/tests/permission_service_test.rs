//! Integration tests for permission-ticket issuance against in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uma_core::error::UmaError;
use uma_core::models::permission::{PermissionRequest, RequestedResource};
use uma_core::models::resource::OwnerContext;
use uma_db::repository::{SurrealPermissionTicketStore, SurrealResourceRegistry};
use uma_permission::{IssueInput, PermissionConfig, PermissionService};
use uuid::Uuid;

type Service = PermissionService<SurrealResourceRegistry<Db>, SurrealPermissionTicketStore<Db>>;

/// Spin up in-memory DB, run migrations and register `r1` for alice
/// with the `read` scope.
async fn setup() -> (Service, Surreal<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    uma_db::run_migrations(&db).await.unwrap();

    register(&db, "r1", &alice(), &["read"]).await;

    let svc = PermissionService::new(
        SurrealResourceRegistry::new(db.clone()),
        SurrealPermissionTicketStore::new(db.clone()),
        PermissionConfig::default(),
    );
    (svc, db)
}

async fn register(db: &Surreal<Db>, resource_id: &str, owner: &OwnerContext, scopes: &[&str]) {
    let id = Uuid::new_v4().to_string();
    db.query(
        "CREATE type::record('resource', $id) SET \
         resource_id = $resource_id, \
         resource_owner_name = $resource_owner_name, \
         client_id = $client_id, \
         user_domain = $user_domain",
    )
    .bind(("id", id.clone()))
    .bind(("resource_id", resource_id.to_string()))
    .bind(("resource_owner_name", owner.resource_owner_name.clone()))
    .bind(("client_id", owner.client_id.clone()))
    .bind(("user_domain", owner.user_domain.clone()))
    .await
    .unwrap()
    .check()
    .unwrap();

    for scope in scopes {
        db.query(
            "CREATE type::record('resource_scope', $id) SET \
             resource_id = $resource_id, scope_name = $scope_name",
        )
        .bind(("id", Uuid::new_v4().to_string()))
        .bind(("resource_id", id.clone()))
        .bind(("scope_name", scope.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();
    }
}

async fn count(db: &Surreal<Db>, table: &str) -> usize {
    let mut result = db.query(format!("SELECT * FROM {table}")).await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    rows.len()
}

async fn counts(db: &Surreal<Db>) -> (usize, usize, usize) {
    (
        count(db, "permission_ticket").await,
        count(db, "pt_resource").await,
        count(db, "pt_resource_scope").await,
    )
}

fn alice() -> OwnerContext {
    OwnerContext::new("alice", "c1", "PRIMARY")
}

fn issue_input(resources: Vec<RequestedResource>) -> IssueInput {
    IssueInput {
        request: PermissionRequest::new(resources).unwrap(),
        owner: alice(),
        tenant_id: -1234,
        validity_period: None,
    }
}

#[tokio::test]
async fn valid_request_issues_one_ticket_with_its_associations() {
    let (svc, db) = setup().await;

    let out = svc
        .issue(issue_input(vec![RequestedResource::new("r1", ["read"])]))
        .await
        .unwrap();

    assert!(!out.ticket.is_empty());
    assert_eq!(counts(&db).await, (1, 1, 1));

    let mut result = db
        .query("SELECT * FROM permission_ticket WHERE ticket = $ticket AND status = 'ACTIVE'")
        .bind(("ticket", out.ticket.clone()))
        .await
        .unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn multi_resource_request_persists_one_row_per_resource_and_scope() {
    let (svc, db) = setup().await;
    register(&db, "r2", &alice(), &["view", "edit", "share"]).await;

    svc.issue(issue_input(vec![
        RequestedResource::new("r1", ["read"]),
        RequestedResource::new("r2", ["view", "share"]),
    ]))
    .await
    .unwrap();

    assert_eq!(counts(&db).await, (1, 2, 3));
}

#[tokio::test]
async fn unregistered_scope_is_rejected() {
    let (svc, db) = setup().await;

    let err = svc
        .issue(issue_input(vec![RequestedResource::new("r1", ["write"])]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UmaError::InvalidResourceScope {
            resource_id: "r1".into(),
            scope: "write".into(),
        }
    );
    assert_eq!(counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn unregistered_resource_is_rejected() {
    let (svc, db) = setup().await;

    let err = svc
        .issue(issue_input(vec![RequestedResource::new("r2", ["read"])]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UmaError::InvalidResourceId {
            resource_id: "r2".into()
        }
    );
    assert_eq!(counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn resource_of_another_owner_context_is_rejected() {
    let (svc, db) = setup().await;

    let mut input = issue_input(vec![RequestedResource::new("r1", ["read"])]);
    input.owner = OwnerContext::new("alice", "c1", "SECONDARY");

    let err = svc.issue(input).await.unwrap_err();

    assert!(matches!(err, UmaError::InvalidResourceId { ref resource_id } if resource_id == "r1"));
    assert_eq!(counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn invalid_resource_id_is_reported_before_invalid_scope() {
    let (svc, db) = setup().await;

    let err = svc
        .issue(issue_input(vec![
            RequestedResource::new("r1", ["write"]),
            RequestedResource::new("r2", ["read"]),
        ]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UmaError::InvalidResourceId {
            resource_id: "r2".into()
        }
    );
    assert_eq!(counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn repeated_invalid_requests_never_persist() {
    let (svc, db) = setup().await;

    for _ in 0..5 {
        assert!(
            svc.issue(issue_input(vec![RequestedResource::new("r1", ["write"])]))
                .await
                .is_err()
        );
        assert!(
            svc.issue(issue_input(vec![RequestedResource::new("nope", ["read"])]))
                .await
                .is_err()
        );
    }

    assert_eq!(counts(&db).await, (0, 0, 0));
}

#[tokio::test]
async fn concurrent_requests_for_disjoint_resources_both_succeed() {
    let (svc, db) = setup().await;
    register(&db, "r2", &alice(), &["view"]).await;

    let (a, b) = tokio::join!(
        svc.issue(issue_input(vec![RequestedResource::new("r1", ["read"])])),
        svc.issue(issue_input(vec![RequestedResource::new("r2", ["view"])])),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.ticket, b.ticket);
    assert_eq!(counts(&db).await, (2, 2, 2));
}

#[tokio::test]
async fn store_failure_during_scope_insert_rolls_back() {
    let (svc, db) = setup().await;
    db.query(
        "DEFINE FIELD OVERWRITE scope_id ON TABLE pt_resource_scope \
         TYPE string ASSERT $value = 'unreachable'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let err = svc
        .issue(issue_input(vec![RequestedResource::new("r1", ["read"])]))
        .await
        .unwrap_err();

    assert!(matches!(err, UmaError::PersistenceFailure(_)));
    assert!(!err.is_client_error());
    assert_eq!(counts(&db).await, (0, 0, 0));
}
