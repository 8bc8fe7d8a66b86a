//! End-to-end migration against mocked Phoenix REST and Arize GraphQL servers.

use std::sync::Arc;

use arize_domain::constants::{EXPORT_ROOT_DIR, MIGRATION_RESULTS_FILE};
use arize_domain::{
    ArizeConfig, ClientOptions, DataType, ExportFilters, MigrationConfig, MigrationJob, MigrationStatus,
};
use arize_infra::{AsyncArizeClient, MigrationService, PhoenixClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn migration_config(phoenix: &MockServer) -> MigrationConfig {
    MigrationConfig {
        phoenix_url: phoenix.uri(),
        batch_delay_ms: 0,
        retry_delay_ms: 1,
        max_retries: 1,
        include_details: false,
        ..MigrationConfig::default()
    }
}

fn arize_config(arize: &MockServer) -> ArizeConfig {
    ArizeConfig {
        api_key: "test-key".into(),
        organization: "acme".into(),
        space: "prod".into(),
        app_url: arize.uri(),
    }
}

async fn mount_phoenix_datasets(phoenix: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/datasets"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "datasets": [
                {"id": "d1", "name": "golden"},
                {"id": "d2", "name": "regression"},
                {"id": "d2", "name": "regression"}
            ]
        })))
        .mount(phoenix)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo/datasets"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"datasets": []})))
        .mount(phoenix)
        .await;
}

async fn mount_space_lookup(arize: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("orgIDandSpaceID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"account": {"organizations": {"edges": [{"node": {
                "id": "org-1",
                "spaces": {"edges": [{"node": {"id": "space-1"}}]}
            }}]}}}
        })))
        .expect(1)
        .mount(arize)
        .await;
}

#[tokio::test]
async fn datasets_flow_from_phoenix_into_the_space() {
    let phoenix = MockServer::start().await;
    let arize = MockServer::start().await;
    mount_phoenix_datasets(&phoenix).await;
    mount_space_lookup(&arize).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": {"input": {"spaceId": "space-1", "projectName": "demo"}}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"importPhoenixDataset": {"clientMutationId": null}}})),
        )
        .expect(2)
        .mount(&arize)
        .await;

    let config = migration_config(&phoenix);
    let source = Arc::new(PhoenixClient::new(&config).expect("phoenix client"));
    let service = MigrationService::new(source, config).expect("service");
    let client = AsyncArizeClient::new(arize_config(&arize), ClientOptions::default()).expect("arize client");
    let target = Arc::new(client.migration_target().await.expect("target"));
    let out = tempfile::tempdir().expect("temp dir");

    let job = service
        .run(target, "demo", &[DataType::Datasets], out.path(), &ExportFilters::default())
        .await
        .expect("migration runs");

    assert_eq!(job.status, MigrationStatus::Completed);
    let result = &job.results[0];
    assert_eq!((result.success_count, result.error_count, result.skipped_count), (2, 0, 1));
    let export_file = result.export_file.as_ref().expect("export file recorded");
    assert!(export_file.ends_with("datasets.json"));

    let run_dir = export_file.parent().expect("run directory");
    assert!(run_dir.starts_with(out.path().join(EXPORT_ROOT_DIR).join("demo")));
    let written: MigrationJob =
        serde_json::from_slice(&std::fs::read(run_dir.join(MIGRATION_RESULTS_FILE)).expect("results file"))
            .expect("results decode");
    assert_eq!(written.id, job.id);
}

#[tokio::test]
async fn rejected_mutations_leave_the_job_failed() {
    let phoenix = MockServer::start().await;
    let arize = MockServer::start().await;
    mount_phoenix_datasets(&phoenix).await;
    mount_space_lookup(&arize).await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("importPhoenixDataset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errors": [{"message": "space is read-only"}]})),
        )
        .mount(&arize)
        .await;

    let config = migration_config(&phoenix);
    let source = Arc::new(PhoenixClient::new(&config).expect("phoenix client"));
    let service = MigrationService::new(source, config).expect("service");
    let client = AsyncArizeClient::new(arize_config(&arize), ClientOptions::default()).expect("arize client");
    let target = Arc::new(client.migration_target().await.expect("target"));
    let out = tempfile::tempdir().expect("temp dir");

    let job = service
        .run(target, "demo", &[DataType::Datasets], out.path(), &ExportFilters::default())
        .await
        .expect("migration runs");

    assert_eq!(job.status, MigrationStatus::Failed);
    let result = &job.results[0];
    // a failed item is never marked imported, so its repeat is attempted too
    assert_eq!(result.success_count, 0);
    assert_eq!(result.error_count, 3);
    assert_eq!(result.skipped_count, 0);
    assert!(result.errors.iter().all(|e| e.contains("space is read-only")), "{:?}", result.errors);
}

#[tokio::test]
async fn dry_run_estimates_without_arize_credentials() {
    let phoenix = MockServer::start().await;
    mount_phoenix_datasets(&phoenix).await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "demo"})))
        .mount(&phoenix)
        .await;

    let config = migration_config(&phoenix);
    let source = Arc::new(PhoenixClient::new(&config).expect("phoenix client"));
    let service = MigrationService::new(source, config).expect("service");

    let report = service.check_feasibility("demo", &[DataType::Datasets]).await.expect("feasibility");

    assert!(report.project_exists);
    assert_eq!(report.estimated_counts.get(&DataType::Datasets), Some(&3));
    assert_eq!(report.total_estimated, 3);
}
