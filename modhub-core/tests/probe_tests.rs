//! Installed and managed module detection against in-memory cluster fakes

mod common;

use common::*;
use modhub_common::{CatalogModule, ModuleDeclaration};
use modhub_core::kubernetes::FieldManagerRecord;
use modhub_core::modules::{
    installed_view, join_views, managed_names, managed_view, probe_installed, ModuleError,
    ProbeError,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn istio() -> CatalogModule {
    catalog_module(
        "istio",
        vec![
            catalog_version("1.1.0", "istio-manager-old"),
            catalog_version("1.2.0", "istio-controller-manager"),
        ],
    )
}

fn keda() -> CatalogModule {
    catalog_module("keda", vec![catalog_version("v1.1.0", "keda-manager")])
}

// ============== Installed Prober Tests ==============

#[tokio::test]
async fn test_probe_up_to_date_module() {
    let workloads = FakeWorkloads::new().with_deployment(
        "istio-controller-manager",
        &["europe-docker.pkg.dev/kyma-project/prod/istio-manager:1.2.0"],
    );

    let installed = probe_installed(&[istio()], &workloads, NAMESPACE).await.unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].name, "istio");
    assert_eq!(installed[0].manager, "istio-controller-manager");
    assert_eq!(installed[0].installed_tag, "1.2.0");
    assert!(!installed[0].is_outdated());
    assert_eq!(installed[0].display_version(), "1.2.0");
}

#[tokio::test]
async fn test_probe_outdated_module() {
    let workloads = FakeWorkloads::new()
        .with_deployment("istio-controller-manager", &["registry/path/istio-manager:1.1.0"]);

    let installed = probe_installed(&[istio()], &workloads, NAMESPACE).await.unwrap();

    assert!(installed[0].is_outdated());
    assert_eq!(
        installed[0].display_version(),
        "outdated moduleVersion, latest is 1.2.0"
    );
}

#[tokio::test]
async fn test_probe_uses_latest_version_manager() {
    // Only the manager of an older version is running
    let workloads = FakeWorkloads::new()
        .with_deployment("istio-manager-old", &["registry/istio-manager:1.1.0"]);

    let installed = probe_installed(&[istio()], &workloads, NAMESPACE).await.unwrap();

    assert!(installed.is_empty());
    assert_eq!(workloads.lookups(), vec!["istio-controller-manager"]);
}

#[tokio::test]
async fn test_probe_skips_missing_deployments() {
    let workloads = FakeWorkloads::new()
        .with_deployment("keda-manager", &["registry/keda-manager:v1.1.0", "sidecar:1.0"]);

    let installed = probe_installed(&[istio(), keda()], &workloads, NAMESPACE)
        .await
        .unwrap();

    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].name, "keda");
    assert_eq!(installed[0].installed_tag, "v1.1.0");
    assert_eq!(
        workloads.lookups(),
        vec!["istio-controller-manager", "keda-manager"]
    );
}

#[tokio::test]
async fn test_probe_skips_modules_without_versions() {
    let workloads = FakeWorkloads::new();
    let bare = catalog_module("bare", vec![]);

    let installed = probe_installed(&[bare], &workloads, NAMESPACE).await.unwrap();

    assert!(installed.is_empty());
    assert!(workloads.lookups().is_empty());
}

#[tokio::test]
async fn test_probe_fails_fast_on_lookup_error() {
    let workloads = FakeWorkloads::new()
        .with_failure("istio-controller-manager", "connection refused")
        .with_deployment("keda-manager", &["registry/keda-manager:v1.1.0"]);

    let err = probe_installed(&[istio(), keda()], &workloads, NAMESPACE)
        .await
        .unwrap_err();

    match err {
        ProbeError::Lookup { manager, source } => {
            assert_eq!(manager, "istio-controller-manager");
            assert_eq!(source.to_string(), "Internal error: connection refused");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // keda is never looked at once istio failed
    assert_eq!(workloads.lookups(), vec!["istio-controller-manager"]);
}

#[tokio::test]
async fn test_probe_deployment_without_containers() {
    let workloads = FakeWorkloads::new().with_deployment("keda-manager", &[]);

    let err = probe_installed(&[keda()], &workloads, NAMESPACE).await.unwrap_err();

    assert!(matches!(err, ProbeError::NoContainers { manager } if manager == "keda-manager"));
}

// ============== Managed Extractor Tests ==============

#[tokio::test]
async fn test_managed_names_from_kyma() {
    let store = FakeKymaStore::new(kyma(
        vec![ModuleDeclaration::new("istio", "")],
        vec![
            managed_record("kyma-cli", &["istio", "keda"]),
            managed_record("busola", &["keda", "serverless"]),
        ],
    ));

    let names = managed_names(&store).await.unwrap();

    assert_eq!(
        names.into_iter().collect::<Vec<_>>(),
        vec!["istio", "keda", "serverless"]
    );
}

#[tokio::test]
async fn test_managed_names_without_kyma() {
    let store = FakeKymaStore::empty();

    assert!(managed_names(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_managed_names_ignore_undecodable_spec() {
    let store = FakeKymaStore::new(kyma(
        vec![ModuleDeclaration::new("istio", "")],
        vec![managed_record("kyma-cli", &["istio"])],
    ))
    .with_undecodable_spec();

    let names = managed_names(&store).await.unwrap();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["istio"]);

    // Editing still needs the typed spec
    let err = modhub_core::modules::service::enable(&store, "keda", "").await.unwrap_err();
    assert!(matches!(err, ModuleError::Read(_)));
}

#[tokio::test]
async fn test_managed_names_read_failure() {
    let store = FakeKymaStore::new(kyma(vec![], vec![])).with_read_failure("forbidden");

    let err = managed_names(&store).await.unwrap_err();
    assert!(matches!(err, ModuleError::Read(_)));
}

#[tokio::test]
async fn test_managed_names_malformed_fields() {
    let record = FieldManagerRecord {
        manager: "kubectl".to_string(),
        operation: "Update".to_string(),
        fields: Some(json!(["f:spec"])),
    };
    let store = FakeKymaStore::new(kyma(vec![], vec![record]));

    let err = managed_names(&store).await.unwrap_err();
    assert!(matches!(err, ModuleError::Extract(_)));
}

// ============== Joined View Tests ==============

#[tokio::test]
async fn test_managed_and_installed_join() {
    let store = FakeKymaStore::new(kyma(vec![], vec![managed_record("kyma-cli", &["istio", "btp"])]));
    let workloads = FakeWorkloads::new()
        .with_deployment("istio-controller-manager", &["registry/istio-manager:1.1.0"])
        .with_deployment("keda-manager", &["registry/keda-manager:v1.1.0"]);

    let managed = managed_view(managed_names(&store).await.unwrap());
    let installed = installed_view(
        probe_installed(&[istio(), keda()], &workloads, NAMESPACE)
            .await
            .unwrap(),
    );

    let rows = join_views(&[&managed, &installed]);
    let summary: Vec<(&str, &str, bool)> = rows
        .iter()
        .map(|row| (row.name.as_str(), row.version.as_str(), row.managed))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("btp", "", true),
            ("istio", "outdated moduleVersion, latest is 1.2.0", true),
            ("keda", "v1.1.0", false),
        ]
    );
}
