//! On-demand loading behaviour of the registry

use schemaform_node::SchemaNode;
use schemaform_registry::prelude::*;
use schemaform_test_utils::{
    init_tracing, recursive_bundle, tree_schema, CountingLoader, FlakyLoader, RecordingLoader,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn concurrent_resolves_share_one_load() {
    init_tracing();
    let loader = Arc::new(
        CountingLoader::new(recursive_bundle()).with_delay(Duration::from_millis(50)),
    );
    let registry = SchemaRegistry::new().with_shared_loader(loader.clone());

    let results = futures::future::join_all((0..8).map(|_| registry.resolve("Tree"))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(loader.calls(), 1);
    assert_eq!(*registry.get("Tree").unwrap(), tree_schema());
}

#[tokio::test]
async fn loaded_names_are_served_locally() {
    let loader = Arc::new(CountingLoader::new(recursive_bundle()));
    let registry = SchemaRegistry::new().with_shared_loader(loader.clone());

    registry.resolve("Tree").await.unwrap();
    registry.resolve("Tree").await.unwrap();
    // Chain arrived in the same bundle
    registry.resolve("Chain").await.unwrap();

    assert_eq!(loader.calls(), 1);
    assert_eq!(registry.len(), 2);
}

#[tokio::test]
async fn failed_load_is_retried() {
    let registry = SchemaRegistry::new().with_loader(FlakyLoader::new(recursive_bundle(), 1));

    let first = registry.resolve("Tree").await;
    assert!(matches!(first, Err(RegistryError::LoadFailed { .. })));

    let second = registry.resolve("Tree").await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn session_resolves_each_name_once() {
    let loader = Arc::new(RecordingLoader::new(recursive_bundle()));
    let registry = SchemaRegistry::new().with_shared_loader(loader.clone());
    let mut session = ResolutionSession::new(&registry);

    let root = SchemaNode::tuple(vec![
        SchemaNode::recursive_ref("Tree"),
        SchemaNode::recursive_ref("Chain"),
        SchemaNode::recursive_ref("Tree"),
    ]);
    assert_eq!(session.preload(&root).await.unwrap(), 2);
    session.resolve("Tree").await.unwrap();

    assert_eq!(loader.requests(), vec!["Tree".to_string()]);
    assert!(session.resolve_ref("Chain").is_ok());
}

#[tokio::test]
async fn registry_ref_lookup_before_load() {
    let registry = SchemaRegistry::new().with_loader(CountingLoader::new(recursive_bundle()));

    assert!(matches!(
        registry.resolve_ref("Tree"),
        Err(RegistryError::NotLoaded { .. })
    ));
    registry.resolve("Tree").await.unwrap();
    assert!(registry.resolve_ref("Tree").is_ok());
}
