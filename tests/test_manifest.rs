use mockito::Server;
use modai::components::ComponentTable;
use modai::config::ManifestSource;
use modai::manifest::{fetch_manifest, parse_manifest};
use modai::models::SidebarItem;
use modai::{ModaiError, ModuleHost};
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn manifest_body() -> String {
    json!({
        "version": "1.0.0",
        "modules": [
            {
                "id": "session",
                "type": "ContextProvider",
                "path": "@modai/providers/SessionProvider"
            },
            {
                "id": "chat",
                "type": "Route",
                "path": "@modai/pages/ChatPage",
                "dependencies": ["module:session", "flag:!legacy"],
                "config": { "title": "Chat" }
            },
            {
                "id": "legacy",
                "type": "Route",
                "path": "@modai/pages/ChatPage",
                "enabled": false
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_fetch_remote_manifest() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/modules.json")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(manifest_body())
        .create_async()
        .await;

    let source = ManifestSource::parse(&format!("{}/modules.json", server.url()));
    let manifest = fetch_manifest(&source, Duration::from_secs(5)).await.unwrap();

    mock.assert_async().await;
    assert_eq!(manifest.version, "1.0.0");
    assert_eq!(manifest.modules.len(), 3);

    let chat = &manifest.modules[1];
    assert_eq!(chat.module_type, "Route");
    assert_eq!(chat.dependencies, vec!["module:session", "flag:!legacy"]);
    assert!(chat.enabled);
    assert_eq!(chat.config.get("title"), Some(&json!("Chat")));

    // absent fields take their defaults
    assert!(manifest.modules[0].dependencies.is_empty());
    assert!(manifest.modules[0].config.is_empty());
    assert!(!manifest.modules[2].enabled);
}

#[tokio::test]
async fn test_fetch_remote_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/modules.json")
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/modules.json", server.url());
    let err = fetch_manifest(&ManifestSource::parse(&url), Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        ModaiError::ManifestStatus { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_remote_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/modules.json")
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let source = ManifestSource::parse(&format!("{}/modules.json", server.url()));
    let err = fetch_manifest(&source, Duration::from_secs(5)).await.unwrap_err();

    assert!(matches!(err, ModaiError::ManifestParse(_)));
    assert!(err.is_load_error());
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    // Nothing listens on port 9 of localhost in the test environment
    let source = ManifestSource::parse("http://127.0.0.1:9/modules.json");
    let err = fetch_manifest(&source, Duration::from_secs(2)).await.unwrap_err();
    assert!(matches!(err, ModaiError::ManifestLoad(_)));
}

#[tokio::test]
async fn test_fetch_local_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("modules.json");
    fs::write(&path, manifest_body()).unwrap();

    let manifest = fetch_manifest(&ManifestSource::File(path), Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(manifest.modules[0].id, "session");
}

#[tokio::test]
async fn test_fetch_missing_file() {
    let temp = tempdir().unwrap();
    let source = ManifestSource::File(temp.path().join("absent.json"));

    let err = fetch_manifest(&source, Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, ModaiError::ManifestLoad(_)));
}

#[test]
fn test_parse_rejects_structural_problems() {
    let cases = [
        r#"{"version": "", "modules": []}"#,
        r#"{"modules": []}"#,
        r#"{"version": "1", "modules": [{"id": "", "type": "Route", "path": "p"}]}"#,
        r#"{"version": "1", "modules": [{"id": "chat page", "type": "Route", "path": "p"}]}"#,
        r#"{"version": "1", "modules": [{"id": "chat", "type": "", "path": "p"}]}"#,
        r#"{"version": "1", "modules": [{"id": "chat", "type": "Route", "path": " "}]}"#,
        r#"{"version": "1", "modules": [{"id": "chat", "type": "Route"}]}"#,
        r#"{"version": "1", "modules": {}}"#,
    ];

    for case in cases {
        let result = parse_manifest(case);
        assert!(
            matches!(result, Err(ModaiError::ManifestParse(_))),
            "expected parse error for {}",
            case
        );
    }
}

#[test]
fn test_parse_accepts_empty_module_list() {
    let manifest = parse_manifest(r#"{"version": "1"}"#).unwrap();
    assert!(manifest.modules.is_empty());
}

#[test]
fn test_parse_keeps_duplicate_ids_and_unknown_tokens() {
    let manifest = parse_manifest(
        r#"{"version": "1", "modules": [
            {"id": "chat", "type": "Route", "path": "a"},
            {"id": "chat", "type": "Route", "path": "b", "dependencies": ["feature:x"]}
        ]}"#,
    )
    .unwrap();

    assert_eq!(manifest.modules.len(), 2);
    assert_eq!(manifest.modules[1].dependencies, vec!["feature:x"]);
}

#[test]
fn test_type_tags_may_contain_spaces() {
    let manifest = parse_manifest(
        r#"{"version": "1", "modules": [
            {"id": "nav", "type": "sidebar item", "path": "@modai/chat/ChatSidebarItem"}
        ]}"#,
    )
    .unwrap();

    let host = ModuleHost::new(ComponentTable::builtin());
    let index = host.load_manifest(&manifest, &[] as &[&str]);

    let items = index.get_all::<SidebarItem>("sidebar item");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "Chat");
}

#[test]
fn test_null_dependencies_read_as_empty() {
    let manifest = parse_manifest(
        r#"{"version": "1", "modules": [
            {"id": "chat", "type": "Route", "path": "@modai/chat/ChatPage", "dependencies": null}
        ]}"#,
    )
    .unwrap();

    assert!(manifest.modules[0].dependencies.is_empty());
}
