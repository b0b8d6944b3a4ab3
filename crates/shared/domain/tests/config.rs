use rcast_domain::config::ApiConfig;

#[test]
fn defaults_are_sane() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.server.port, 4710);
    assert!(cfg.server.ssl.is_none());
    assert_eq!(cfg.registry.timeout_seconds, 5);
    assert!(cfg.registry.auth.is_none());
    assert_eq!(cfg.push.endpoint, "https://fcm.googleapis.com");
}

#[test]
fn partial_document_fills_the_rest_with_defaults() {
    let cfg: ApiConfig = serde_json::from_str(
        r#"{ "server": { "port": 8080 }, "push": { "project_id": "prod-calls" } }"#,
    )
    .expect("valid config document");

    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.push.project_id, "prod-calls");
    assert_eq!(cfg.push.timeout_seconds, 10);
    assert_eq!(cfg.registry.url, "http://127.0.0.1:9098");
}
