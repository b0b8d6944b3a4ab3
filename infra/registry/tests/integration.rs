use rcast_registry::{DeviceDirectory, Registry, RegistryError};
use std::time::Duration;

#[test]
fn builder_requires_a_url() {
    let err = Registry::builder().init().unwrap_err();
    assert!(matches!(err, RegistryError::Validation { .. }));
}

#[test]
fn builder_rejects_unparsable_urls() {
    let err = Registry::builder().url("not a url").init().unwrap_err();
    assert!(matches!(err, RegistryError::Validation { .. }));
}

#[test]
fn builder_accepts_timeout_and_auth() {
    Registry::builder()
        .url("http://127.0.0.1:9098")
        .auth("secret")
        .timeout(Duration::from_secs(2))
        .init()
        .expect("client should build");
}

#[tokio::test]
async fn empty_user_id_is_rejected_before_any_request() {
    let registry = Registry::builder().url("http://127.0.0.1:9098").init().unwrap();

    let err = registry.devices_for("").await.unwrap_err();
    assert!(matches!(err, RegistryError::Validation { .. }));
}
