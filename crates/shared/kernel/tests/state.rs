#![cfg(feature = "server")]

use rcast_kernel::domain::config::ApiConfig;
use rcast_kernel::domain::registry::{FeatureSlice, InitializedSlice};
use rcast_kernel::server::{ApiState, ApiStateError};

#[derive(Debug)]
struct DemoSlice {
    name: &'static str,
}

impl FeatureSlice for DemoSlice {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Debug)]
struct UnregisteredSlice;

impl FeatureSlice for UnregisteredSlice {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[test]
fn registered_slice_is_resolvable() {
    let state = ApiState::builder()
        .config(ApiConfig::default())
        .register_slice(InitializedSlice::new(DemoSlice { name: "demo" }))
        .build()
        .expect("state should build");

    let slice = state.try_get_slice::<DemoSlice>().expect("slice should be registered");
    assert_eq!(slice.name, "demo");
    assert_eq!(state.slice_ids().count(), 1);
}

#[test]
fn missing_slice_yields_error() {
    let state = ApiState::builder().config(ApiConfig::default()).build().expect("state builds");

    let err = state.try_get_slice::<UnregisteredSlice>().unwrap_err();
    assert!(matches!(err, ApiStateError::MissingSlice { .. }));
}

#[test]
fn missing_config_fails_build() {
    let err = ApiState::builder().build().unwrap_err();
    assert!(matches!(err, ApiStateError::Validation { .. }));
}
