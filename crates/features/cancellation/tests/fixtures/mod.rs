//! Hand-rolled doubles for the directory and transport seams.

use async_trait::async_trait;
use rcast_domain::registration::DeviceRegistration;
use rcast_push::{MulticastMessage, MulticastReceipt, PushError, PushTransport, SendOutcome};
use rcast_registry::{DeviceDirectory, RegistryError};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
enum DirectoryScript {
    Devices(Vec<DeviceRegistration>),
    Fail,
}

#[derive(Debug)]
pub struct FakeDirectory {
    script: DirectoryScript,
    calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn with_devices(devices: Vec<DeviceRegistration>) -> Self {
        Self { script: DirectoryScript::Devices(devices), calls: AtomicUsize::new(0) }
    }

    pub fn empty() -> Self {
        Self::with_devices(Vec::new())
    }

    pub fn failing() -> Self {
        Self { script: DirectoryScript::Fail, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceDirectory for FakeDirectory {
    async fn devices_for(&self, _user_id: &str) -> Result<Vec<DeviceRegistration>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            DirectoryScript::Devices(devices) => Ok(devices.clone()),
            DirectoryScript::Fail => Err(RegistryError::Rejected {
                message: "directory down".into(),
                context: None,
            }),
        }
    }
}

#[derive(Debug)]
enum TransportScript {
    DeliverAll,
    Outcomes(Vec<SendOutcome>),
    Fail,
}

#[derive(Debug)]
pub struct FakeTransport {
    script: TransportScript,
    sent: Mutex<Vec<MulticastMessage>>,
}

impl FakeTransport {
    pub fn deliver_all() -> Self {
        Self { script: TransportScript::DeliverAll, sent: Mutex::new(Vec::new()) }
    }

    pub fn scripted(outcomes: Vec<SendOutcome>) -> Self {
        Self { script: TransportScript::Outcomes(outcomes), sent: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { script: TransportScript::Fail, sent: Mutex::new(Vec::new()) }
    }

    pub fn invocations(&self) -> usize {
        self.sent.lock().expect("fixture lock poisoned").len()
    }

    pub fn last_tokens(&self) -> Option<Vec<String>> {
        self.sent
            .lock()
            .expect("fixture lock poisoned")
            .last()
            .map(|message| message.tokens().to_vec())
    }
}

#[async_trait]
impl PushTransport for FakeTransport {
    async fn send_multicast(
        &self,
        message: &MulticastMessage,
    ) -> Result<MulticastReceipt, PushError> {
        self.sent.lock().expect("fixture lock poisoned").push(message.clone());
        match &self.script {
            TransportScript::DeliverAll => Ok(MulticastReceipt::from_outcomes(
                message.tokens().iter().map(|_| SendOutcome { delivered: true, failure: None }).collect(),
            )),
            TransportScript::Outcomes(outcomes) => {
                Ok(MulticastReceipt::from_outcomes(outcomes.clone()))
            },
            TransportScript::Fail => Err(PushError::Unavailable {
                message: "push service unreachable".into(),
                context: None,
            }),
        }
    }
}

pub fn device(id: &str, token: Option<&str>) -> DeviceRegistration {
    DeviceRegistration::new(id, token.map(str::to_owned))
}

pub fn delivered() -> SendOutcome {
    SendOutcome { delivered: true, failure: None }
}

pub fn failed(failure: rcast_push::SendFailure) -> SendOutcome {
    SendOutcome { delivered: false, failure: Some(failure) }
}
