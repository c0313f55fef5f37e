// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestrator behavior against scripted power-control doubles: failure
//! isolation, absent slots and the exactly-once wake sequence.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Barrier;
use wakesync::{
    ConnectivityError, DeviceSlot, Error, PowerControl, PowerOrchestrator, PowerState, ResumeKind,
};

/// Scripted device: counts calls, records its label in a shared journal,
/// optionally fails every command.
struct MockDevice {
    label: &'static str,
    journal: Arc<Mutex<Vec<String>>>,
    fail: bool,
    on_calls: AtomicUsize,
    off_calls: AtomicUsize,
    shutdown_calls: AtomicUsize,
}

impl MockDevice {
    fn new(label: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            journal: Arc::clone(journal),
            fail: false,
            on_calls: AtomicUsize::new(0),
            off_calls: AtomicUsize::new(0),
            shutdown_calls: AtomicUsize::new(0),
        }
    }

    fn failing(label: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            fail: true,
            ..Self::new(label, journal)
        }
    }

    fn record(&self, op: &str) {
        self.journal.lock().unwrap().push(format!("{}.{op}", self.label));
    }

    fn outcome(&self) -> wakesync::Result<()> {
        if self.fail {
            Err(Error::Avr(ConnectivityError::ReadTimeout {
                after: Duration::from_millis(1),
            }))
        } else {
            Ok(())
        }
    }
}

impl PowerControl for MockDevice {
    async fn power_on(&self) -> wakesync::Result<()> {
        self.on_calls.fetch_add(1, Ordering::SeqCst);
        self.record("on");
        self.outcome()
    }

    async fn power_off(&self) -> wakesync::Result<()> {
        self.off_calls.fetch_add(1, Ordering::SeqCst);
        self.record("off");
        self.outcome()
    }

    async fn power_status(&self) -> wakesync::Result<PowerState> {
        Ok(PowerState::Unknown)
    }

    async fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
        self.record("shutdown");
    }
}

fn journal() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Suspend
// ============================================================================

mod suspend {
    use super::*;

    #[tokio::test]
    async fn powers_off_tv_before_avr() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_suspend().await;

        assert_eq!(*journal.lock().unwrap(), vec!["tv.off", "avr.off"]);
    }

    #[tokio::test]
    async fn tv_failure_does_not_block_avr() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::failing("tv", &journal)),
        );

        orchestrator.on_suspend().await;

        let avr = orchestrator.avr().get().unwrap();
        assert_eq!(avr.off_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absent_tv_is_skipped_and_avr_still_powered_off() {
        let journal = journal();
        let orchestrator: PowerOrchestrator<MockDevice, MockDevice> = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::absent("no CEC adapter found"),
        );

        orchestrator.on_suspend().await;

        assert_eq!(*journal.lock().unwrap(), vec!["avr.off"]);
    }
}

// ============================================================================
// Resume
// ============================================================================

mod resume {
    use super::*;

    #[tokio::test]
    async fn powers_on_tv_before_avr() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_resume(ResumeKind::Manual).await;

        assert_eq!(*journal.lock().unwrap(), vec!["tv.on", "avr.on"]);
    }

    #[tokio::test]
    async fn tv_failure_does_not_block_avr() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::failing("tv", &journal)),
        );

        orchestrator.on_resume(ResumeKind::Automatic).await;

        let avr = orchestrator.avr().get().unwrap();
        assert_eq!(avr.on_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_notifications_run_the_wake_sequence_once() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_resume(ResumeKind::Manual).await;
        orchestrator.on_resume(ResumeKind::Automatic).await;
        orchestrator.on_resume(ResumeKind::Manual).await;

        assert_eq!(*journal.lock().unwrap(), vec!["tv.on", "avr.on"]);
    }

    #[tokio::test]
    async fn concurrent_kinds_run_the_wake_sequence_exactly_once() {
        // both resume kinds race from separate tasks; whatever the
        // interleaving, the wake sequence must run exactly once
        for _ in 0..100 {
            let journal = journal();
            let orchestrator = Arc::new(PowerOrchestrator::new(
                DeviceSlot::Present(MockDevice::new("avr", &journal)),
                DeviceSlot::Present(MockDevice::new("tv", &journal)),
            ));
            let barrier = Arc::new(Barrier::new(2));

            let manual = {
                let orchestrator = Arc::clone(&orchestrator);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    orchestrator.on_resume(ResumeKind::Manual).await;
                })
            };
            let automatic = {
                let orchestrator = Arc::clone(&orchestrator);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    orchestrator.on_resume(ResumeKind::Automatic).await;
                })
            };

            manual.await.unwrap();
            automatic.await.unwrap();

            assert_eq!(*journal.lock().unwrap(), vec!["tv.on", "avr.on"]);
        }
    }

    #[tokio::test]
    async fn a_new_suspend_episode_rearms_the_guard() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_resume(ResumeKind::Manual).await;
        orchestrator.on_resume(ResumeKind::Automatic).await;
        orchestrator.on_suspend().await;
        orchestrator.on_resume(ResumeKind::Automatic).await;

        let tv = orchestrator.tv().get().unwrap();
        assert_eq!(tv.on_calls.load(Ordering::SeqCst), 2);
        assert_eq!(tv.off_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absent_devices_make_resume_a_quiet_no_op() {
        let orchestrator: PowerOrchestrator<MockDevice, MockDevice> = PowerOrchestrator::new(
            DeviceSlot::absent("receiver unresolvable"),
            DeviceSlot::absent("no CEC adapter found"),
        );

        orchestrator.on_resume(ResumeKind::Manual).await;
        orchestrator.on_suspend().await;

        assert_eq!(
            orchestrator.avr().absent_reason(),
            Some("receiver unresolvable")
        );
        assert!(!orchestrator.tv().is_present());
    }
}

// ============================================================================
// Teardown
// ============================================================================

mod teardown {
    use super::*;

    #[tokio::test]
    async fn on_stop_shuts_both_devices_down() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_stop().await;

        let log = journal.lock().unwrap();
        assert!(log.contains(&"tv.shutdown".to_string()));
        assert!(log.contains(&"avr.shutdown".to_string()));
    }

    #[tokio::test]
    async fn on_stop_twice_is_harmless() {
        let journal = journal();
        let orchestrator = PowerOrchestrator::new(
            DeviceSlot::Present(MockDevice::new("avr", &journal)),
            DeviceSlot::Present(MockDevice::new("tv", &journal)),
        );

        orchestrator.on_stop().await;
        orchestrator.on_stop().await;

        let avr = orchestrator.avr().get().unwrap();
        assert_eq!(avr.shutdown_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn on_stop_with_absent_devices_is_a_no_op() {
        let orchestrator: PowerOrchestrator<MockDevice, MockDevice> =
            PowerOrchestrator::new(DeviceSlot::absent("gone"), DeviceSlot::absent("gone"));

        orchestrator.on_stop().await;
    }
}
