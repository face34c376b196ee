//! Device emulator — per-kind state machine for the five virtual devices.
//!
//! One [`Emulator`] instance exists per [`DeviceKind`], held by the
//! registry for the process lifetime. Behaviour is dispatched by matching
//! on the kind rather than through a trait hierarchy; five fixed kinds do
//! not warrant one.
//!
//! Periodic kinds (dht, light, motion) run a cycle on a cancellable tokio
//! task: generate a value, publish it, record it. Event-driven kinds react
//! to [`press`](Emulator::press) (button) or to the on/off commands
//! directly (relay).
//!
//! Transport failures never reach the state transition logic: a failed
//! publish or insert is logged and swallowed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;

use emuhub_domain::device::DeviceKind;
use emuhub_domain::time::now;
use emuhub_domain::value::{Climate, DeviceValue, wire_payload};

use crate::ports::{MessageBus, ReadingStore};

/// How long the button stays active after a press before auto-reset.
const BUTTON_ACTIVE_FOR: Duration = Duration::from_millis(7000);

/// Mutable emulator state, shared with the polling task.
struct DeviceState {
    active: bool,
    value: Option<DeviceValue>,
}

/// State plus collaborators, shared between the handle and spawned tasks.
struct Inner<B, S> {
    kind: DeviceKind,
    topic: String,
    bus: B,
    store: S,
    state: Mutex<DeviceState>,
}

impl<B, S> Inner<B, S>
where
    B: MessageBus + Send + Sync,
    S: ReadingStore + Send + Sync,
{
    /// One emulator cycle: generate, publish, record. The active guard
    /// makes a cycle that races a concurrent `turn_off` a no-op.
    async fn cycle(&self) {
        if !self.lock_state().active {
            return;
        }
        self.generate_value();
        self.publish_current().await;
        self.record_current().await;
    }

    /// Kind-specific value generation. Button and relay values are set by
    /// their commands, not generated.
    fn generate_value(&self) {
        let mut rng = rand::thread_rng();
        let value = match self.kind {
            DeviceKind::Dht => {
                let temperature: f64 = rng.gen_range(18.0..=32.0);
                let humidity: f64 = rng.gen_range(30.0..=90.0);
                Some(DeviceValue::Climate(Climate {
                    temperature: format!("{temperature:.1} \u{b0}C"),
                    humidity: format!("{humidity:.1} %"),
                }))
            }
            DeviceKind::Light => {
                let lux: i32 = rng.gen_range(0..=1000);
                Some(DeviceValue::Text(format!("{lux} lx")))
            }
            DeviceKind::Motion => {
                let detected = rng.gen_bool(0.8);
                let text = if detected { "motion detected" } else { "no motion" };
                Some(DeviceValue::Text(text.to_string()))
            }
            DeviceKind::Button | DeviceKind::Relay => return,
        };
        self.lock_state().value = value;
    }

    /// Publish the current value on the device topic. Failures degrade to a
    /// warning.
    async fn publish_current(&self) {
        let payload = {
            let state = self.lock_state();
            wire_payload(self.kind, state.value.as_ref())
        };
        match self.bus.publish(&self.topic, &payload).await {
            Ok(()) => tracing::debug!(topic = %self.topic, %payload, "published"),
            Err(error) => {
                tracing::warn!(topic = %self.topic, %error, "publish failed, dropping payload");
            }
        }
    }

    /// Record the current value to the store, if there is one. Failures
    /// degrade to a warning.
    async fn record_current(&self) {
        let value = self.lock_state().value.as_ref().map(DeviceValue::record_text);
        let Some(value) = value else { return };
        if let Err(error) = self.store.insert(self.kind, &value, now()).await {
            tracing::warn!(device = %self.kind, %error, "recording reading failed");
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A virtual device emulator.
///
/// Construction is cheap and side-effect free; nothing is published until
/// [`turn_on`](Self::turn_on) or [`press`](Self::press).
pub struct Emulator<B, S> {
    inner: Arc<Inner<B, S>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl<B, S> Emulator<B, S>
where
    B: MessageBus + Send + Sync + 'static,
    S: ReadingStore + Send + Sync + 'static,
{
    /// Create an emulator for `kind` publishing through `bus` and recording
    /// through `store`.
    pub fn new(kind: DeviceKind, bus: B, store: S) -> Self {
        tracing::debug!(device = %kind, topic = %kind.topic(), "emulator initialized");
        Self {
            inner: Arc::new(Inner {
                kind,
                topic: kind.topic(),
                bus,
                store,
                state: Mutex::new(DeviceState {
                    active: false,
                    value: None,
                }),
            }),
            poll_task: Mutex::new(None),
            reset_task: Mutex::new(None),
        }
    }

    /// The device kind this emulator models.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.inner.kind
    }

    /// Whether the device is currently considered on/asserting.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.lock_state().active
    }

    /// Snapshot of the current value, if any.
    #[must_use]
    pub fn current_value(&self) -> Option<DeviceValue> {
        self.inner.lock_state().value.clone()
    }

    /// Activate the emulator.
    ///
    /// Periodic kinds run one cycle immediately (no delay before the first
    /// emission) and then tick at their cadence until turned off. The relay
    /// instead latches an explicit `"1"`, publishing and recording it. The
    /// button only marks itself active; it emits on [`press`](Self::press).
    pub async fn turn_on(&self) {
        if self.inner.kind == DeviceKind::Relay {
            {
                let mut state = self.inner.lock_state();
                state.active = true;
                state.value = Some(DeviceValue::Text("1".to_string()));
            }
            self.inner.publish_current().await;
            self.inner.record_current().await;
            tracing::info!(device = %self.inner.kind, "relay switched on");
            return;
        }

        self.inner.lock_state().active = true;
        self.inner.cycle().await;

        if let Some(period) = self.inner.kind.poll_interval() {
            let inner = Arc::clone(&self.inner);
            let handle = tokio::spawn(async move {
                // First cycle already ran synchronously above.
                let start = tokio::time::Instant::now() + period;
                let mut ticks = tokio::time::interval_at(start, period);
                loop {
                    ticks.tick().await;
                    inner.cycle().await;
                }
            });
            replace_task(&self.poll_task, Some(handle));
        }
        tracing::info!(device = %self.inner.kind, "emulator turned on");
    }

    /// Deactivate the emulator and publish the resulting inactive payload.
    ///
    /// Cancels the polling task before touching state, so no tick fires
    /// after this returns. The relay latches an explicit `"0"` and records
    /// it; other kinds clear their value and skip the store. Idempotent.
    pub async fn turn_off(&self) {
        replace_task(&self.poll_task, None);

        if self.inner.kind == DeviceKind::Relay {
            {
                let mut state = self.inner.lock_state();
                state.active = false;
                state.value = Some(DeviceValue::Text("0".to_string()));
            }
            self.inner.publish_current().await;
            self.inner.record_current().await;
            tracing::info!(device = %self.inner.kind, "relay switched off");
            return;
        }

        {
            let mut state = self.inner.lock_state();
            state.active = false;
            state.value = None;
        }
        self.inner.publish_current().await;
        tracing::info!(device = %self.inner.kind, "emulator turned off");
    }

    /// Simulate a button press.
    ///
    /// Publishes and records `"pressed"`, then auto-resets to inactive
    /// after 7 seconds with one more publish and no second record. Pressing
    /// again before the reset re-arms the timer. No-op for other kinds.
    pub async fn press(&self) {
        if self.inner.kind != DeviceKind::Button {
            tracing::debug!(device = %self.inner.kind, "press ignored for non-button emulator");
            return;
        }

        {
            let mut state = self.inner.lock_state();
            state.active = true;
            state.value = Some(DeviceValue::Text("pressed".to_string()));
        }
        self.inner.publish_current().await;
        self.inner.record_current().await;
        tracing::info!(device = %self.inner.kind, "button pressed");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(BUTTON_ACTIVE_FOR).await;
            {
                let mut state = inner.lock_state();
                state.active = false;
                state.value = None;
            }
            inner.publish_current().await;
            tracing::debug!(device = %inner.kind, "button auto-reset");
        });
        replace_task(&self.reset_task, Some(handle));
    }
}

/// Swap the task slot, aborting whatever was running before.
fn replace_task(slot: &Mutex<Option<JoinHandle<()>>>, handle: Option<JoinHandle<()>>) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(old) = slot.take() {
        old.abort();
    }
    *slot = handle;
}

impl<B, S> Drop for Emulator<B, S> {
    fn drop(&mut self) {
        replace_task(&self.poll_task, None);
        replace_task(&self.reset_task, None);
    }
}
