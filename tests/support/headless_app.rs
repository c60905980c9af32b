//! Headless Bevy app handle that rspec environments can clone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::{App, World};

struct Guarded(App);

// SAFETY: rspec environments must be `Clone + Send + Sync` while the suites
// driving them run serially, and the app is only reached through the mutex.
unsafe impl Send for Guarded {}
unsafe impl Sync for Guarded {}

/// A fully built app stepped one `update` per tick.
#[derive(Clone)]
pub struct HeadlessApp(Arc<Mutex<Guarded>>);

impl std::fmt::Debug for HeadlessApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessApp").finish_non_exhaustive()
    }
}

impl HeadlessApp {
    /// Finishes plugin setup and takes ownership of `app`.
    pub fn new(mut app: App) -> Self {
        app.finish();
        app.cleanup();
        Self(Arc::new(Mutex::new(Guarded(app))))
    }

    fn lock(&self) -> MutexGuard<'_, Guarded> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `ticks` schedule updates.
    pub fn tick(&self, ticks: usize) {
        let mut guard = self.lock();
        for _ in 0..ticks {
            guard.0.update();
        }
    }

    /// Reads from the world.
    pub fn read<R>(&self, f: impl FnOnce(&World) -> R) -> R {
        f(self.lock().0.world())
    }

    /// Mutates the world between ticks.
    pub fn write<R>(&self, f: impl FnOnce(&mut World) -> R) -> R {
        f(self.lock().0.world_mut())
    }
}
