use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;

/// Outcome of asking for an exclusive run.
#[derive(Debug)]
#[must_use]
pub enum ScanStart<T> {
    Started(T),
    /// Another run of the same kind holds the flag. Not an error.
    AlreadyRunning,
}

impl<T> ScanStart<T> {
    pub fn is_already_running(&self) -> bool {
        matches!(self, ScanStart::AlreadyRunning)
    }

    pub fn started(self) -> Option<T> {
        match self {
            ScanStart::Started(value) => Some(value),
            ScanStart::AlreadyRunning => None,
        }
    }
}

/// Idle/Running flag for one kind of run.
#[derive(Debug)]
pub struct RunFlag {
    name: &'static str,
    state: AtomicU8,
}

impl RunFlag {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: AtomicU8::new(IDLE),
        }
    }

    /// Move Idle -> Running. The returned guard moves it back when dropped.
    pub fn try_start(&self) -> Option<RunGuard<'_>> {
        match self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                debug!(run = self.name, "run started");
                Some(RunGuard { flag: self })
            }
            Err(_) => {
                debug!(run = self.name, "run already in progress");
                None
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::Acquire) == RUNNING
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Holds a [`RunFlag`] in the Running state for as long as it lives.
#[derive(Debug)]
pub struct RunGuard<'a> {
    flag: &'a RunFlag,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.state.store(IDLE, Ordering::Release);
        debug!(run = self.flag.name, "run released");
    }
}
