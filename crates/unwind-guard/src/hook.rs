//! Panic hook integration
//!
//! The default hook prints every panic, caught or not. Guards install one
//! chaining hook per process that stays out of the way outside guard
//! scopes and, inside them, records the panic location. A quiet scope
//! keeps [`Exception`] payloads off stderr; everything else still reaches
//! the previous hook:
//! - plain `panic!` payloads, which are usually bugs
//! - any panic in a `panic = "abort"` build
//! - a second panic raised before the guard has collected the first one,
//!   such as a destructor panicking during cleanup
//!
//! Limitations:
//! - An [`Exception`] raised where it cannot unwind (inside an
//!   `extern "C"` function) aborts the process without a message, since
//!   the hook cannot tell it apart from one the guard will catch.
//! - An [`Exception`] that the work item catches itself with
//!   `catch_unwind` is silenced like one the guard catches. Only the
//!   first one per guard is, later ones count as a second panic.
//! - Nothing is installed when the first guard in the process starts on a
//!   thread that is already panicking. Catching still works there; only
//!   quieting and location capture are skipped until a later guard
//!   installs the hook.

use std::cell::{Cell, RefCell};
use std::panic;
use std::sync::Once;
use std::thread;

use crate::exception::Exception;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeState {
    depth: usize,
    quiet: bool,
    /// A panic was seen in this scope and the guard has not collected it yet
    pending: bool,
}

impl ScopeState {
    const OUTSIDE: Self = Self {
        depth: 0,
        quiet: false,
        pending: false,
    };
}

thread_local! {
    static STATE: Cell<ScopeState> = const { Cell::new(ScopeState::OUTSIDE) };
    static LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

fn install() {
    // take_hook panics on a panicking thread
    if thread::panicking() {
        return;
    }

    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let state = STATE.try_with(Cell::get).unwrap_or(ScopeState::OUTSIDE);
            if state.depth == 0 || state.pending || cfg!(panic = "abort") {
                previous(info);
                return;
            }

            let _ = STATE.try_with(|slot| {
                slot.set(ScopeState {
                    pending: true,
                    ..state
                })
            });
            if let Some(location) = info.location() {
                let _ = LOCATION.try_with(|slot| *slot.borrow_mut() = Some(location.to_string()));
            }

            if !(state.quiet && info.payload().is::<Exception>()) {
                previous(info);
            }
        }));
        tracing::debug!("installed guard panic hook");
    });
}

/// Marks the current thread as running guarded code until dropped
pub(crate) struct Scope {
    previous: ScopeState,
    previous_location: Option<String>,
}

impl Scope {
    pub(crate) fn enter(quiet: bool) -> Self {
        install();
        let previous = STATE.with(|state| {
            let previous = state.get();
            state.set(ScopeState {
                depth: previous.depth + 1,
                quiet,
                pending: false,
            });
            previous
        });
        let previous_location = LOCATION.with(|slot| slot.borrow_mut().take());
        Self {
            previous,
            previous_location,
        }
    }

    /// Location of the panic seen in this scope, if the hook saw one.
    ///
    /// Also marks the panic as collected, so the next one in this scope
    /// is treated as a fresh panic.
    pub(crate) fn take_location(&self) -> Option<String> {
        STATE.with(|state| {
            state.set(ScopeState {
                pending: false,
                ..state.get()
            })
        });
        LOCATION.with(|slot| slot.borrow_mut().take())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let _ = STATE.try_with(|state| state.set(self.previous));
        let location = self.previous_location.take();
        let _ = LOCATION.try_with(|slot| *slot.borrow_mut() = location);
    }
}
