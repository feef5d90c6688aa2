//! Catching operation panics at the panic site.
//!
//! A process-wide panic hook is installed once. While the current thread is
//! inside [`catch`], the hook records the panic location and a backtrace
//! taken before unwinding, and prints nothing; the dispatcher reports the
//! panic itself. Outside [`catch`] the previously installed hook runs as
//! usual.

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crate::fault::Fault;

/// Where a caught panic happened.
#[derive(Debug)]
pub(crate) struct PanicSite {
    pub(crate) location: Option<String>,
    pub(crate) backtrace: Backtrace,
}

static INSTALL: Once = Once::new();

thread_local! {
    static CAPTURING: Cell<bool> = const { Cell::new(false) };
    static CAUGHT: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

fn install_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if CAPTURING.with(Cell::get) {
                let site = PanicSite {
                    location: info.location().map(ToString::to_string),
                    backtrace: Backtrace::capture(),
                };
                CAUGHT.with(|caught| *caught.borrow_mut() = Some(site));
            } else {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into a runtime [`Fault`] with category `panic`.
pub(crate) fn catch<R>(f: impl FnOnce() -> R) -> Result<R, Fault> {
    install_hook();
    let outer = CAPTURING.with(|capturing| capturing.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CAPTURING.with(|capturing| capturing.set(outer));
    result.map_err(|payload| {
        let site = CAUGHT.with(|caught| caught.borrow_mut().take());
        Fault::panic(payload, site)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_pass_through() {
        assert_eq!(catch(|| 7).unwrap(), 7);
    }

    #[test]
    fn panic_records_the_site() {
        let fault = catch(|| -> u8 { panic!("kaboom") }).unwrap_err();
        assert_eq!(fault.category(), "panic");
        assert_eq!(fault.message(), "kaboom");
        let location = fault.location().unwrap();
        assert!(location.contains("unwind.rs"), "location was {}", location);
    }

    #[test]
    fn nested_catches_restore_capturing() {
        let inner = catch(|| catch(|| -> () { panic!("inner") }).unwrap_err()).unwrap();
        assert_eq!(inner.message(), "inner");
        assert!(!CAPTURING.with(Cell::get));

        let outer = catch(|| -> () { panic!("outer") }).unwrap_err();
        assert!(outer.location().is_some());
    }

    #[test]
    fn capturing_is_off_outside_catch() {
        catch(|| ()).unwrap();
        assert!(!CAPTURING.with(Cell::get));
        assert!(CAUGHT.with(|caught| caught.borrow().is_none()));
    }
}
