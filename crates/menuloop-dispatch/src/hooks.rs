//! Hook run when the user exits.
//!
//! A session may carry one finalizer. It runs when the user selects `X`,
//! before the farewell is printed, and never on `R`. It runs at most once
//! per session: the dispatcher takes it out of the session before calling
//! it.
//!
//! Any `FnMut()` closure is a finalizer:
//!
//! ```
//! use menuloop_dispatch::Session;
//!
//! let mut session = Session::new();
//! session.set_finalizer(|| println!("saving contacts..."));
//! assert!(session.has_finalizer());
//! ```

/// Cleanup to run once before the process leaves the menu loop via `X`.
pub trait Finalize {
    /// Run the cleanup.
    fn finalize(&mut self);
}

impl<F> Finalize for F
where
    F: FnMut(),
{
    fn finalize(&mut self) {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Finalize for Counter {
        fn finalize(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn closures_are_finalizers() {
        let mut ran = false;
        {
            let mut hook = || ran = true;
            Finalize::finalize(&mut hook);
        }
        assert!(ran);
    }

    #[test]
    fn custom_finalizer() {
        let mut counter = Counter(0);
        counter.finalize();
        assert_eq!(counter.0, 1);
    }
}
