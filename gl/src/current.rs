//! per-thread "current" gl table.
//!
//! gl contexts are current on one thread at a time. this mirrors that for the function table so
//! code deep down the stack can reach it without threading a reference through everything.

use std::cell::RefCell;

use crate::libgl::{Api, Lib};

thread_local! {
    static CURRENT: RefCell<Option<Lib>> = const { RefCell::new(None) };
}

/// returns the previously current lib, if any.
pub fn make_current(lib: Lib) -> Option<Lib> {
    CURRENT.with_borrow_mut(|current| current.replace(lib))
}

pub fn take_current() -> Option<Lib> {
    CURRENT.with_borrow_mut(Option::take)
}

pub fn is_current() -> bool {
    CURRENT.with_borrow(Option::is_some)
}

/// None when nothing is current on this thread.
///
/// panics if `f` calls [`make_current`] or [`take_current`].
pub fn with_current<R>(f: impl FnOnce(&Api) -> R) -> Option<R> {
    CURRENT.with_borrow(|current| current.as_deref().map(f))
}

#[test]
fn test_current() {
    use std::thread;

    use crate::fake;

    assert!(!is_current());
    assert_eq!(with_current(|_| ()), None);

    let prev = make_current(unsafe { Lib::load_with(fake::get_proc_address) });
    assert!(prev.is_none());
    assert!(is_current());
    assert_eq!(with_current(|api| api.ClearColor.is_loaded()), Some(true));

    // other threads have their own.
    thread::spawn(|| assert!(!is_current())).join().unwrap();

    assert!(take_current().is_some());
    assert!(!is_current());
}
