use std::ffi::{CStr, c_char, c_void};
use std::mem::{size_of, transmute_copy};
use std::ptr::NonNull;
use std::{error, fmt};

use libc::{RTLD_LAZY, RTLD_LOCAL, dlclose, dlerror, dlopen, dlsym};

#[derive(Debug)]
pub enum Error {
    Load(String),
    Lookup(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(msg) => f.write_fmt(format_args!("could not load library: {msg}")),
            Self::Lookup(msg) => f.write_fmt(format_args!("could not lookup symbol: {msg}")),
        }
    }
}

// NOTE: dlerror's string is owned by libc and is only valid until the next dl* call, copy it
// right away.
fn take_dlerror() -> Option<String> {
    let err: *const c_char = unsafe { dlerror() };
    if err.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
    }
}

pub struct DynLib(NonNull<c_void>);

impl DynLib {
    pub fn load(filename: &CStr) -> Result<Self, Error> {
        let handle = unsafe { dlopen(filename.as_ptr(), RTLD_LAZY | RTLD_LOCAL) };
        match NonNull::new(handle) {
            Some(handle) => Ok(Self(handle)),
            None => Err(Error::Load(
                take_dlerror().unwrap_or_else(|| filename.to_string_lossy().into_owned()),
            )),
        }
    }

    /// returns null if the symbol is not there. khronos loaders expect exactly this (missing
    /// entry points are not an error until somebody calls them).
    pub fn lookup_ptr(&self, name: &CStr) -> *mut c_void {
        _ = take_dlerror();
        let addr = unsafe { dlsym(self.0.as_ptr(), name.as_ptr()) };
        _ = take_dlerror();
        addr
    }

    /// F must be a function pointer type (or anything else pointer-sized).
    pub fn lookup<F: Sized>(&self, name: &CStr) -> Result<F, Error> {
        assert_eq!(size_of::<F>(), size_of::<*mut c_void>());

        _ = take_dlerror();
        let addr = unsafe { dlsym(self.0.as_ptr(), name.as_ptr()) };
        if let Some(err) = take_dlerror() {
            return Err(Error::Lookup(err));
        }
        if addr.is_null() {
            return Err(Error::Lookup(format!("{} is null", name.to_string_lossy())));
        }
        Ok(unsafe { transmute_copy(&addr) })
    }
}

impl Drop for DynLib {
    fn drop(&mut self) {
        unsafe { dlclose(self.0.as_ptr()) };
    }
}

#[macro_export]
macro_rules! opaque_struct {
    ($name:ident) => {
        #[repr(C)]
        pub struct $name {
            _data: [u8; 0],
            _marker: std::marker::PhantomData<(*mut u8, std::marker::PhantomPinned)>,
        }
    };
}

#[test]
fn test_load_missing() {
    let err = DynLib::load(c"libdefinitely-not-here.so.42").err().unwrap();
    assert!(matches!(err, Error::Load(_)));
    assert!(err.to_string().starts_with("could not load library"));
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_lookup() {
    let libc = DynLib::load(c"libc.so.6").unwrap();

    let strlen = libc
        .lookup::<unsafe extern "C" fn(*const c_char) -> usize>(c"strlen")
        .unwrap();
    assert_eq!(unsafe { strlen(c"khronos".as_ptr()) }, 7);

    assert!(!libc.lookup_ptr(c"strlen").is_null());
    assert!(libc.lookup_ptr(c"glClearColor").is_null());
    assert!(matches!(
        libc.lookup::<unsafe extern "C" fn()>(c"glClearColor"),
        Err(Error::Lookup(_))
    ));
}
