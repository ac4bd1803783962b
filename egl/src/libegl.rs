use std::ffi::{CStr, c_char, c_void};
use std::ops::Deref;
use std::ptr::null_mut;

use dynlib::DynLib;

#[allow(non_camel_case_types)]
mod types {
    include!(concat!(env!("OUT_DIR"), "/egl_types_generated.rs"));
}

#[allow(non_upper_case_globals)]
mod enums {
    use super::types::*;

    include!(concat!(env!("OUT_DIR"), "/egl_enums_generated.rs"));
}

#[allow(non_snake_case)]
mod api {
    use super::types::*;

    include!(concat!(env!("OUT_DIR"), "/egl_api_generated.rs"));
}

/// which version or extension brought in each constant and command.
pub mod registry {
    include!(concat!(env!("OUT_DIR"), "/egl_registry_generated.rs"));
}

pub use api::{Api as Commands, FnPtr};
pub use enums::*;
pub use types::*;

type GetProcAddressFn =
    unsafe extern "system" fn(*const c_char) -> __eglMustCastToProperFunctionPointerType;
type QueryStringFn = unsafe extern "system" fn(EGLDisplay, EGLint) -> *const c_char;

/// [`Commands`] plus the library they were resolved from, if any.
pub struct Api {
    api: Commands,
    _dynlib: Option<DynLib>,
}

impl Deref for Api {
    type Target = Commands;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

impl Api {
    pub fn load() -> Result<Self, dynlib::Error> {
        let dynlib = DynLib::load(c"libEGL.so").or_else(|_| DynLib::load(c"libEGL.so.1"))?;
        Self::from_dynlib(dynlib)
    }

    pub fn load_from(filename: &CStr) -> Result<Self, dynlib::Error> {
        DynLib::load(filename).and_then(Self::from_dynlib)
    }

    pub unsafe fn load_with<F>(get_proc_address: F) -> Self
    where
        F: FnMut(*const c_char) -> *mut c_void,
    {
        Self {
            api: unsafe { Commands::load_with(get_proc_address) },
            _dynlib: None,
        }
    }

    fn from_dynlib(dynlib: DynLib) -> Result<Self, dynlib::Error> {
        // NOTE: it seems like some funcs (the ones that get enabled by extensions (for example
        // EGL_KHR_image)) cannot be loaded with dlsym, but only with eglGetProcAddress. it is not
        // asked first because pre-1.5 implementations may hand out garbage for names they don't
        // know.
        let get_proc_address = dynlib.lookup::<GetProcAddressFn>(c"eglGetProcAddress")?;
        let api = unsafe {
            Commands::load_with(|name| {
                let ptr = dynlib.lookup_ptr(CStr::from_ptr(name));
                if !ptr.is_null() {
                    return ptr;
                }
                get_proc_address(name).map_or(null_mut(), |f| f as *mut c_void)
            })
        };
        log::debug!(
            "loaded {}: {} commands, {} enums",
            registry::FEATURE,
            registry::COMMANDS.len(),
            registry::ENUMS.len()
        );
        Ok(Self {
            api,
            _dynlib: Some(dynlib),
        })
    }
}

impl Commands {
    /// resolves client api (gl, gles) entry points; fits `gl::Lib::load_with`.
    pub fn get_proc_address(&self, procname: *const c_char) -> *mut c_void {
        if !self.GetProcAddress.is_loaded() {
            return null_mut();
        }
        match unsafe { self.GetProcAddress(procname) } {
            Some(f) => f as *mut c_void,
            None => null_mut(),
        }
    }

    /// client extensions (EGL_EXT_client_extensions); they decide which of the platform display
    /// paths are available. None if the implementation does not support the query.
    pub fn client_extensions(&self) -> Option<&'static str> {
        if !self.QueryString.is_loaded() {
            return None;
        }
        // NOTE: failure is an answer here, the checked wrapper would panic on it with `debug`.
        let query_string = unsafe { self.QueryString.cast::<QueryStringFn>() };
        let ret = unsafe { query_string(NO_DISPLAY, EXTENSIONS as EGLint) };
        if ret.is_null() {
            // NOTE: failed query leaves EGL_BAD_DISPLAY behind.
            _ = unsafe { self.GetError() };
            return None;
        }
        unsafe { CStr::from_ptr(ret) }.to_str().ok()
    }
}

/// whether space separated extension string contains name.
pub fn has_extension(extensions: &str, name: &str) -> bool {
    extensions.split_ascii_whitespace().any(|it| it == name)
}

#[test]
fn test_constants() {
    assert_eq!(SUCCESS, 0x3000);
    assert_eq!(NONE, 0x3038);
    assert_eq!(TRUE, 1);
    assert_eq!(FALSE, 0);
    assert_eq!(DONT_CARE, -1);
    assert!(NO_CONTEXT.is_null());
    assert!(NO_DISPLAY.is_null());
    assert!(NO_SURFACE.is_null());
    assert!(DEFAULT_DISPLAY.is_null());
    assert_eq!(FOREVER, u64::MAX);
    assert_eq!(PBUFFER_BIT | WINDOW_BIT, 0x0005);
    assert_eq!(OPENGL_ES_API, 0x30A0);
}

#[cfg(feature = "EGL_KHR_platform_wayland")]
#[test]
fn test_platform_constants() {
    assert_eq!(PLATFORM_WAYLAND_KHR, 0x31D8);
    assert_eq!(PLATFORM_WAYLAND_KHR, PLATFORM_WAYLAND_EXT);
    assert_eq!(PLATFORM_X11_KHR, 0x31D5);
}

#[test]
fn test_registry() {
    assert_eq!(registry::API, "egl");
    assert_eq!(registry::FEATURE, "EGL_VERSION_1_5");
    assert_eq!(
        registry::required_by("eglInitialize"),
        Some(&["EGL_VERSION_1_0"][..])
    );
    assert_eq!(
        registry::required_by("eglGetPlatformDisplay"),
        Some(&["EGL_VERSION_1_5"][..])
    );
    assert_eq!(registry::required_by("eglBogus"), None);
}

#[cfg(feature = "EGL_KHR_image")]
#[test]
fn test_registry_extension() {
    assert!(registry::EXTENSIONS.contains(&"EGL_KHR_image"));
    assert_eq!(
        registry::required_by("eglCreateImageKHR"),
        Some(&["EGL_KHR_image"][..])
    );
}

#[test]
fn test_has_extension() {
    const EXTENSIONS: &str = "EGL_EXT_platform_base EGL_KHR_image_base EGL_KHR_image ";
    assert!(has_extension(EXTENSIONS, "EGL_KHR_image"));
    assert!(has_extension(EXTENSIONS, "EGL_KHR_image_base"));
    assert!(!has_extension(EXTENSIONS, "EGL_KHR"));
    assert!(!has_extension("", "EGL_KHR_image"));
}

#[test]
fn test_forwarding() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    fake::take_calls();

    let mut version = (0, 0);
    let display = unsafe { api.GetDisplay(DEFAULT_DISPLAY) };
    assert_eq!(
        unsafe { api.Initialize(display, &mut version.0, &mut version.1) },
        TRUE
    );
    assert_eq!(version, (1, 5));
    assert_eq!(
        fake::take_calls(),
        ["eglGetDisplay(0x0)", "eglInitialize(0x1)"]
    );

    assert_eq!(
        api.client_extensions(),
        Some("EGL_EXT_platform_base EGL_KHR_platform_wayland")
    );
}

#[test]
fn test_unloaded_slot() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    assert!(api.Initialize.is_loaded());
    assert!(!api.WaitNative.is_loaded());
    assert!(api.WaitNative.as_ptr().is_null());
    assert!(api.get_proc_address(c"glClear".as_ptr()).is_null());
}

// also holds with `debug`: the query goes around the checked wrapper.
#[test]
fn test_client_extensions_unsupported() {
    use crate::fake;

    fake::fail("eglQueryString");
    let api = unsafe { Api::load_with(fake::get_proc_address) };
    assert_eq!(api.client_extensions(), None);
    assert_eq!(unsafe { api.check_error() }, Ok(()));

    let api = unsafe { Api::load_with(|_| null_mut()) };
    assert_eq!(api.client_extensions(), None);
}

#[cfg(all(feature = "debug", debug_assertions))]
#[test]
#[should_panic(expected = "eglQueryString failed: 0x3008")]
fn test_error_check_after_call() {
    use crate::fake;

    fake::fail("eglQueryString");
    let api = unsafe { Api::load_with(fake::get_proc_address) };
    unsafe { api.QueryString(NO_DISPLAY, EXTENSIONS as EGLint) };
}
