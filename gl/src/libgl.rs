use std::ffi::CStr;
use std::ops::Deref;

use dynlib::DynLib;

mod types {
    include!(concat!(env!("OUT_DIR"), "/gles2_types_generated.rs"));
}

#[allow(non_upper_case_globals)]
mod enums {
    use super::types::*;

    include!(concat!(env!("OUT_DIR"), "/gles2_enums_generated.rs"));
}

#[allow(non_snake_case)]
mod api {
    use super::types::*;

    include!(concat!(env!("OUT_DIR"), "/gles2_api_generated.rs"));
}

/// which feature or extension brought in each constant and command.
pub mod registry {
    include!(concat!(env!("OUT_DIR"), "/gles2_registry_generated.rs"));
}

pub use api::{Api, FnPtr};
pub use enums::*;
pub use types::*;

/// [`Api`] plus the library it was resolved from, if any.
pub struct Lib {
    api: Api,
    _dynlib: Option<DynLib>,
}

impl Deref for Lib {
    type Target = Api;

    fn deref(&self) -> &Self::Target {
        &self.api
    }
}

impl Lib {
    pub fn load() -> Result<Self, dynlib::Error> {
        let dynlib =
            DynLib::load(c"libGLESv2.so").or_else(|_| DynLib::load(c"libGLESv2.so.2"))?;
        Ok(Self::from_dynlib(dynlib))
    }

    pub fn load_from(filename: &CStr) -> Result<Self, dynlib::Error> {
        DynLib::load(filename).map(Self::from_dynlib)
    }

    /// NOTE: extension entry points often can't be found with dlsym; resolve through
    /// eglGetProcAddress instead.
    pub unsafe fn load_with<F>(get_proc_address: F) -> Self
    where
        F: FnMut(*const std::ffi::c_char) -> *mut std::ffi::c_void,
    {
        Self {
            api: unsafe { Api::load_with(get_proc_address) },
            _dynlib: None,
        }
    }

    fn from_dynlib(dynlib: DynLib) -> Self {
        let api = unsafe { Api::load_with(|name| dynlib.lookup_ptr(CStr::from_ptr(name))) };
        log::debug!(
            "loaded {}: {} commands, {} enums",
            registry::FEATURE,
            registry::COMMANDS.len(),
            registry::ENUMS.len()
        );
        Self {
            api,
            _dynlib: Some(dynlib),
        }
    }
}

#[test]
fn test_constants() {
    assert_eq!(NO_ERROR, 0);
    assert_eq!(COLOR_BUFFER_BIT, 0x4000);
    assert_eq!(DEPTH_BUFFER_BIT | STENCIL_BUFFER_BIT, 0x0500);
    assert_eq!(TRIANGLES, 0x0004);
    assert_eq!(TEXTURE31, 0x84DF);
    assert_eq!(INVALID_FRAMEBUFFER_OPERATION, 0x0506);
    assert_eq!(FRAGMENT_SHADER, 0x8B30);
    assert_eq!(TRUE, 1 as GLboolean);
    assert_eq!(FALSE, 0 as GLboolean);
}

#[cfg(feature = "GL_KHR_robustness")]
#[test]
fn test_robustness_constants() {
    assert_eq!(CONTEXT_LOST_KHR, 0x0507);
    assert_eq!(LOSE_CONTEXT_ON_RESET_KHR, 0x8252);
    assert_eq!(CONTEXT_ROBUST_ACCESS_KHR, 0x90F3);
}

#[cfg(feature = "GL_EXT_texture_format_BGRA8888")]
#[test]
fn test_bgra_constant() {
    assert_eq!(BGRA_EXT, 0x80E1);
}

#[test]
fn test_registry() {
    assert_eq!(registry::API, "gles2");
    assert_eq!(registry::FEATURE, "GL_ES_VERSION_2_0");
    assert_eq!(
        registry::required_by("GL_TEXTURE_2D"),
        Some(&["GL_ES_VERSION_2_0"][..])
    );
    assert_eq!(
        registry::required_by("glDrawArrays"),
        Some(&["GL_ES_VERSION_2_0"][..])
    );
    // desktop gl only.
    assert_eq!(registry::required_by("glGetGraphicsResetStatus"), None);
    assert_eq!(registry::required_by("glBogus"), None);
}

#[cfg(feature = "GL_KHR_robustness")]
#[test]
fn test_registry_extension() {
    assert!(registry::EXTENSIONS.contains(&"GL_KHR_robustness"));
    assert_eq!(
        registry::required_by("glGetGraphicsResetStatusKHR"),
        Some(&["GL_KHR_robustness"][..])
    );
    // core and extension both want it.
    assert_eq!(
        registry::required_by("GL_NO_ERROR"),
        Some(&["GL_ES_VERSION_2_0", "GL_KHR_robustness"][..])
    );
}

#[test]
fn test_forwarding() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    fake::take_calls();

    unsafe {
        api.ClearColor(0.25, 0.5, 0.75, 1.0);
        api.Clear(COLOR_BUFFER_BIT | DEPTH_BUFFER_BIT);
    }
    assert_eq!(
        fake::take_calls(),
        ["glClearColor(0.25, 0.5, 0.75, 1)", "glClear(0x4100)"]
    );

    let first = unsafe { api.CreateShader(VERTEX_SHADER) };
    let second = unsafe { api.CreateShader(FRAGMENT_SHADER) };
    assert_ne!(first, 0);
    assert_eq!(second, first + 1);
    assert_eq!(
        fake::take_calls(),
        ["glCreateShader(0x8b31)", "glCreateShader(0x8b30)"]
    );
}

#[test]
fn test_unloaded_slot() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    assert!(api.Clear.is_loaded());
    assert!(!api.Clear.as_ptr().is_null());
    assert!(!api.Finish.is_loaded());
    assert!(api.Finish.as_ptr().is_null());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "glFinish was not loaded")]
fn test_unloaded_slot_call() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    unsafe { api.Finish() };
}

#[cfg(all(feature = "debug", debug_assertions))]
#[test]
#[should_panic(expected = "glGetIntegerv failed: 0x500")]
fn test_error_check_after_call() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    let mut value = 0;
    unsafe { api.GetIntegerv(0xdead, &mut value) };
}
