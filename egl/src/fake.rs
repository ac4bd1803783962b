// in-process stand-ins for libEGL entry points. state is per thread, so is every test.

use std::cell::{Cell, RefCell};
use std::ffi::{CStr, c_char, c_ulong, c_void};
use std::ptr::null;
use std::slice;

use crate::libegl::*;

thread_local! {
    static CALLS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static ERROR: Cell<EGLint> = const { Cell::new(SUCCESS as EGLint) };
    static NEXT_HANDLE: Cell<usize> = const { Cell::new(0x100) };
    static FAILING: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

// the one display the fake knows.
const DISPLAY: EGLDisplay = 1 as EGLDisplay;

fn record(call: String) {
    CALLS.with_borrow_mut(|calls| calls.push(call));
}

fn next_handle() -> *mut c_void {
    NEXT_HANDLE.replace(NEXT_HANDLE.get() + 1) as *mut c_void
}

pub fn take_calls() -> Vec<String> {
    CALLS.take()
}

pub fn set_error(code: EGLint) {
    ERROR.set(code);
}

/// makes the named entry point fail from now on (on this thread).
pub fn fail(name: &'static str) {
    FAILING.with_borrow_mut(|failing| failing.push(name));
}

fn failing(name: &str, code: EGLenum) -> bool {
    let fails = FAILING.with_borrow(|failing| failing.iter().any(|it| *it == name));
    if fails {
        set_error(code as EGLint);
    }
    fails
}

fn check_display(dpy: EGLDisplay) -> bool {
    if dpy != DISPLAY {
        set_error(BAD_DISPLAY as EGLint);
        return false;
    }
    true
}

// reads up to and including the terminating NONE.
fn read_attribs<T: Copy + PartialEq>(attribs: *const T, none: T) -> Vec<T> {
    let mut out = Vec::new();
    if attribs.is_null() {
        return out;
    }
    let mut cursor = attribs;
    loop {
        let value = unsafe { *cursor };
        out.push(value);
        if value == none {
            return out;
        }
        cursor = unsafe { cursor.add(1) };
    }
}

extern "system" fn get_error() -> EGLint {
    ERROR.replace(SUCCESS as EGLint)
}

extern "system" fn get_display(display_id: EGLNativeDisplayType) -> EGLDisplay {
    record(format!("eglGetDisplay({display_id:?})"));
    DISPLAY
}

extern "system" fn get_platform_display(
    platform: EGLenum,
    _native_display: *mut c_void,
    attrib_list: *const EGLAttrib,
) -> EGLDisplay {
    let attribs = read_attribs(attrib_list, NONE as EGLAttrib);
    record(format!("eglGetPlatformDisplay({platform:#x}, {attribs:?})"));
    if failing("eglGetPlatformDisplay", BAD_PARAMETER) {
        return NO_DISPLAY;
    }
    DISPLAY
}

extern "system" fn get_platform_display_ext(
    platform: EGLenum,
    _native_display: *mut c_void,
    attrib_list: *const EGLint,
) -> EGLDisplay {
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    record(format!("eglGetPlatformDisplayEXT({platform:#x}, {attribs:?})"));
    if failing("eglGetPlatformDisplayEXT", BAD_PARAMETER) {
        return NO_DISPLAY;
    }
    DISPLAY
}

extern "system" fn initialize(
    dpy: EGLDisplay,
    major: *mut EGLint,
    minor: *mut EGLint,
) -> EGLBoolean {
    record(format!("eglInitialize({dpy:?})"));
    if !check_display(dpy) {
        return FALSE;
    }
    unsafe {
        *major = 1;
        *minor = 5;
    }
    TRUE
}

extern "system" fn terminate(dpy: EGLDisplay) -> EGLBoolean {
    record(format!("eglTerminate({dpy:?})"));
    TRUE
}

extern "system" fn query_string(dpy: EGLDisplay, name: EGLint) -> *const c_char {
    if dpy == NO_DISPLAY && failing("eglQueryString", BAD_DISPLAY) {
        return null();
    }
    let ret: &CStr = match (dpy == NO_DISPLAY, name as EGLenum) {
        (true, EXTENSIONS) => c"EGL_EXT_platform_base EGL_KHR_platform_wayland",
        (false, EXTENSIONS) => c"EGL_KHR_image EGL_MESA_image_dma_buf_export",
        (false, VENDOR) => c"fake",
        (false, VERSION) => c"1.5 fake",
        _ => {
            set_error(BAD_PARAMETER as EGLint);
            return null();
        }
    };
    ret.as_ptr()
}

// two configs; asking for more than 8 bits of red gets none.
extern "system" fn choose_config(
    dpy: EGLDisplay,
    attrib_list: *const EGLint,
    configs: *mut EGLConfig,
    config_size: EGLint,
    num_config: *mut EGLint,
) -> EGLBoolean {
    if !check_display(dpy) {
        return FALSE;
    }
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    let too_red = attribs
        .chunks(2)
        .any(|pair| pair[0] == RED_SIZE as EGLint && pair.get(1).is_some_and(|v| *v > 8));
    let available: &[usize] = if too_red { &[] } else { &[0x10, 0x20] };
    let mut n = available.len();
    if !configs.is_null() {
        let configs = unsafe { slice::from_raw_parts_mut(configs, config_size as usize) };
        n = n.min(configs.len());
        for (config, id) in configs.iter_mut().zip(available) {
            *config = *id as EGLConfig;
        }
    }
    unsafe { *num_config = n as EGLint };
    TRUE
}

extern "system" fn get_config_attrib(
    dpy: EGLDisplay,
    config: EGLConfig,
    attribute: EGLint,
    value: *mut EGLint,
) -> EGLBoolean {
    if !check_display(dpy) {
        return FALSE;
    }
    match attribute as EGLenum {
        CONFIG_ID => unsafe { *value = config as usize as EGLint },
        RED_SIZE => unsafe { *value = 8 },
        _ => {
            set_error(BAD_ATTRIBUTE as EGLint);
            return FALSE;
        }
    }
    TRUE
}

extern "system" fn bind_api(api: EGLenum) -> EGLBoolean {
    record(format!("eglBindAPI({api:#x})"));
    if api != OPENGL_ES_API {
        set_error(BAD_PARAMETER as EGLint);
        return FALSE;
    }
    TRUE
}

extern "system" fn create_context(
    dpy: EGLDisplay,
    config: EGLConfig,
    share_context: EGLContext,
    attrib_list: *const EGLint,
) -> EGLContext {
    if !check_display(dpy) {
        return NO_CONTEXT;
    }
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    let context = next_handle();
    record(format!(
        "eglCreateContext({config:?}, {share_context:?}, {attribs:?}) -> {context:?}"
    ));
    context
}

extern "system" fn destroy_context(_dpy: EGLDisplay, ctx: EGLContext) -> EGLBoolean {
    record(format!("eglDestroyContext({ctx:?})"));
    TRUE
}

extern "system" fn create_pbuffer_surface(
    dpy: EGLDisplay,
    config: EGLConfig,
    attrib_list: *const EGLint,
) -> EGLSurface {
    if !check_display(dpy) {
        return NO_SURFACE;
    }
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    let surface = next_handle();
    record(format!("eglCreatePbufferSurface({config:?}, {attribs:?}) -> {surface:?}"));
    surface
}

// platform variants get a pointer to the x11 Window.
extern "system" fn create_platform_window_surface(
    dpy: EGLDisplay,
    config: EGLConfig,
    native_window: *mut c_void,
    attrib_list: *const EGLAttrib,
) -> EGLSurface {
    if !check_display(dpy) {
        return NO_SURFACE;
    }
    let window = unsafe { *native_window.cast::<c_ulong>() };
    let attribs = read_attribs(attrib_list, NONE as EGLAttrib);
    let surface = next_handle();
    record(format!(
        "eglCreatePlatformWindowSurface({config:?}, *{window:#x}, {attribs:?}) -> {surface:?}"
    ));
    surface
}

extern "system" fn create_platform_window_surface_ext(
    dpy: EGLDisplay,
    config: EGLConfig,
    native_window: *mut c_void,
    attrib_list: *const EGLint,
) -> EGLSurface {
    if !check_display(dpy) {
        return NO_SURFACE;
    }
    let window = unsafe { *native_window.cast::<c_ulong>() };
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    let surface = next_handle();
    record(format!(
        "eglCreatePlatformWindowSurfaceEXT({config:?}, *{window:#x}, {attribs:?}) -> {surface:?}"
    ));
    surface
}

extern "system" fn create_window_surface(
    dpy: EGLDisplay,
    config: EGLConfig,
    win: EGLNativeWindowType,
    attrib_list: *const EGLint,
) -> EGLSurface {
    if !check_display(dpy) {
        return NO_SURFACE;
    }
    let attribs = read_attribs(attrib_list, NONE as EGLint);
    let surface = next_handle();
    record(format!(
        "eglCreateWindowSurface({config:?}, {win:?}, {attribs:?}) -> {surface:?}"
    ));
    surface
}

extern "system" fn destroy_surface(_dpy: EGLDisplay, surface: EGLSurface) -> EGLBoolean {
    record(format!("eglDestroySurface({surface:?})"));
    TRUE
}

extern "system" fn make_current(
    _dpy: EGLDisplay,
    draw: EGLSurface,
    read: EGLSurface,
    ctx: EGLContext,
) -> EGLBoolean {
    record(format!("eglMakeCurrent({draw:?}, {read:?}, {ctx:?})"));
    TRUE
}

extern "system" fn swap_buffers(_dpy: EGLDisplay, surface: EGLSurface) -> EGLBoolean {
    record(format!("eglSwapBuffers({surface:?})"));
    TRUE
}

extern "system" fn swap_interval(_dpy: EGLDisplay, interval: EGLint) -> EGLBoolean {
    record(format!("eglSwapInterval({interval})"));
    TRUE
}

pub fn get_proc_address(name: *const c_char) -> *mut c_void {
    let name = unsafe { CStr::from_ptr(name) };
    match name.to_bytes() {
        b"eglGetError" => get_error as *mut c_void,
        b"eglGetDisplay" => get_display as *mut c_void,
        b"eglGetPlatformDisplay" => get_platform_display as *mut c_void,
        b"eglGetPlatformDisplayEXT" => get_platform_display_ext as *mut c_void,
        b"eglInitialize" => initialize as *mut c_void,
        b"eglTerminate" => terminate as *mut c_void,
        b"eglQueryString" => query_string as *mut c_void,
        b"eglChooseConfig" => choose_config as *mut c_void,
        b"eglGetConfigAttrib" => get_config_attrib as *mut c_void,
        b"eglBindAPI" => bind_api as *mut c_void,
        b"eglCreateContext" => create_context as *mut c_void,
        b"eglDestroyContext" => destroy_context as *mut c_void,
        b"eglCreatePbufferSurface" => create_pbuffer_surface as *mut c_void,
        b"eglCreatePlatformWindowSurface" => create_platform_window_surface as *mut c_void,
        b"eglCreatePlatformWindowSurfaceEXT" => {
            create_platform_window_surface_ext as *mut c_void
        }
        b"eglCreateWindowSurface" => create_window_surface as *mut c_void,
        b"eglDestroySurface" => destroy_surface as *mut c_void,
        b"eglMakeCurrent" => make_current as *mut c_void,
        b"eglSwapBuffers" => swap_buffers as *mut c_void,
        b"eglSwapInterval" => swap_interval as *mut c_void,
        _ => std::ptr::null_mut(),
    }
}
