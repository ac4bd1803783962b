use std::ffi::{CStr, c_int, c_ulong, c_void};
use std::ptr::{self, null, null_mut};
use std::rc::Rc;
use std::{array, error, fmt, ops};

use raw_window_handle as rwh;

use crate::error::Error;
use crate::libegl::*;
use crate::libwayland_egl;

// NOTE: the idea here is that Connection will hand-out handles to resources that it creates that
// need cleanup/deinitialization and you'll operate on those handles; and Connection will be
// responsible for performing cleanup.

const CAPACITY: usize = 16;

// NOTE: eglGetPlatformDisplay and eglCreatePlatformWindowSurface take EGLAttrib (pointer sized)
// lists, everything else takes EGLint ones.
fn to_egl_ints(attribs: &[EGLAttrib]) -> Vec<EGLint> {
    attribs.iter().map(|&it| it as EGLint).collect()
}

fn assert_terminated<T: PartialEq + fmt::Debug>(attribs: &[T], none: T) {
    assert_eq!(attribs.last(), Some(&none), "attrib list must end with NONE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSizeError {
    pub width: u32,
    pub height: u32,
}

impl error::Error for InvalidSizeError {}

impl fmt::Display for InvalidSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "invalid size {}x{}, both sides must fit in c_int",
            self.width, self.height
        ))
    }
}

fn c_size(width: u32, height: u32) -> Result<(c_int, c_int), InvalidSizeError> {
    match (c_int::try_from(width), c_int::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(InvalidSizeError { width, height }),
    }
}

// ----
// display

// NOTE: display lookups are expected to fail on the way down the fallback chain, so they call the
// raw slots; the checked wrappers would panic on the first miss with `debug`.
type GetPlatformDisplayFn =
    unsafe extern "system" fn(EGLenum, *mut c_void, *const EGLAttrib) -> EGLDisplay;
type GetPlatformDisplayExtFn =
    unsafe extern "system" fn(EGLenum, *mut c_void, *const EGLint) -> EGLDisplay;
type GetDisplayFn = unsafe extern "system" fn(EGLNativeDisplayType) -> EGLDisplay;

pub enum Display {
    /// eglGetPlatformDisplay
    Khr(EGLDisplay),
    /// eglGetPlatformDisplayEXT
    /// - https://registry.khronos.org/EGL/extensions/EXT/EGL_EXT_platform_base.txt
    Ext(EGLDisplay),
    /// eglGetDisplay
    /// > the set of platforms to which display_id is permitted to belong, as well as the actual
    /// type of display_id, are implementation-specific.
    /// - https://registry.khronos.org/EGL/sdk/docs/man/html/eglGetDisplay.xhtml
    Old(EGLDisplay),
}

impl ops::Deref for Display {
    type Target = EGLDisplay;

    fn deref(&self) -> &Self::Target {
        let (Self::Khr(dpy) | Self::Ext(dpy) | Self::Old(dpy)) = self;
        dpy
    }
}

impl Display {
    fn get_platform_display(
        api: &Api,
        platform: EGLenum,
        native_display: *mut c_void,
        attribs: &[EGLAttrib],
    ) -> Option<EGLDisplay> {
        if !api.GetPlatformDisplay.is_loaded() {
            return None;
        }
        let get_platform_display =
            unsafe { api.GetPlatformDisplay.cast::<GetPlatformDisplayFn>() };
        let ret = unsafe { get_platform_display(platform, native_display, attribs.as_ptr()) };
        if ret == NO_DISPLAY {
            let err = unsafe { api.last_error() };
            log::debug!("eglGetPlatformDisplay failed: {err}");
            return None;
        }
        Some(ret)
    }

    fn get_platform_display_ext(
        api: &Api,
        platform: EGLenum,
        native_display: *mut c_void,
        attribs: &[EGLint],
    ) -> Option<EGLDisplay> {
        if !api.GetPlatformDisplayEXT.is_loaded() {
            return None;
        }
        let get_platform_display_ext =
            unsafe { api.GetPlatformDisplayEXT.cast::<GetPlatformDisplayExtFn>() };
        let ret = unsafe { get_platform_display_ext(platform, native_display, attribs.as_ptr()) };
        if ret == NO_DISPLAY {
            let err = unsafe { api.last_error() };
            log::debug!("eglGetPlatformDisplayEXT failed: {err}");
            return None;
        }
        Some(ret)
    }

    fn get_display(api: &Api, native_display: *mut c_void) -> Option<EGLDisplay> {
        if !api.GetDisplay.is_loaded() {
            return None;
        }
        let get_display = unsafe { api.GetDisplay.cast::<GetDisplayFn>() };
        let ret = unsafe { get_display(native_display) };
        if ret == NO_DISPLAY {
            let err = unsafe { api.last_error() };
            log::debug!("eglGetDisplay failed: {err}");
            return None;
        }
        Some(ret)
    }

    // NOTE: KHR and EXT platform enums share values (PLATFORM_WAYLAND_KHR ==
    // PLATFORM_WAYLAND_EXT, same for x11), one platform is good for both paths.
    fn from_native_display(
        api: &Api,
        platform: EGLenum,
        native_display: *mut c_void,
        attribs: &[EGLAttrib],
    ) -> Option<Self> {
        assert_terminated(attribs, NONE as EGLAttrib);

        Self::get_platform_display(api, platform, native_display, attribs)
            .map(Self::Khr)
            .or_else(|| {
                Self::get_platform_display_ext(
                    api,
                    platform,
                    native_display,
                    &to_egl_ints(attribs),
                )
                .map(Self::Ext)
            })
            .or_else(|| Self::get_display(api, native_display).map(Self::Old))
    }

    /// wayland and xlib handles are supported. for xlib the screen goes into attribs unless
    /// attribs are given.
    pub fn from_display_handle(
        api: &Api,
        display_handle: rwh::DisplayHandle<'_>,
        attribs: Option<&[EGLAttrib]>,
    ) -> Result<Self, CreateConnectionError> {
        let default_attribs: Vec<EGLAttrib>;
        let (platform, native_display, attribs) = match display_handle.as_raw() {
            rwh::RawDisplayHandle::Wayland(handle) => {
                default_attribs = vec![NONE as EGLAttrib];
                (
                    PLATFORM_WAYLAND_KHR,
                    handle.display.as_ptr(),
                    attribs.unwrap_or(&default_attribs),
                )
            }
            rwh::RawDisplayHandle::Xlib(handle) => {
                default_attribs = vec![
                    PLATFORM_X11_SCREEN_KHR as EGLAttrib,
                    handle.screen as EGLAttrib,
                    NONE as EGLAttrib,
                ];
                (
                    PLATFORM_X11_KHR,
                    handle.display.map_or(DEFAULT_DISPLAY, |it| it.as_ptr()),
                    attribs.unwrap_or(&default_attribs),
                )
            }
            _ => return Err(CreateConnectionError::UnsupportedDisplayHandle),
        };
        Self::from_native_display(api, platform, native_display, attribs)
            .ok_or(CreateConnectionError::CouldNotGetDisplay)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Khr(_) => "eglGetPlatformDisplay",
            Self::Ext(_) => "eglGetPlatformDisplayEXT",
            Self::Old(_) => "eglGetDisplay",
        }
    }
}

// ----
// config

#[derive(Debug)]
pub enum ChooseConfigError {
    CouldNotChooseConfig(Error),
    NoMatchingConfig,
}

impl error::Error for ChooseConfigError {}

impl fmt::Display for ChooseConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotChooseConfig(err) => {
                f.write_fmt(format_args!("could not choose config: {err}"))
            }
            Self::NoMatchingConfig => f.write_str("no config matches requested attribs"),
        }
    }
}

// ----
// context

#[derive(Debug)]
pub enum CreateContextError {
    ExhaustedCapacity,
    CouldNotBindApi(Error),
    CouldNotCreateContext(Error),
}

impl error::Error for CreateContextError {}

impl fmt::Display for CreateContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExhaustedCapacity => {
                f.write_fmt(format_args!("exhausted context capacity ({CAPACITY})"))
            }
            Self::CouldNotBindApi(err) => f.write_fmt(format_args!("could not bind api: {err}")),
            Self::CouldNotCreateContext(err) => {
                f.write_fmt(format_args!("could not create context: {err}"))
            }
        }
    }
}

pub struct Context {
    index: u8,
    pub context: EGLContext,
    pub config: EGLConfig,
}

// ----
// surface

// NOTE: wsi stands for window system integration; it is somewhat modelled after
// https://registry.khronos.org/vulkan/specs/latest/html/vkspec.html#wsi

#[derive(Debug)]
pub enum CreateWaylandWsiError {
    CouldNotLoadWaylandEgl(dynlib::Error),
    CouldNotCreateWlEglWindow,
}

impl error::Error for CreateWaylandWsiError {}

impl fmt::Display for CreateWaylandWsiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotLoadWaylandEgl(err) => {
                f.write_fmt(format_args!("could not load wayland-egl: {err}"))
            }
            Self::CouldNotCreateWlEglWindow => {
                f.write_str("could not create wl egl window, make sure params are correct")
            }
        }
    }
}

struct WaylandWsi {
    lib: libwayland_egl::Lib,
    wl_egl_window: *mut libwayland_egl::wl_egl_window,
}

impl WaylandWsi {
    fn new(
        wl_surface: *mut libwayland_egl::wl_surface,
        (width, height): (c_int, c_int),
    ) -> Result<Self, CreateWaylandWsiError> {
        let lib =
            libwayland_egl::Lib::load().map_err(CreateWaylandWsiError::CouldNotLoadWaylandEgl)?;

        let wl_egl_window = unsafe { (lib.wl_egl_window_create)(wl_surface, width, height) };
        if wl_egl_window.is_null() {
            return Err(CreateWaylandWsiError::CouldNotCreateWlEglWindow);
        }

        Ok(Self { lib, wl_egl_window })
    }

    fn resize(&self, (width, height): (c_int, c_int)) {
        unsafe { (self.lib.wl_egl_window_resize)(self.wl_egl_window, width, height, 0, 0) };
    }
}

impl Drop for WaylandWsi {
    fn drop(&mut self) {
        unsafe { (self.lib.wl_egl_window_destroy)(self.wl_egl_window) };
    }
}

enum Wsi {
    Wayland(WaylandWsi),
    /// x11 Window id.
    Xlib(c_ulong),
    /// pbuffers have no native window.
    Headless,
}

impl Wsi {
    fn from_window_handle(
        window_handle: rwh::WindowHandle<'_>,
        size: (c_int, c_int),
    ) -> Result<Self, CreateSurfaceError> {
        match window_handle.as_raw() {
            rwh::RawWindowHandle::Wayland(handle) => {
                WaylandWsi::new(handle.surface.as_ptr().cast(), size)
                    .map(Self::Wayland)
                    .map_err(CreateSurfaceError::CouldNotCreateWaylandWsi)
            }
            rwh::RawWindowHandle::Xlib(handle) => Ok(Self::Xlib(handle.window)),
            _ => Err(CreateSurfaceError::UnsupportedWindowHandle),
        }
    }

    // NOTE: the platform variants of surface creation want a pointer to x11 Window,
    // eglCreateWindowSurface wants the Window itself.
    fn as_native_window(&self, display: &Display) -> *mut c_void {
        match (self, display) {
            (Self::Wayland(wayland), _) => wayland.wl_egl_window.cast(),
            (Self::Xlib(window), Display::Khr(_) | Display::Ext(_)) => {
                ptr::from_ref(window).cast_mut().cast()
            }
            (Self::Xlib(window), Display::Old(_)) => *window as *mut c_void,
            (Self::Headless, _) => null_mut(),
        }
    }

    fn resize(&self, size: (c_int, c_int)) {
        match self {
            Self::Wayland(wayland) => wayland.resize(size),
            // x server owns the size of the window.
            Self::Xlib(_) => {}
            Self::Headless => {}
        }
    }
}

#[derive(Debug)]
pub enum CreateSurfaceError {
    ExhaustedCapacity,
    InvalidSize(InvalidSizeError),
    UnsupportedWindowHandle,
    CouldNotCreateWaylandWsi(CreateWaylandWsiError),
    CouldNotCreateSurface(Error),
}

impl error::Error for CreateSurfaceError {}

impl fmt::Display for CreateSurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExhaustedCapacity => {
                f.write_fmt(format_args!("exhausted surface capacity ({CAPACITY})"))
            }
            Self::InvalidSize(err) => fmt::Display::fmt(err, f),
            Self::UnsupportedWindowHandle => f.write_str("unsupported window handle"),
            Self::CouldNotCreateWaylandWsi(err) => {
                f.write_fmt(format_args!("could not create wayland wsi: {err}"))
            }
            Self::CouldNotCreateSurface(err) => {
                f.write_fmt(format_args!("could not create surface: {err}"))
            }
        }
    }
}

/// the native window (wl_egl_window for wayland) is shared with the connection; it goes away
/// only after both the handle is dropped and the EGLSurface is destroyed.
pub struct Surface {
    index: u8,
    wsi: Rc<Wsi>,
    pub surface: EGLSurface,
    pub config: EGLConfig,
}

impl Surface {
    /// resizes the native window; no-op for xlib windows and pbuffers.
    pub fn resize(&self, width: u32, height: u32) -> Result<(), InvalidSizeError> {
        self.wsi.resize(c_size(width, height)?);
        Ok(())
    }
}

// ----
// connection

#[derive(Debug)]
pub enum CreateConnectionError {
    CouldNotLoadEgl(dynlib::Error),
    UnsupportedDisplayHandle,
    CouldNotGetDisplay,
    CouldNotInitializeDisplay(Error),
}

impl error::Error for CreateConnectionError {}

impl fmt::Display for CreateConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CouldNotLoadEgl(err) => f.write_fmt(format_args!("could not load egl: {err}")),
            Self::UnsupportedDisplayHandle => f.write_str("unsupported display handle"),
            Self::CouldNotGetDisplay => f.write_str("could not get display"),
            Self::CouldNotInitializeDisplay(err) => {
                f.write_fmt(format_args!("could not initialize display: {err}"))
            }
        }
    }
}

pub struct Connection {
    pub api: Api,
    pub display: Display,
    /// (major, minor) as reported by eglInitialize.
    pub version: (EGLint, EGLint),
    extensions: String,

    contexts: [Option<EGLContext>; CAPACITY],
    surfaces: [Option<(EGLSurface, Rc<Wsi>)>; CAPACITY],
}

impl Drop for Connection {
    fn drop(&mut self) {
        unsafe { self.api.MakeCurrent(*self.display, NO_SURFACE, NO_SURFACE, NO_CONTEXT) };

        // NOTE: wsi is dropped after its surface.
        for maybe_surface in self.surfaces.iter_mut() {
            if let Some((surface, _wsi)) = maybe_surface.take() {
                unsafe { self.api.DestroySurface(*self.display, surface) };
            }
        }

        for maybe_context in self.contexts.iter_mut() {
            if let Some(context) = maybe_context.take() {
                unsafe { self.api.DestroyContext(*self.display, context) };
            }
        }

        unsafe { self.api.Terminate(*self.display) };
        log::debug!("terminated egl display");
    }
}

impl Connection {
    pub fn from_display_handle(
        display_handle: rwh::DisplayHandle<'_>,
        attribs: Option<&[EGLAttrib]>,
    ) -> Result<Self, CreateConnectionError> {
        let api = Api::load().map_err(CreateConnectionError::CouldNotLoadEgl)?;
        Self::with_api(api, display_handle, attribs)
    }

    pub fn with_api(
        api: Api,
        display_handle: rwh::DisplayHandle<'_>,
        attribs: Option<&[EGLAttrib]>,
    ) -> Result<Self, CreateConnectionError> {
        let display = Display::from_display_handle(&api, display_handle, attribs)?;

        let mut version = (0, 0);
        if unsafe { api.Initialize(*display, &mut version.0, &mut version.1) } == FALSE {
            let err = unsafe { api.last_error() };
            return Err(CreateConnectionError::CouldNotInitializeDisplay(err));
        }
        log::info!(
            "initialized egl {}.{} (display from {})",
            version.0,
            version.1,
            display.name()
        );

        let mut this = Self {
            api,
            display,
            version,
            extensions: String::new(),
            contexts: array::from_fn(|_| None),
            surfaces: array::from_fn(|_| None),
        };
        let extensions = this
            .query_string(EXTENSIONS)
            .map(|it| it.to_string_lossy().into_owned())
            .unwrap_or_default();
        log::debug!("egl extensions: {extensions}");
        this.extensions = extensions;
        Ok(this)
    }

    /// eglQueryString for the connected display (VENDOR, VERSION, EXTENSIONS, CLIENT_APIS).
    pub fn query_string(&self, name: EGLenum) -> Result<&CStr, Error> {
        let ret = unsafe { self.api.QueryString(*self.display, name as EGLint) };
        if ret.is_null() {
            return Err(unsafe { self.api.last_error() });
        }
        Ok(unsafe { CStr::from_ptr(ret) })
    }

    /// display extensions, space separated.
    pub fn extensions(&self) -> &str {
        &self.extensions
    }

    pub fn has_extension(&self, name: &str) -> bool {
        has_extension(&self.extensions, name)
    }

    /// every config that matches attribs, best first.
    pub fn choose_configs(&self, attribs: &[EGLint]) -> Result<Vec<EGLConfig>, ChooseConfigError> {
        assert_terminated(attribs, NONE as EGLint);

        let mut num_config = 0;
        if unsafe {
            self.api
                .ChooseConfig(*self.display, attribs.as_ptr(), null_mut(), 0, &mut num_config)
        } == FALSE
        {
            let err = unsafe { self.api.last_error() };
            return Err(ChooseConfigError::CouldNotChooseConfig(err));
        }

        let mut configs = vec![null_mut(); num_config as usize];
        if unsafe {
            self.api.ChooseConfig(
                *self.display,
                attribs.as_ptr(),
                configs.as_mut_ptr(),
                num_config,
                &mut num_config,
            )
        } == FALSE
        {
            let err = unsafe { self.api.last_error() };
            return Err(ChooseConfigError::CouldNotChooseConfig(err));
        }
        configs.truncate(num_config as usize);
        Ok(configs)
    }

    pub fn choose_config(&self, attribs: &[EGLint]) -> Result<EGLConfig, ChooseConfigError> {
        self.choose_configs(attribs)?
            .first()
            .copied()
            .ok_or(ChooseConfigError::NoMatchingConfig)
    }

    pub fn get_config_attrib(
        &self,
        config: EGLConfig,
        attribute: EGLenum,
    ) -> Result<EGLint, Error> {
        let mut value = 0;
        if unsafe {
            self.api
                .GetConfigAttrib(*self.display, config, attribute as EGLint, &mut value)
        } == FALSE
        {
            return Err(unsafe { self.api.last_error() });
        }
        Ok(value)
    }

    /// NOTE: i don't care how you create your EGLConfig. EGLConfig does not need clean up.
    pub fn create_context(
        &mut self,
        api: EGLenum,
        config: EGLConfig,
        share_context: Option<&Context>,
        attribs: Option<&[EGLint]>,
    ) -> Result<Context, CreateContextError> {
        attribs.inspect(|attribs| assert_terminated(attribs, NONE as EGLint));

        let index = self
            .contexts
            .iter()
            .position(Option::is_none)
            .ok_or(CreateContextError::ExhaustedCapacity)?;

        if unsafe { self.api.BindAPI(api) } == FALSE {
            let err = unsafe { self.api.last_error() };
            return Err(CreateContextError::CouldNotBindApi(err));
        }

        let context = unsafe {
            self.api.CreateContext(
                *self.display,
                config,
                share_context.map_or(NO_CONTEXT, |c| c.context),
                attribs.map_or(null(), |attribs| attribs.as_ptr()),
            )
        };
        if context == NO_CONTEXT {
            let err = unsafe { self.api.last_error() };
            return Err(CreateContextError::CouldNotCreateContext(err));
        }

        self.contexts[index] = Some(context);
        Ok(Context {
            index: index as u8,
            context,
            config,
        })
    }

    /// panics if handle is invalid.
    pub fn destroy_context(&mut self, c: Context) {
        let context = self.contexts[c.index as usize]
            .take()
            .expect("invalid context handle");
        unsafe { self.api.DestroyContext(*self.display, context) };
    }

    fn insert_surface(
        &mut self,
        wsi: Wsi,
        config: EGLConfig,
        create: impl FnOnce(&Self, *mut c_void) -> EGLSurface,
    ) -> Result<Surface, CreateSurfaceError> {
        let index = self
            .surfaces
            .iter()
            .position(Option::is_none)
            .ok_or(CreateSurfaceError::ExhaustedCapacity)?;

        let surface = create(self, wsi.as_native_window(&self.display));
        if surface == NO_SURFACE {
            let err = unsafe { self.api.last_error() };
            return Err(CreateSurfaceError::CouldNotCreateSurface(err));
        }

        let wsi = Rc::new(wsi);
        self.surfaces[index] = Some((surface, Rc::clone(&wsi)));
        Ok(Surface {
            index: index as u8,
            wsi,
            surface,
            config,
        })
    }

    /// NOTE: i don't care how you create your EGLConfig. EGLConfig does not need clean up.
    pub fn create_window_surface(
        &mut self,
        config: EGLConfig,
        window_handle: rwh::WindowHandle<'_>,
        width: u32,
        height: u32,
        attribs: Option<&[EGLAttrib]>,
    ) -> Result<Surface, CreateSurfaceError> {
        attribs.inspect(|attribs| assert_terminated(attribs, NONE as EGLAttrib));

        if self.surfaces.iter().all(Option::is_some) {
            return Err(CreateSurfaceError::ExhaustedCapacity);
        }
        let size = c_size(width, height).map_err(CreateSurfaceError::InvalidSize)?;
        let wsi = Wsi::from_window_handle(window_handle, size)?;

        let int_attribs = attribs.map(to_egl_ints);
        self.insert_surface(wsi, config, |this, native_window| match this.display {
            Display::Khr(dpy) => unsafe {
                this.api.CreatePlatformWindowSurface(
                    dpy,
                    config,
                    native_window,
                    attribs.map_or(null(), |attribs| attribs.as_ptr()),
                )
            },
            Display::Ext(dpy) => unsafe {
                this.api.CreatePlatformWindowSurfaceEXT(
                    dpy,
                    config,
                    native_window,
                    int_attribs.as_ref().map_or(null(), |attribs| attribs.as_ptr()),
                )
            },
            Display::Old(dpy) => unsafe {
                this.api.CreateWindowSurface(
                    dpy,
                    config,
                    native_window,
                    int_attribs.as_ref().map_or(null(), |attribs| attribs.as_ptr()),
                )
            },
        })
    }

    /// offscreen surface, config must have PBUFFER_BIT in its SURFACE_TYPE.
    pub fn create_pbuffer_surface(
        &mut self,
        config: EGLConfig,
        width: u32,
        height: u32,
    ) -> Result<Surface, CreateSurfaceError> {
        let (width, height) = c_size(width, height).map_err(CreateSurfaceError::InvalidSize)?;
        let attribs = [
            WIDTH as EGLint,
            width,
            HEIGHT as EGLint,
            height,
            NONE as EGLint,
        ];
        self.insert_surface(Wsi::Headless, config, |this, _| unsafe {
            this.api
                .CreatePbufferSurface(*this.display, config, attribs.as_ptr())
        })
    }

    /// panics if handle is invalid. a surface handle that is dropped without this stays alive
    /// (together with its native window) until the connection is dropped.
    pub fn destroy_surface(&mut self, s: Surface) {
        let (surface, _wsi) = self.surfaces[s.index as usize]
            .take()
            .expect("invalid surface handle");
        unsafe { self.api.DestroySurface(*self.display, surface) };
    }

    /// binds context to the calling thread, drawing to and reading from surface. Nones release
    /// whatever is current.
    pub fn make_current(
        &self,
        surface: Option<&Surface>,
        context: Option<&Context>,
    ) -> Result<(), Error> {
        let surface = surface.map_or(NO_SURFACE, |s| s.surface);
        let context = context.map_or(NO_CONTEXT, |c| c.context);
        if unsafe { self.api.MakeCurrent(*self.display, surface, surface, context) } == FALSE {
            return Err(unsafe { self.api.last_error() });
        }
        Ok(())
    }

    pub fn swap_buffers(&self, surface: &Surface) -> Result<(), Error> {
        if unsafe { self.api.SwapBuffers(*self.display, surface.surface) } == FALSE {
            return Err(unsafe { self.api.last_error() });
        }
        Ok(())
    }

    /// applies to the surface that is current on the calling thread.
    pub fn swap_interval(&self, interval: EGLint) -> Result<(), Error> {
        if unsafe { self.api.SwapInterval(*self.display, interval) } == FALSE {
            return Err(unsafe { self.api.last_error() });
        }
        Ok(())
    }
}
