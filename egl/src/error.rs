use std::{error, fmt};

use crate::libegl::*;

/// what eglGetError reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    NotInitialized,
    BadAccess,
    BadAlloc,
    BadAttribute,
    BadConfig,
    BadContext,
    BadCurrentSurface,
    BadDisplay,
    BadMatch,
    BadNativePixmap,
    BadNativeWindow,
    BadParameter,
    BadSurface,
    ContextLost,
    Unknown(EGLint),
}

impl Error {
    /// None for SUCCESS.
    pub fn from_code(code: EGLint) -> Option<Self> {
        match code as EGLenum {
            SUCCESS => None,
            NOT_INITIALIZED => Some(Self::NotInitialized),
            BAD_ACCESS => Some(Self::BadAccess),
            BAD_ALLOC => Some(Self::BadAlloc),
            BAD_ATTRIBUTE => Some(Self::BadAttribute),
            BAD_CONFIG => Some(Self::BadConfig),
            BAD_CONTEXT => Some(Self::BadContext),
            BAD_CURRENT_SURFACE => Some(Self::BadCurrentSurface),
            BAD_DISPLAY => Some(Self::BadDisplay),
            BAD_MATCH => Some(Self::BadMatch),
            BAD_NATIVE_PIXMAP => Some(Self::BadNativePixmap),
            BAD_NATIVE_WINDOW => Some(Self::BadNativeWindow),
            BAD_PARAMETER => Some(Self::BadParameter),
            BAD_SURFACE => Some(Self::BadSurface),
            CONTEXT_LOST => Some(Self::ContextLost),
            _ => Some(Self::Unknown(code)),
        }
    }

    pub fn code(&self) -> EGLint {
        let code = match self {
            Self::NotInitialized => NOT_INITIALIZED,
            Self::BadAccess => BAD_ACCESS,
            Self::BadAlloc => BAD_ALLOC,
            Self::BadAttribute => BAD_ATTRIBUTE,
            Self::BadConfig => BAD_CONFIG,
            Self::BadContext => BAD_CONTEXT,
            Self::BadCurrentSurface => BAD_CURRENT_SURFACE,
            Self::BadDisplay => BAD_DISPLAY,
            Self::BadMatch => BAD_MATCH,
            Self::BadNativePixmap => BAD_NATIVE_PIXMAP,
            Self::BadNativeWindow => BAD_NATIVE_WINDOW,
            Self::BadParameter => BAD_PARAMETER,
            Self::BadSurface => BAD_SURFACE,
            Self::ContextLost => CONTEXT_LOST,
            Self::Unknown(code) => return *code,
        };
        code as EGLint
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotInitialized => "EGL_NOT_INITIALIZED",
            Self::BadAccess => "EGL_BAD_ACCESS",
            Self::BadAlloc => "EGL_BAD_ALLOC",
            Self::BadAttribute => "EGL_BAD_ATTRIBUTE",
            Self::BadConfig => "EGL_BAD_CONFIG",
            Self::BadContext => "EGL_BAD_CONTEXT",
            Self::BadCurrentSurface => "EGL_BAD_CURRENT_SURFACE",
            Self::BadDisplay => "EGL_BAD_DISPLAY",
            Self::BadMatch => "EGL_BAD_MATCH",
            Self::BadNativePixmap => "EGL_BAD_NATIVE_PIXMAP",
            Self::BadNativeWindow => "EGL_BAD_NATIVE_WINDOW",
            Self::BadParameter => "EGL_BAD_PARAMETER",
            Self::BadSurface => "EGL_BAD_SURFACE",
            Self::ContextLost => "EGL_CONTEXT_LOST",
            Self::Unknown(_) => "unknown egl error",
        };
        f.write_fmt(format_args!("{name} ({:#x})", self.code()))
    }
}

impl Commands {
    /// polls eglGetError once (which also resets it to SUCCESS).
    pub unsafe fn check_error(&self) -> Result<(), Error> {
        match Error::from_code(unsafe { self.GetError() }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// meant for right after a call reported failure. an implementation that failed without
    /// setting an error shows up as `Unknown(SUCCESS)`.
    pub unsafe fn last_error(&self) -> Error {
        let code = unsafe { self.GetError() };
        Error::from_code(code).unwrap_or(Error::Unknown(code))
    }
}

#[test]
fn test_from_code() {
    assert_eq!(Error::from_code(0x3000), None);
    assert_eq!(Error::from_code(0x3001), Some(Error::NotInitialized));
    assert_eq!(Error::from_code(0x3008), Some(Error::BadDisplay));
    assert_eq!(Error::from_code(0x300E), Some(Error::ContextLost));
    assert_eq!(Error::from_code(0x300F), Some(Error::Unknown(0x300F)));
    for code in 0x3001..=0x300E {
        assert_eq!(Error::from_code(code).unwrap().code(), code);
    }
    assert_eq!(Error::BadMatch.to_string(), "EGL_BAD_MATCH (0x3009)");
}

#[test]
fn test_check_error() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    assert_eq!(unsafe { api.check_error() }, Ok(()));

    fake::set_error(BAD_ALLOC as EGLint);
    assert_eq!(unsafe { api.check_error() }, Err(Error::BadAlloc));
    assert_eq!(unsafe { api.check_error() }, Ok(()));

    assert_eq!(
        unsafe { api.last_error() },
        Error::Unknown(SUCCESS as EGLint)
    );
}
