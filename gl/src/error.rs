use std::{error, fmt};

use crate::libgl::*;

/// what glGetError reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    InvalidEnum,
    InvalidValue,
    InvalidOperation,
    OutOfMemory,
    InvalidFramebufferOperation,
    #[cfg(feature = "GL_KHR_robustness")]
    ContextLost,
    Unknown(GLenum),
}

impl Error {
    /// None for NO_ERROR.
    pub fn from_code(code: GLenum) -> Option<Self> {
        match code {
            NO_ERROR => None,
            INVALID_ENUM => Some(Self::InvalidEnum),
            INVALID_VALUE => Some(Self::InvalidValue),
            INVALID_OPERATION => Some(Self::InvalidOperation),
            OUT_OF_MEMORY => Some(Self::OutOfMemory),
            INVALID_FRAMEBUFFER_OPERATION => Some(Self::InvalidFramebufferOperation),
            #[cfg(feature = "GL_KHR_robustness")]
            CONTEXT_LOST_KHR => Some(Self::ContextLost),
            other => Some(Self::Unknown(other)),
        }
    }

    pub fn code(&self) -> GLenum {
        match self {
            Self::InvalidEnum => INVALID_ENUM,
            Self::InvalidValue => INVALID_VALUE,
            Self::InvalidOperation => INVALID_OPERATION,
            Self::OutOfMemory => OUT_OF_MEMORY,
            Self::InvalidFramebufferOperation => INVALID_FRAMEBUFFER_OPERATION,
            #[cfg(feature = "GL_KHR_robustness")]
            Self::ContextLost => CONTEXT_LOST_KHR,
            Self::Unknown(code) => *code,
        }
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidEnum => "invalid enum",
            Self::InvalidValue => "invalid value",
            Self::InvalidOperation => "invalid operation",
            Self::OutOfMemory => "out of memory",
            Self::InvalidFramebufferOperation => "invalid framebuffer operation",
            #[cfg(feature = "GL_KHR_robustness")]
            Self::ContextLost => "context lost",
            Self::Unknown(_) => "unknown error",
        };
        f.write_fmt(format_args!("{name} ({:#x})", self.code()))
    }
}

impl Api {
    /// polls glGetError once. errors queue up in gl, call it in a loop to drain them.
    pub unsafe fn check_error(&self) -> Result<(), Error> {
        match Error::from_code(unsafe { self.GetError() }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[test]
fn test_from_code() {
    assert_eq!(Error::from_code(NO_ERROR), None);
    assert_eq!(Error::from_code(0x0500), Some(Error::InvalidEnum));
    assert_eq!(Error::from_code(0x0505), Some(Error::OutOfMemory));
    assert_eq!(Error::from_code(0x0506), Some(Error::InvalidFramebufferOperation));
    assert_eq!(Error::from_code(0x1234), Some(Error::Unknown(0x1234)));
    assert_eq!(Error::InvalidValue.code(), 0x0501);
    assert_eq!(Error::InvalidOperation.to_string(), "invalid operation (0x502)");
}

#[cfg(feature = "GL_KHR_robustness")]
#[test]
fn test_context_lost() {
    assert_eq!(Error::from_code(0x0507), Some(Error::ContextLost));
    assert_eq!(Error::ContextLost.to_string(), "context lost (0x507)");
}

#[test]
fn test_check_error() {
    use crate::fake;

    let api = unsafe { Api::load_with(fake::get_proc_address) };
    assert_eq!(unsafe { api.check_error() }, Ok(()));

    fake::set_error(INVALID_VALUE);
    assert_eq!(unsafe { api.check_error() }, Err(Error::InvalidValue));
    // reading the error clears it.
    assert_eq!(unsafe { api.check_error() }, Ok(()));
}
