mod error;
mod libegl;
#[cfg(feature = "wrap")]
mod libwayland_egl;
#[cfg(feature = "wrap")]
pub mod wrap;

#[cfg(test)]
mod fake;

pub use error::Error;
pub use libegl::*;
