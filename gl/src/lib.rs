pub mod current;
mod error;
mod libgl;
mod wrap;

#[cfg(test)]
mod fake;

pub use error::Error;
pub use libgl::*;
pub use wrap::Adapter;
