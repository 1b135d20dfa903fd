pub mod libs;

pub use crate::libs::io::*;
