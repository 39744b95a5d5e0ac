pub mod surface;
pub mod uniform_target;

pub use surface::*;
pub use uniform_target::*;
