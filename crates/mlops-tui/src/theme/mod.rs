//! Colors and semantic styles

pub mod palette;
pub mod styles;
