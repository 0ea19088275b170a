pub mod emoji;
pub mod font;

pub use emoji::*;
pub use font::*;
