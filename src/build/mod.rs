mod clean;
mod core;

pub use self::clean::clean;
pub use self::core::{build, run};
