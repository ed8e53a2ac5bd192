mod link;
mod platform;
mod preview;
mod validation;

pub use link::*;
pub use platform::*;
pub use preview::*;
pub use validation::*;
