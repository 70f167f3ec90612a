pub mod format;
pub mod frame;

pub use frame::{ViewState, NO_EVENTS};
