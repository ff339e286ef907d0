//! Access-control policies.
//!
//! Pure predicate functions composed explicitly at each handler entry.
//! The viewer and the clock are always passed in; nothing here reads
//! ambient request state.

mod ownership;
mod visibility;

pub use ownership::can_modify;
pub use visibility::{is_visible, visible_to_public};
