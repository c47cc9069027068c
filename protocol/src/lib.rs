//! Interface between the memory game core and a display: input events in,
//! draw frames out, and the screen flow that connects them.

pub use error::*;
pub use event::*;
pub use frame::*;
pub use frontend::*;

mod error;
mod event;
mod frame;
mod frontend;
