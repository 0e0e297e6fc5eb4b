mod card;
mod constants;
mod draw;
mod event;
mod pattern;
mod session;

pub use card::*;
pub use constants::*;
pub use draw::*;
pub use event::*;
pub use pattern::*;
pub use session::*;
