pub mod event;
pub mod key;

pub use event::Event;
pub use key::ViewKey;
