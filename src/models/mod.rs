pub mod user;
pub mod engagement;
pub mod booking;
pub mod hotel;
pub mod location;
pub mod package;
pub mod event;
pub mod culture;
pub mod review;

pub use user::*;
pub use engagement::*;
pub use booking::*;
pub use hotel::*;
pub use location::*;
pub use package::*;
pub use event::*;
pub use culture::*;
pub use review::*;
