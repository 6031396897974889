pub mod funding;
pub mod invest;
pub mod marketplace;
pub mod notifications;
pub mod portfolio;
pub mod session;
pub mod waitlist;

pub use funding::*;
pub use invest::*;
pub use marketplace::*;
pub use notifications::*;
pub use portfolio::*;
pub use session::*;
pub use waitlist::*;
