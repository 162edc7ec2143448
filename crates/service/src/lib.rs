pub mod clock;
pub mod collaborators;
pub mod contracts;
pub mod error;
pub mod history;
pub mod scope;
pub mod search;
pub mod seed;
pub mod stats;
pub mod sweep;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ServiceError;
pub use scope::{AccessScope, CurrentUser};
