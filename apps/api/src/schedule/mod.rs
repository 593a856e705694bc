// Training schedule: hire-date orientation plus annual anniversary trainings.
// Pure date arithmetic; the reference date is always passed in.

pub mod builder;
pub mod clock;
pub mod dates;
pub mod manifest;

pub use builder::{build_schedule, TrainingEvent};
pub use clock::{Clock, SystemClock};
