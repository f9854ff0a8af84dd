// Entity Models
// A loaded catalogue is a collection of Startup values identified by row index

pub mod category;
pub mod startup;

pub use category::StartupCategory;
pub use startup::{clean_amount, parse_calendar_date, Startup};
