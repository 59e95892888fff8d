pub mod divide;
pub mod river;
pub mod watershed;

pub use divide::mark_divides;
pub use river::trace_rivers;
pub use watershed::{assign_watersheds, is_shoreline};
