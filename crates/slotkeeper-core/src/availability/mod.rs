pub mod index;
pub mod rule;

pub use index::AvailabilityIndex;
pub use rule::AvailabilityRule;
