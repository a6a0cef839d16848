// Section selector: decides which parts of the reference documents a prompt
// carries, from free-text project fields.

pub mod duration;
pub mod keywords;
pub mod sections;

pub use duration::{parse_duration_seconds, SegmentPlan};
