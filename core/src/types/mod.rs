//! Data types module - the record shape shared by the generator and every pathway

mod fixed;
mod location;

pub use fixed::Fixed4;
pub use location::{format_tracked_when, LocationRecord};
