pub mod category;
pub mod region;
pub mod time_range;
