pub mod accumulator;
pub mod loader;
pub mod writer;
