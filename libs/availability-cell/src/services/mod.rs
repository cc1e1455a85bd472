pub mod generator;
pub mod slots;
