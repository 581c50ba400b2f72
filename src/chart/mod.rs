pub mod context;
pub mod dataset;
pub mod grid;
pub mod point;
pub mod scale;
pub mod snap;
pub mod validate;
