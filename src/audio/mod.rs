pub mod decode;
pub mod extremes;
pub mod spectrum;
