pub mod config;
pub mod flattened;
pub mod layer;
pub mod layered;
pub mod parallax;
