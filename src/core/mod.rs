pub mod config;
pub mod constants;
pub mod geo;
pub mod measure;
pub mod pyramid;
pub mod viewport;
