pub mod bridge;
pub mod error;
pub mod export;
pub mod facade;
pub mod screen;
