pub mod builder;
pub mod catalog;
pub mod tree_model;
