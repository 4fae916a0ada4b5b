pub mod catalog;
pub mod draws;
