pub mod delete;
pub mod wait;
