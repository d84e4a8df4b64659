pub mod completion;
pub mod models;
