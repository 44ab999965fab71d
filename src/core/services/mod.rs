pub mod invoker;
pub mod operations;
pub mod staging;
