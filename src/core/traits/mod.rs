pub mod parser;
pub mod runner;
