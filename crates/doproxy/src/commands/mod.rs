pub mod clone;
pub mod create;
pub mod delete;
pub mod generate;
pub mod print;
pub mod reload;
