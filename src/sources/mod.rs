pub mod category;
pub mod fetch;
