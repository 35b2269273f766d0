pub mod env;
pub mod pagination;
pub mod utils;
