pub mod store;
pub mod types;
pub mod util;
