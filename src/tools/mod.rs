pub mod check_fixture;
pub mod search;

pub use check_fixture::*;
pub use search::*;
