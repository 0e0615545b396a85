pub mod failures;
pub mod matches;
pub mod models;
pub mod pool;
