pub mod movie;

pub use movie::{MovieSummary, TrendingEntry};
