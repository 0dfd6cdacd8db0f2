pub mod cache;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod rt;
pub mod series;
pub mod stats;
