pub mod cli;
pub mod cliques;
pub mod compare;
pub mod config;
pub mod error;
pub mod metric;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod specials;
pub mod types;
