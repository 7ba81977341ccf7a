pub mod chain;
pub mod config;
pub mod corpus;
pub mod generator;
pub mod prefix;
