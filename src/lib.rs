pub mod assemble;
pub mod cli;
pub mod config;
pub mod export;
pub mod model;
pub mod paginate;
pub mod store;
pub mod tags;
pub mod template;
pub mod util;
