pub mod catalog;
pub mod fetch;
pub mod imaging;
pub mod processor;
pub mod registry;
