pub mod common;
pub mod customers;
pub mod demo;
pub mod invoice;
pub mod missing;
pub mod outstanding;
pub mod production;
