//! Billing and reconciliation engine. Everything here is a pure function of
//! already-normalized records; "today" is always passed in.

pub mod audit;
pub mod calendar;
pub mod customers;
pub mod cycle;
pub mod date;
pub mod merge;
pub mod normalize;
pub mod pricing;
pub mod production;
pub mod reconcile;
pub mod sample;
pub mod status;
pub mod types;
