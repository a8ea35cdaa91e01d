pub mod cart;
pub mod model;
pub mod payments;
pub mod requests;
pub mod schedule;
