//! Customer-intake form built on the formtree engine

mod customer;

pub use customer::*;
