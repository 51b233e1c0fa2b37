pub mod cors;
pub mod fault;
