pub mod filter;
pub mod slice;
pub mod take;
