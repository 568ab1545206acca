//! References: HEAD and branch heads.

pub mod branch;
pub mod store;

pub use branch::Branch;
pub use store::RefStore;
