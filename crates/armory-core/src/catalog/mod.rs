//! Catalog definitions and their three-tier resolver.

mod definition;
mod hash;
mod memory;
pub mod mock;
mod resolver;
mod source;
mod store;

pub use definition::*;
pub use hash::*;
pub use memory::*;
pub use resolver::*;
pub use source::*;
pub use store::*;
