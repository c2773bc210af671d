pub mod abi;
pub mod client;
pub mod errors;
pub mod reader;
pub mod types;

pub use client::{ReadLimits, ThrottledReader};
pub use errors::ChainError;
pub use reader::{AlloyRegistryReader, RegistryReader};
pub use types::{Petition, RegistryConfig};
