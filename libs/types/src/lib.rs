//! Types library for the custodial exchange ledger
//!
//! This library provides the core type definitions shared by the ledger,
//! order store, and settlement engine, ensuring type safety and
//! deterministic integer arithmetic throughout.
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, OrderId, TokenId)
//! - `asset`: Asset identifier (native sentinel or token)
//! - `numeric`: Fixed-point integer amounts (18 implied decimals)

// Public modules
pub mod ids;
pub mod asset;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::asset::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
