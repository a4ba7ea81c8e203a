//! wdbot Core - Foundational types for the wdbot workspace
//!
//! This crate provides the types every other wdbot crate depends on:
//! - `ItemId`, `PropertyId` - Validated knowledge-graph identifiers
//! - `Property` and the static property table
//! - `Claim`, `Qualifier`, `Value` - Property assertions
//! - Error types and Result alias

mod error;
mod id;
pub mod properties;
mod value;

pub use error::{Result, WdbotError};
pub use id::{parse_item_ids, ItemId, PropertyId};
pub use properties::{Cardinality, Property};
pub use value::{Claim, Qualifier, Value};
