//! Symbol rule and commission resolution for spotloop.
//!
//! Turns raw exchange metadata into the immutable `SymbolConstraints` and
//! `Commissions` used by the calculators. Resolution happens once at
//! startup; any failure is fatal because the pair is not tradeable as
//! configured.

pub mod account;
pub mod error;
pub mod symbol_rules;

pub use account::{CommissionResolver, RawAccountInfo, RawCommissionRates};
pub use error::{RegistryError, RegistryResult};
pub use symbol_rules::{
    decimal_places, parse_threshold, RawExchangeInfo, RawFilter, RawSymbolInfo,
    SymbolConstraintResolver,
};
