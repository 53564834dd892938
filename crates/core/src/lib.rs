//! Core business logic for Monedero.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `codegen` - Collision-checked random identifier generation
//! - `ledger` - Recharge/transfer planning and period validation
//! - `stats` - Time-bucketed transaction statistics

pub mod codegen;
pub mod ledger;
pub mod stats;
