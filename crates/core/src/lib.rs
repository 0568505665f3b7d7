//! Ledger posting & settlement engine for Saldo.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Persistence, segregation-of-duties authorization, and audit
//! delivery are consumed through injected lookups and traits.
//!
//! # Modules
//!
//! - `account` - Chart of accounts domain types
//! - `posting` - Journal posting validation (double-entry invariants, SoD)
//! - `fx` - Foreign exchange policy and conversion
//! - `payment` - Payment / settlement processing into balanced journals
//! - `advance` - Advance/prepayment sub-ledger
//! - `consolidation` - Multi-entity consolidation engine
//! - `reports` - Trial balance, balance sheet, P&L, cash flow
//! - `audit` - Structured audit event sink
//! - `repository` - Persistence port consumed by the engine

pub mod account;
pub mod advance;
pub mod audit;
pub mod consolidation;
pub mod fx;
pub mod payment;
pub mod posting;
pub mod reports;
pub mod repository;
