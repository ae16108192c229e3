//! # mercat-core: Pure Business Logic for Mercat
//!
//! This crate is the heart of Mercat, a catalog/checkout manager for a
//! multi-shop marketplace. It contains all business rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Mercat Architecture                           │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  mercat-engine (registries)                   │  │
//! │  │   ProductRegistry ──► ShopRegistry ──► CheckoutEngine         │  │
//! │  └─────────────────────────────┬─────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │               ★ mercat-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐    │  │
//! │  │   │  types   │  │ pricing  │  │   cart   │  │ validation │    │  │
//! │  │   │ Product  │  │ sell /   │  │   Cart   │  │   rules    │    │  │
//! │  │   │  Shop    │  │ final    │  │ CartLine │  │   checks   │    │  │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └────────────┘    │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO NETWORK • NO FILE SYSTEM • PURE FUNCTIONS       │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼─────────────────────────────────┐  │
//! │  │              mercat-store (local JSON / remote HTTP)          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Shop, CatalogueEntry, Review, ...)
//! - [`pricing`] - Tax-category and business-model price computation
//! - [`cart`] - Cart value type and its bookkeeping
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Pricing Pipeline
//!
//! A catalogue (listed) price is turned into what the customer pays in two
//! composed steps, both closed over compile-time-checked enums:
//!
//! ```text
//! listed price ──► sell_price(TaxCategory) ──► final_price(BusinessModel)
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, ClearOutcome};
pub use error::{ValidationError, ValidationResult};
pub use types::{
    BusinessModel, CatalogueEntry, CustomerStatus, Product, Review, Shop, TaxCategory,
};
