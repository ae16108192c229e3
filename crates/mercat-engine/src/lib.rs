//! # mercat-engine: Registries and Checkout for Mercat
//!
//! The stateful layer of Mercat: product and shop registries routed over
//! the dual store backend, cross-registry listing operations, and the
//! cart/checkout engine.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Mercat Data Flow                             │
//! │                                                                     │
//! │  UI collaborator (prompts, menus - not this workspace)              │
//! │       │ request/response values                                     │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 mercat-engine (THIS CRATE)                    │  │
//! │  │                                                               │  │
//! │  │  CheckoutEngine ──► ProductRegistry ──┐                       │  │
//! │  │        │            ShopRegistry ─────┤                       │  │
//! │  │        │                 │            ▼                       │  │
//! │  │        │                 │     mercat-core pricing            │  │
//! │  │        ▼                 ▼                                    │  │
//! │  │  per-line final price, per-shop earnings postings             │  │
//! │  └──────────────────────────┬────────────────────────────────────┘  │
//! │                             │                                       │
//! │                             ▼                                       │
//! │  mercat-store Backend ── local JSON documents / remote HTTP store   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`products`] - the product registry
//! - [`shops`] - the shop registry and loyalty transitions
//! - [`listings`] - cross-registry catalogue operations
//! - [`checkout`] - the cart/checkout engine
//! - [`error`] - engine error type

pub mod checkout;
pub mod error;
pub mod listings;
pub mod products;
pub mod shops;

pub use checkout::{
    CartQuote, CheckoutEngine, CheckoutOutcome, CheckoutReceipt, LineOutcome, LineQuote,
    PostingOutcome, SkipReason,
};
pub use error::{EngineError, EngineResult};
pub use products::ProductRegistry;
pub use shops::{EarningsPosting, ShopRegistry};
