//! # Cart
//!
//! The cart value type: an ordered list of (product, shop) selections.
//!
//! A cart line is a transient reference pair, not a priced item. Nothing
//! is validated at add time; resolution and pricing happen at quote and
//! checkout time in the engine, where a dangling line degrades to a
//! skipped line instead of failing the whole cart.
//!
//! There is no quantity field: adding the same product twice appends two
//! lines, each representing quantity one.

use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Line
// =============================================================================

/// A single cart selection: which product, from which shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_name: String,
    pub shop_name: String,
}

impl CartLine {
    pub fn new(product_name: impl Into<String>, shop_name: impl Into<String>) -> Self {
        CartLine {
            product_name: product_name.into(),
            shop_name: shop_name.into(),
        }
    }
}

// =============================================================================
// Clear Outcome
// =============================================================================

/// Result of clearing a cart. Clearing is idempotent; an already empty
/// cart is a status, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearOutcome {
    /// Lines were removed.
    Cleared,
    /// The cart had no lines to begin with.
    AlreadyEmpty,
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Appends a line. No existence check is performed here; the caller
    /// selects from listings it already resolved.
    pub fn add_line(&mut self, product_name: impl Into<String>, shop_name: impl Into<String>) {
        self.lines.push(CartLine::new(product_name, shop_name));
    }

    /// The lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Removes every line, reporting whether there was anything to
    /// remove.
    pub fn clear(&mut self) -> ClearOutcome {
        if self.lines.is_empty() {
            ClearOutcome::AlreadyEmpty
        } else {
            self.lines.clear();
            ClearOutcome::Cleared
        }
    }
}
