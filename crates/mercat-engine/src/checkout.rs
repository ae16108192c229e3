//! # Cart / Checkout Engine
//!
//! Aggregates (product, shop) selections across shops, prices them
//! through the tax/discount composition, and on confirmed checkout
//! posts earnings back to the owning shops.
//!
//! ## Checkout Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      checkout(confirmed=true)                       │
//! │                                                                     │
//! │  1. re-resolve and price every cart line                            │
//! │       dangling line ──► skipped (still reported), contributes 0     │
//! │  2. batch per-shop totals, first-appearance order                   │
//! │  3. ONE add_earnings per shop with its summed amount                │
//! │       loyalty transition evaluated after the batch is applied       │
//! │       a failed posting is isolated: others still post               │
//! │  4. clear the cart unconditionally                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `checkout(false)` changes nothing. Pricing always goes through the
//! shop's discount policy; REGULAR status decorates the line for
//! messaging and never changes the arithmetic.

use serde::Serialize;
use tracing::{info, warn};

use mercat_core::pricing::final_price;
use mercat_core::types::same_name;
use mercat_core::{Cart, ClearOutcome};

use crate::error::EngineResult;
use crate::products::ProductRegistry;
use crate::shops::{EarningsPosting, ShopRegistry};

// =============================================================================
// Quote Types
// =============================================================================

/// Why a cart line could not be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The product no longer exists in the registry.
    ProductNotFound,
    /// The shop no longer exists in the registry.
    ShopNotFound,
    /// The shop exists but its catalogue has no entry for the product
    /// (e.g. the entry was removed after the line was added).
    NotListed,
}

/// Outcome of pricing one cart line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOutcome {
    /// The line was priced through tax + discount composition.
    Priced {
        final_price: f64,
        /// Whether the shop's customers currently hold REGULAR status.
        /// Messaging only; the price is computed the same either way.
        regular: bool,
    },
    /// The line is dangling and contributes nothing to the total. It is
    /// still reported so the caller can display it as skipped.
    Skipped { reason: SkipReason },
}

/// One cart line with its pricing outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineQuote {
    pub product_name: String,
    pub shop_name: String,
    pub outcome: LineOutcome,
}

/// A fully priced cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<LineQuote>,
    /// Sum of the priced lines; skipped lines contribute nothing.
    pub total: f64,
}

impl CartQuote {
    /// Number of lines that could not be priced.
    pub fn skipped_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| matches!(line.outcome, LineOutcome::Skipped { .. }))
            .count()
    }
}

// =============================================================================
// Checkout Types
// =============================================================================

/// Outcome of one per-shop earnings posting during checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingOutcome {
    /// Earnings were posted and the loyalty transition evaluated.
    Posted(EarningsPosting),
    /// The posting failed. Postings already made for other shops are
    /// not rolled back, and the cart is still cleared.
    Failed {
        shop_name: String,
        amount: f64,
        error: String,
    },
}

/// Receipt of a confirmed checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// The per-line prices the checkout was computed from.
    pub lines: Vec<LineQuote>,
    pub total: f64,
    /// Per-shop postings in first-appearance order of the cart lines.
    pub postings: Vec<PostingOutcome>,
    /// The unconditional cart clear that ends every confirmed checkout.
    pub clear: ClearOutcome,
}

/// Result of a checkout request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Not confirmed: no state changed, the cart keeps its lines.
    Cancelled,
    /// Confirmed: earnings posted and cart cleared.
    Completed(CheckoutReceipt),
}

// =============================================================================
// Checkout Engine
// =============================================================================

/// The cart/checkout engine. Holds the transient cart; all durable
/// state lives in the registries.
#[derive(Debug, Default)]
pub struct CheckoutEngine {
    cart: Cart,
}

impl CheckoutEngine {
    pub fn new() -> Self {
        CheckoutEngine { cart: Cart::new() }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Appends a cart line. The pair is not validated here; selection
    /// happened against listings the caller already resolved, and a
    /// line gone stale by checkout time degrades to a skipped line.
    pub fn add_line(&mut self, product_name: &str, shop_name: &str) {
        self.cart.add_line(product_name, shop_name);
    }

    /// Empties the cart. Idempotent; reports "already empty" as a
    /// status.
    pub fn clear(&mut self) -> ClearOutcome {
        self.cart.clear()
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    /// Prices every cart line against the current registries.
    ///
    /// Both collections are snapshotted once, so a quote never mixes
    /// reads from different backend resolutions. Lines whose product,
    /// shop or catalogue entry cannot be resolved are reported as
    /// skipped and contribute nothing to the total.
    pub async fn quote(
        &self,
        products: &ProductRegistry,
        shops: &ShopRegistry,
    ) -> EngineResult<CartQuote> {
        let all_products = products.list().await?;
        let all_shops = shops.list().await?;

        let mut lines = Vec::with_capacity(self.cart.len());
        let mut total = 0.0;

        for line in self.cart.lines() {
            let product = all_products.iter().find(|p| p.is_named(&line.product_name));
            let shop = all_shops.iter().find(|s| s.is_named(&line.shop_name));

            let outcome = match (product, shop) {
                (None, _) => LineOutcome::Skipped {
                    reason: SkipReason::ProductNotFound,
                },
                (_, None) => LineOutcome::Skipped {
                    reason: SkipReason::ShopNotFound,
                },
                (Some(product), Some(shop)) => match shop.price_at(&product.name) {
                    None => LineOutcome::Skipped {
                        reason: SkipReason::NotListed,
                    },
                    Some(listed) => {
                        let price = final_price(listed, product, &shop.business_model);
                        total += price;
                        LineOutcome::Priced {
                            final_price: price,
                            regular: shop.customer_status().is_regular(),
                        }
                    }
                },
            };

            lines.push(LineQuote {
                product_name: line.product_name.clone(),
                shop_name: line.shop_name.clone(),
                outcome,
            });
        }

        Ok(CartQuote { lines, total })
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Runs a checkout.
    ///
    /// Unconfirmed requests change nothing. Confirmed requests recompute
    /// every line, post ONE batched earnings amount per shop (so the
    /// loyalty transition is evaluated once per shop per checkout), and
    /// clear the cart unconditionally, even when the cart was empty or
    /// some postings failed.
    pub async fn checkout(
        &mut self,
        confirmed: bool,
        products: &ProductRegistry,
        shops: &mut ShopRegistry,
    ) -> EngineResult<CheckoutOutcome> {
        if !confirmed {
            info!("checkout cancelled, cart unchanged");
            return Ok(CheckoutOutcome::Cancelled);
        }

        let quote = self.quote(products, shops).await?;

        // Batch per-shop totals in first-appearance order of the lines.
        let mut batches: Vec<(String, f64)> = Vec::new();
        for line in &quote.lines {
            if let LineOutcome::Priced { final_price, .. } = line.outcome {
                match batches
                    .iter_mut()
                    .find(|(shop, _)| same_name(shop, &line.shop_name))
                {
                    Some((_, amount)) => *amount += final_price,
                    None => batches.push((line.shop_name.clone(), final_price)),
                }
            }
        }

        let mut postings = Vec::with_capacity(batches.len());
        for (shop_name, amount) in batches {
            match shops.add_earnings(&shop_name, amount).await {
                Ok(posting) => {
                    info!(
                        shop = %posting.shop_name,
                        amount,
                        total = posting.total_earnings,
                        "earnings posted"
                    );
                    postings.push(PostingOutcome::Posted(posting));
                }
                Err(err) => {
                    // Isolated per shop: other postings proceed.
                    warn!(shop = %shop_name, amount, error = %err, "earnings posting failed");
                    postings.push(PostingOutcome::Failed {
                        shop_name,
                        amount,
                        error: err.to_string(),
                    });
                }
            }
        }

        let clear = self.cart.clear();
        Ok(CheckoutOutcome::Completed(CheckoutReceipt {
            lines: quote.lines,
            total: quote.total,
            postings,
            clear,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::expand_catalogue;
    use mercat_store::{Backend, LocalStore};

    const EPS: f64 = 1e-9;

    /// One local-mode world: a loyalty shop (threshold 250) and a
    /// sponsored shop, selling super-reduced products so listed prices
    /// at or above 100 pass through pricing unchanged.
    async fn world() -> (tempfile::TempDir, ProductRegistry, ShopRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.save_products(&[]).await.unwrap();
        let mut products = ProductRegistry::open(Backend::local_only(store.clone()))
            .await
            .unwrap();
        let mut shops = ShopRegistry::open(Backend::local_only(store)).await.unwrap();

        products
            .create("Ham", "Casa Riera", 300.0, "SUPER_REDUCED", 0.0)
            .await
            .unwrap();
        products
            .create("Cheese", "Casa Riera", 200.0, "SUPER_REDUCED", 0.0)
            .await
            .unwrap();

        shops
            .create("Can Petra", "corner store", 1987, "LOYALTY", 250.0, None)
            .await
            .unwrap();
        shops
            .create(
                "Mercat Vell",
                "market hall",
                1874,
                "SPONSORED",
                0.0,
                Some("Casa Riera"),
            )
            .await
            .unwrap();

        expand_catalogue(&products, &mut shops, "Can Petra", "Ham", 150.0)
            .await
            .unwrap();
        expand_catalogue(&products, &mut shops, "Can Petra", "Cheese", 120.0)
            .await
            .unwrap();
        expand_catalogue(&products, &mut shops, "Mercat Vell", "Ham", 100.0)
            .await
            .unwrap();

        (dir, products, shops)
    }

    #[tokio::test]
    async fn test_quote_prices_and_reports_skips() {
        let (_dir, products, shops) = world().await;
        let mut engine = CheckoutEngine::new();
        engine.add_line("Ham", "Can Petra");
        engine.add_line("Ham", "Mercat Vell"); // sponsored brand match
        engine.add_line("Cheese", "Mercat Vell"); // not listed there
        engine.add_line("Bread", "Can Petra"); // no such product
        engine.add_line("Ham", "Nowhere"); // no such shop

        let quote = engine.quote(&products, &shops).await.unwrap();
        assert_eq!(quote.lines.len(), 5);
        assert_eq!(quote.skipped_count(), 3);

        // 150 (loyalty, super-reduced >= 100) + 100 * 0.9 (sponsor match).
        assert!((quote.total - 240.0).abs() < EPS);
        assert_eq!(
            quote.lines[0].outcome,
            LineOutcome::Priced {
                final_price: 150.0,
                regular: false
            }
        );
        assert_eq!(
            quote.lines[1].outcome,
            LineOutcome::Priced {
                final_price: 90.0,
                regular: false
            }
        );
        assert_eq!(
            quote.lines[2].outcome,
            LineOutcome::Skipped {
                reason: SkipReason::NotListed
            }
        );
        assert_eq!(
            quote.lines[3].outcome,
            LineOutcome::Skipped {
                reason: SkipReason::ProductNotFound
            }
        );
        assert_eq!(
            quote.lines[4].outcome,
            LineOutcome::Skipped {
                reason: SkipReason::ShopNotFound
            }
        );
    }

    #[tokio::test]
    async fn test_unconfirmed_checkout_changes_nothing() {
        let (_dir, products, mut shops) = world().await;
        let mut engine = CheckoutEngine::new();
        engine.add_line("Ham", "Can Petra");

        let outcome = engine.checkout(false, &products, &mut shops).await.unwrap();
        assert_eq!(outcome, CheckoutOutcome::Cancelled);
        assert_eq!(engine.cart().len(), 1);

        let shop = shops.find_by_name("Can Petra").await.unwrap().unwrap();
        assert_eq!(shop.earnings, 0.0);
    }

    #[tokio::test]
    async fn test_confirmed_checkout_batches_earnings_per_shop() {
        let (_dir, products, mut shops) = world().await;
        let mut engine = CheckoutEngine::new();
        // Two lines for Can Petra, one for Mercat Vell, interleaved.
        engine.add_line("Ham", "Can Petra");
        engine.add_line("Ham", "Mercat Vell");
        engine.add_line("Cheese", "can petra");

        let outcome = engine.checkout(true, &products, &mut shops).await.unwrap();
        let CheckoutOutcome::Completed(receipt) = outcome else {
            panic!("expected a completed checkout");
        };

        // One posting per shop, first-appearance order, summed amounts.
        assert_eq!(receipt.postings.len(), 2);
        let PostingOutcome::Posted(first) = &receipt.postings[0] else {
            panic!("expected a successful posting");
        };
        assert_eq!(first.shop_name, "Can Petra");
        assert!((first.amount - 270.0).abs() < EPS);
        assert!((first.total_earnings - 270.0).abs() < EPS);
        // 270 crosses the 250 threshold in a single batch: exactly one
        // transition event.
        assert!(first.newly_regular);

        let PostingOutcome::Posted(second) = &receipt.postings[1] else {
            panic!("expected a successful posting");
        };
        assert_eq!(second.shop_name, "Mercat Vell");
        assert!((second.amount - 90.0).abs() < EPS);
        assert!(!second.newly_regular);

        // The cart is cleared unconditionally.
        assert_eq!(receipt.clear, ClearOutcome::Cleared);
        assert!(engine.cart().is_empty());

        // Earnings are durable.
        let shop = shops.find_by_name("Can Petra").await.unwrap().unwrap();
        assert!((shop.earnings - 270.0).abs() < EPS);
    }

    #[tokio::test]
    async fn test_regular_status_survives_later_checkouts() {
        let (_dir, products, mut shops) = world().await;
        let mut engine = CheckoutEngine::new();
        engine.add_line("Ham", "Can Petra");
        engine.add_line("Cheese", "Can Petra");
        engine.checkout(true, &products, &mut shops).await.unwrap();

        // Now regular; the next quote decorates lines accordingly and a
        // further checkout reports no new transition.
        engine.add_line("Ham", "Can Petra");
        let quote = engine.quote(&products, &shops).await.unwrap();
        assert_eq!(
            quote.lines[0].outcome,
            LineOutcome::Priced {
                final_price: 150.0,
                regular: true
            }
        );

        let outcome = engine.checkout(true, &products, &mut shops).await.unwrap();
        let CheckoutOutcome::Completed(receipt) = outcome else {
            panic!("expected a completed checkout");
        };
        let PostingOutcome::Posted(posting) = &receipt.postings[0] else {
            panic!("expected a successful posting");
        };
        assert!(!posting.newly_regular);
        assert!((posting.total_earnings - 420.0).abs() < EPS);
    }

    #[tokio::test]
    async fn test_checkout_on_empty_cart_is_a_noop_that_still_clears() {
        let (_dir, products, mut shops) = world().await;
        let mut engine = CheckoutEngine::new();

        let outcome = engine.checkout(true, &products, &mut shops).await.unwrap();
        let CheckoutOutcome::Completed(receipt) = outcome else {
            panic!("expected a completed checkout");
        };
        assert!(receipt.postings.is_empty());
        assert_eq!(receipt.total, 0.0);
        assert_eq!(receipt.clear, ClearOutcome::AlreadyEmpty);
    }

    #[tokio::test]
    async fn test_dangling_lines_do_not_post_earnings() {
        let (_dir, mut products, mut shops) = world().await;
        let mut engine = CheckoutEngine::new();
        engine.add_line("Cheese", "Mercat Vell"); // not listed there

        // Withdraw a product whose line is still in the cart.
        engine.add_line("Ham", "Mercat Vell");
        products.remove("Ham").await.unwrap();

        let outcome = engine.checkout(true, &products, &mut shops).await.unwrap();
        let CheckoutOutcome::Completed(receipt) = outcome else {
            panic!("expected a completed checkout");
        };
        assert!(receipt.postings.is_empty());
        assert_eq!(receipt.total, 0.0);
        assert_eq!(receipt.clear, ClearOutcome::Cleared);

        let shop = shops.find_by_name("Mercat Vell").await.unwrap().unwrap();
        assert_eq!(shop.earnings, 0.0);
    }
}
