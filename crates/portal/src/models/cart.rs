//! Session cart of consultation packages.

use serde::{Deserialize, Serialize};

use verified_plate_core::Money;

use crate::api::types::Package;

/// Largest quantity of a single package.
pub const MAX_QUANTITY: u32 = 99;

/// One package in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub package_id: String,
    pub title: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Packages the visitor intends to buy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of packages across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of all line totals (zero for an empty cart).
    #[must_use]
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add one unit of a package, merging with an existing line.
    pub fn add(&mut self, package: &Package) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.package_id == package.id) {
            line.quantity = (line.quantity + 1).min(MAX_QUANTITY);
            // Prices may have changed since the line was added.
            line.unit_price = package.price;
            return;
        }
        self.lines.push(CartLine {
            package_id: package.id.clone(),
            title: package.title.clone(),
            unit_price: package.price,
            quantity: 1,
        });
    }

    /// Remove a package line entirely. Returns `false` if it was not present.
    pub fn remove(&mut self, package_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.package_id != package_id);
        self.lines.len() != before
    }
}
