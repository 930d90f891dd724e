//! Dashboard widget statistics, derived from a company's records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Supplier};

/// Number of suppliers located in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CountryCount {
    pub country: String,
    pub count: u32,
}

/// The product highlighted on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WinningProduct {
    pub id: String,
    pub name: String,
    pub stock: i64,
    /// True when picked by the `isWinner` flag rather than by stock.
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: u32,
    pub total_suppliers: u32,
    /// Distinct supplier countries.
    pub countries_served: u32,
    /// Sorted by count descending, then country name.
    pub suppliers_by_country: Vec<CountryCount>,
    pub winning_product: Option<WinningProduct>,
    pub inventory_value: Money,
}

impl DashboardStats {
    /// Computes the widgets from the company's suppliers and products.
    ///
    /// The winner is the first product flagged `is_winner`; without a flag
    /// it falls back to the highest stock (first one wins ties).
    pub fn compute(suppliers: &[Supplier], products: &[Product]) -> Self {
        let mut by_country: BTreeMap<&str, u32> = BTreeMap::new();
        for supplier in suppliers {
            let count = by_country.entry(supplier.country.trim()).or_default();
            *count = count.saturating_add(1);
        }

        let mut suppliers_by_country: Vec<CountryCount> = by_country
            .into_iter()
            .map(|(country, count)| CountryCount {
                country: country.to_string(),
                count,
            })
            .collect();
        // BTreeMap already yields names in order; a stable sort keeps it.
        suppliers_by_country.sort_by(|a, b| b.count.cmp(&a.count));

        let winning_product = match products.iter().find(|p| p.is_winner) {
            Some(p) => Some((p, true)),
            None => products
                .iter()
                .fold(None::<&Product>, |best, p| match best {
                    Some(b) if b.stock >= p.stock => Some(b),
                    _ => Some(p),
                })
                .map(|p| (p, false)),
        }
        .map(|(p, flagged)| WinningProduct {
            id: p.id.clone(),
            name: p.name.clone(),
            stock: p.stock,
            flagged,
        });

        DashboardStats {
            total_products: clamp_count(products.len()),
            total_suppliers: clamp_count(suppliers.len()),
            countries_served: clamp_count(suppliers_by_country.len()),
            suppliers_by_country,
            winning_product,
            inventory_value: products.iter().map(Product::inventory_value).sum(),
        }
    }
}

fn clamp_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SupplierExtras;
    use crate::validation::{MAX_PRICE_CENTS, MAX_STOCK};
    use chrono::Utc;

    fn supplier(id: &str, country: &str) -> Supplier {
        Supplier {
            id: id.to_string(),
            company_id: "c1".to_string(),
            company_name: format!("{id} Ltd"),
            contact_name: "Li".to_string(),
            email: "li@x.test".to_string(),
            phone: "1".to_string(),
            country: country.to_string(),
            extras: SupplierExtras::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: &str, price_cents: i64, stock: i64, is_winner: bool) -> Product {
        Product {
            id: id.to_string(),
            company_id: "c1".to_string(),
            name: format!("Product {id}"),
            description: String::new(),
            price_cents,
            stock,
            supplier_id: "s1".to_string(),
            is_winner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_company() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.countries_served, 0);
        assert!(stats.winning_product.is_none());
        assert!(stats.inventory_value.is_zero());
    }

    #[test]
    fn test_country_histogram() {
        let suppliers = vec![
            supplier("a", "Vietnam"),
            supplier("b", "China"),
            supplier("c", "China"),
            supplier("d", "Brazil"),
        ];
        let stats = DashboardStats::compute(&suppliers, &[]);

        assert_eq!(stats.total_suppliers, 4);
        assert_eq!(stats.countries_served, 3);
        let order: Vec<(&str, u32)> = stats
            .suppliers_by_country
            .iter()
            .map(|c| (c.country.as_str(), c.count))
            .collect();
        assert_eq!(order, vec![("China", 2), ("Brazil", 1), ("Vietnam", 1)]);
    }

    #[test]
    fn test_flagged_winner_beats_stock() {
        let products = vec![
            product("p1", 100, 50, false),
            product("p2", 100, 1, true),
        ];
        let winner = DashboardStats::compute(&[], &products).winning_product.unwrap();
        assert_eq!(winner.id, "p2");
        assert!(winner.flagged);
    }

    #[test]
    fn test_stock_fallback_keeps_first_on_tie() {
        let products = vec![
            product("p1", 100, 7, false),
            product("p2", 100, 9, false),
            product("p3", 100, 9, false),
        ];
        let winner = DashboardStats::compute(&[], &products).winning_product.unwrap();
        assert_eq!(winner.id, "p2");
        assert!(!winner.flagged);
    }

    #[test]
    fn test_inventory_value() {
        let products = vec![product("p1", 1250, 4, false), product("p2", 99, 10, false)];
        let stats = DashboardStats::compute(&[], &products);
        assert_eq!(stats.inventory_value, Money::from_cents(5990));
    }

    #[test]
    fn test_inventory_value_saturates_at_max_stock() {
        let products: Vec<Product> = (0..100)
            .map(|i| product(&format!("p{i}"), MAX_PRICE_CENTS, MAX_STOCK, false))
            .collect();
        let stats = DashboardStats::compute(&[], &products);

        assert_eq!(stats.total_products, 100);
        assert_eq!(stats.inventory_value, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(3), 3);
        assert_eq!(clamp_count(u32::MAX as usize), u32::MAX);
    }
}
