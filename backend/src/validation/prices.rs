//! Cross-row price consistency.
//!
//! The index lives for a single validation run: built from the data rows,
//! analyzed once, then dropped.

use std::collections::HashMap;

use super::collate::locale_cmp;

/// Distinct prices seen per lower-cased item name.
#[derive(Debug, Default)]
pub struct PriceIndex {
    prices: HashMap<String, Vec<f64>>,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation. `-0` and `0` are the same price.
    pub fn insert(&mut self, item_key: &str, price: f64) {
        let price = price + 0.0;
        let seen = self.prices.entry(item_key.to_string()).or_default();
        if !seen.contains(&price) {
            seen.push(price);
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Items with more than one distinct price, ordered by item key.
    pub fn analyze(&self, threshold: f64) -> PriceAnalysis {
        let mut items: Vec<InconsistentItem> = self
            .prices
            .iter()
            .filter(|(_, prices)| prices.len() > 1)
            .map(|(key, prices)| {
                let mut prices = prices.clone();
                prices.sort_by(f64::total_cmp);
                let significant = is_significant(&prices, threshold);
                InconsistentItem {
                    key: key.clone(),
                    prices,
                    significant,
                }
            })
            .collect();

        items.sort_by(|a, b| locale_cmp(&a.key, &b.key));

        let significance = items
            .iter()
            .map(|item| (item.key.clone(), item.significant))
            .collect();

        PriceAnalysis {
            items,
            significance,
        }
    }
}

/// `prices` must be sorted ascending.
fn is_significant(prices: &[f64], threshold: f64) -> bool {
    match (prices.first(), prices.last()) {
        (Some(&min), Some(&max)) if min > 0.0 => (max - min) / min > threshold,
        _ => false,
    }
}

/// One item sold at several prices.
#[derive(Debug, Clone, PartialEq)]
pub struct InconsistentItem {
    /// Lower-cased item name.
    pub key: String,
    /// Distinct prices, ascending.
    pub prices: Vec<f64>,
    pub significant: bool,
}

/// Result of analyzing a [`PriceIndex`].
#[derive(Debug, Clone, Default)]
pub struct PriceAnalysis {
    items: Vec<InconsistentItem>,
    /// Item key -> significant, for per-record lookups.
    significance: HashMap<String, bool>,
}

impl PriceAnalysis {
    pub fn items(&self) -> &[InconsistentItem] {
        &self.items
    }

    pub fn is_inconsistent(&self, key: &str) -> bool {
        self.significance.contains_key(key)
    }

    pub fn is_significant(&self, key: &str) -> bool {
        self.significance.get(key).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_price_is_consistent() {
        let mut index = PriceIndex::new();
        index.insert("bawang", 100.0);
        index.insert("bawang", 100.0);
        let analysis = index.analyze(0.25);
        assert!(analysis.items().is_empty());
        assert!(!analysis.is_inconsistent("bawang"));
    }

    #[test]
    fn test_significant_spread() {
        let mut index = PriceIndex::new();
        index.insert("bawang", 150.0);
        index.insert("bawang", 100.0);
        let analysis = index.analyze(0.25);
        assert_eq!(analysis.items()[0].prices, vec![100.0, 150.0]);
        assert!(analysis.is_inconsistent("bawang"));
        assert!(analysis.is_significant("bawang"));
    }

    #[test]
    fn test_minor_spread() {
        let mut index = PriceIndex::new();
        index.insert("tomat", 100.0);
        index.insert("tomat", 110.0);
        let analysis = index.analyze(0.25);
        assert!(analysis.is_inconsistent("tomat"));
        assert!(!analysis.is_significant("tomat"));
    }

    #[test]
    fn test_exact_threshold_is_not_significant() {
        let mut index = PriceIndex::new();
        index.insert("cabai", 100.0);
        index.insert("cabai", 125.0);
        assert!(!index.analyze(0.25).is_significant("cabai"));
    }

    #[test]
    fn test_non_positive_min_never_significant() {
        let mut index = PriceIndex::new();
        index.insert("gratis", 0.0);
        index.insert("gratis", 500.0);
        index.insert("retur", -10.0);
        index.insert("retur", 100.0);
        let analysis = index.analyze(0.25);
        assert!(analysis.is_inconsistent("gratis"));
        assert!(!analysis.is_significant("gratis"));
        assert!(analysis.is_inconsistent("retur"));
        assert!(!analysis.is_significant("retur"));
    }

    #[test]
    fn test_negative_zero_deduplicated() {
        let mut index = PriceIndex::new();
        index.insert("x", 0.0);
        index.insert("x", -0.0);
        assert!(index.analyze(0.25).items().is_empty());
    }

    #[test]
    fn test_lookup_across_many_items() {
        let mut index = PriceIndex::new();
        for n in 0..500 {
            let key = format!("item {n}");
            index.insert(&key, 100.0);
            // every third item drifts past the threshold, the rest slightly
            index.insert(&key, if n % 3 == 0 { 200.0 } else { 110.0 });
        }
        index.insert("stabil", 100.0);

        let analysis = index.analyze(0.25);
        assert_eq!(analysis.items().len(), 500);
        assert!(analysis.is_significant("item 0"));
        assert!(analysis.is_inconsistent("item 1"));
        assert!(!analysis.is_significant("item 1"));
        assert!(analysis.is_significant("item 498"));
        assert!(!analysis.is_inconsistent("stabil"));
        assert!(!analysis.is_significant("missing"));
    }

    #[test]
    fn test_items_ordered_by_key() {
        let mut index = PriceIndex::new();
        for key in ["wortel", "bawang", "kentang"] {
            index.insert(key, 1.0);
            index.insert(key, 2.0);
        }
        let analysis = index.analyze(0.25);
        let keys: Vec<&str> = analysis.items().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["bawang", "kentang", "wortel"]);
    }
}
