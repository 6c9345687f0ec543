//! Items that destructive batches must never touch

use std::collections::HashSet;

use super::core::BatchItem;

/// Attribute codes owned by the platform itself
pub const SYSTEM_ATTRIBUTE_CODES: &[&str] = &[
    "allow-auto-substitutions",
    "availability",
    "product-crosssell",
    "hide-product",
    "popularity",
    "price-list-entry-type",
    "rating",
    "product-related",
    "substitute-products",
    "substitute-variants",
    "sales-rank-long-term",
    "sales-rank-medium-term",
    "sales-rank-short-term",
    "product-upsell",
];

/// Name of the product type every catalog starts with
pub const BASE_PRODUCT_TYPE: &str = "base";

/// Case-insensitive set of protected names or codes
#[derive(Debug, Clone, Default)]
pub struct ProtectedSet {
    entries: HashSet<String>,
}

impl ProtectedSet {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn system_attributes() -> Self {
        Self::new(SYSTEM_ATTRIBUTE_CODES)
    }

    pub fn base_product_type() -> Self {
        Self::new([BASE_PRODUCT_TYPE])
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains(&value.to_lowercase())
    }

    /// Whether `item`'s protection key is in the set
    pub fn is_protected<T: BatchItem + ?Sized>(&self, item: &T) -> bool {
        item.protection_key().is_some_and(|key| self.contains(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case() {
        let base = ProtectedSet::base_product_type();
        assert!(base.contains("Base"));
        assert!(base.contains("BASE"));
        assert!(!base.contains("Basement"));
    }

    #[test]
    fn system_attributes_cover_all_codes() {
        let set = ProtectedSet::system_attributes();
        assert_eq!(set.len(), 14);
        assert!(set.contains("Rating"));
        assert!(set.contains("sales-rank-short-term"));
        assert!(!set.contains("color"));
    }
}
