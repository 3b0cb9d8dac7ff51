//! Catalog filtering

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::products::Product;

/// Category selection for the catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,

    /// Only products whose category label matches exactly
    Only(String),
}

impl CategoryFilter {
    /// Whether `product` belongs to the selected category.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => product.category == *category,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(category: Option<String>) -> Self {
        category.map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

/// Search term and category applied together.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    search: String,
    category: CategoryFilter,
}

impl ProductFilter {
    /// Create a filter from a search term and category selection.
    pub fn new(search: impl AsRef<str>, category: CategoryFilter) -> Self {
        Self {
            search: search.as_ref().to_lowercase(),
            category,
        }
    }

    /// Whether `product` passes both the search term and the category.
    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(product)
            && (self.search.is_empty() || product.name.to_lowercase().contains(&self.search))
    }

    /// Products from `catalog` that pass the filter, in catalog order.
    pub fn apply<'a>(&self, catalog: &'a [Product]) -> Vec<&'a Product> {
        catalog.iter().filter(|product| self.matches(product)).collect()
    }
}

/// Category choices for `catalog`: [`CategoryFilter::All`] followed by each distinct
/// label in first-seen order.
pub fn categories(catalog: &[Product]) -> Vec<CategoryFilter> {
    let mut choices = vec![CategoryFilter::All];

    for product in catalog {
        let choice = CategoryFilter::Only(product.category.clone());

        if !choices.contains(&choice) {
            choices.push(choice);
        }
    }

    choices
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use crate::products::ProductId;

    use super::*;

    fn catalog() -> Vec<Product> {
        [
            (1, "Oil Filter", "Filters"),
            (2, "Drive chain", "Drive"),
            (3, "Air filter", "Filters"),
            (4, "LED headlight", "Electrical"),
            (5, "ABC brake kit", "Brakes"),
            (6, "Fabcore grip", "Accessories"),
        ]
        .into_iter()
        .map(|(id, name, category)| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: dec!(10),
            image: String::new(),
            category: category.to_string(),
            pieces_per_carton: None,
            sku: None,
        })
        .collect()
    }

    fn ids(products: &[&Product]) -> Vec<u64> {
        products.iter().map(|product| product.id.get()).collect()
    }

    #[test]
    fn empty_filter_returns_everything() {
        let catalog = catalog();

        assert_eq!(ProductFilter::default().apply(&catalog).len(), catalog.len());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let catalog = catalog();

        let filter = ProductFilter::new("abc", CategoryFilter::All);

        assert_eq!(ids(&filter.apply(&catalog)), vec![5, 6]);
    }

    #[test]
    fn category_matches_exact_label() {
        let catalog = catalog();

        let filter = ProductFilter::new("", CategoryFilter::Only("Filters".to_string()));

        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 3]);
    }

    #[test]
    fn category_label_is_case_sensitive() {
        let catalog = catalog();

        let filter = ProductFilter::new("", CategoryFilter::Only("filters".to_string()));

        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn search_and_category_combine() {
        let catalog = catalog();

        let filter = ProductFilter::new("FILTER", CategoryFilter::Only("Filters".to_string()));
        let everywhere = ProductFilter::new("FILTER", CategoryFilter::All);

        assert_eq!(ids(&filter.apply(&catalog)), vec![1, 3]);
        assert_eq!(ids(&everywhere.apply(&catalog)), vec![1, 3]);
    }

    #[test]
    fn categories_lists_all_first_then_first_seen_order() {
        let catalog = catalog();

        let labels: Vec<_> = categories(&catalog).iter().map(ToString::to_string).collect();

        assert_eq!(
            labels,
            vec!["All", "Filters", "Drive", "Electrical", "Brakes", "Accessories"]
        );
    }

    #[test]
    fn categories_of_empty_catalog_is_just_all() {
        assert_eq!(categories(&[]), vec![CategoryFilter::All]);
    }
}
