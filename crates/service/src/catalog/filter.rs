use common::pagination::{paginate, Page, Pagination};
use models::Product;

/// Storefront listing filters. Empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogQuery {
    /// Case-insensitive substring over name, brand and category.
    pub search: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Selected categories; empty means all.
    pub categories: Vec<String>,
}

impl CatalogQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self { search: term.into(), ..Self::default() }
    }

    /// Select the category if absent, deselect it if present.
    pub fn toggle_category(&mut self, category: &str) {
        match self.categories.iter().position(|c| c.eq_ignore_ascii_case(category)) {
            Some(idx) => {
                self.categories.remove(idx);
            }
            None => self.categories.push(category.to_string()),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search.trim().to_lowercase();
        let matches_search = term.is_empty()
            || product.name.to_lowercase().contains(&term)
            || product.brand.to_lowercase().contains(&term)
            || product.category.to_lowercase().contains(&term);

        let matches_price = self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max);

        let matches_category = self.categories.is_empty()
            || self.categories.iter().any(|c| c.eq_ignore_ascii_case(&product.category));

        matches_search && matches_price && matches_category
    }
}

pub fn filter_products<'a>(products: &'a [Product], query: &CatalogQuery) -> Vec<&'a Product> {
    products.iter().filter(|p| query.matches(p)).collect()
}

/// Filter, then cut out one page.
pub fn browse(products: &[Product], query: &CatalogQuery, page: Pagination) -> Page<Product> {
    let filtered: Vec<Product> = filter_products(products, query).into_iter().cloned().collect();
    paginate(&filtered, page)
}

/// Distinct categories in listing order, for the filter sidebar.
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for p in products {
        if !p.category.is_empty() && !seen.iter().any(|c| c.eq_ignore_ascii_case(&p.category)) {
            seen.push(p.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, brand: &str, price: f64) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: category.into(),
            brand: brand.into(),
            images: String::new(),
            variants: vec![],
            price,
            moq: 1,
            stock: 10,
            in_stock: true,
            created_by: None,
        }
    }

    fn listing() -> Vec<Product> {
        vec![
            product("1", "Cooking Oil 5L", "Grocery", "Mezan", 1200.0),
            product("2", "Fairness Cream 50g", "Beauty", "Fair & Lovely", 350.0),
            product("3", "Basmati Rice 10kg", "Grocery", "Super Kernel", 2800.0),
            product("4", "Shampoo 400ml", "Beauty", "Head & Shoulders", 450.0),
            product("5", "Sugar 50kg Bag", "Grocery", "Local", 4500.0),
            product("6", "Face Wash 100ml", "Beauty", "Neutrogena", 280.0),
            product("7", "Tea 1kg", "Grocery", "Tapal", 5200.0),
        ]
    }

    #[test]
    fn search_covers_name_brand_and_category() {
        let items = listing();
        let ids = |q: &CatalogQuery| filter_products(&items, q).iter().map(|p| p.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&CatalogQuery::search("RICE")), vec!["3"]);
        assert_eq!(ids(&CatalogQuery::search("neutro")), vec!["6"]);
        assert_eq!(ids(&CatalogQuery::search("beauty")), vec!["2", "4", "6"]);
    }

    #[test]
    fn price_range_is_inclusive() {
        let items = listing();
        let q = CatalogQuery { min_price: Some(350.0), max_price: Some(1200.0), ..CatalogQuery::default() };
        let ids: Vec<_> = filter_products(&items, &q).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn toggling_categories_narrows_and_restores() {
        let items = listing();
        let mut q = CatalogQuery::default();
        q.toggle_category("Beauty");
        assert_eq!(filter_products(&items, &q).len(), 3);
        q.toggle_category("beauty");
        assert!(q.categories.is_empty());
        assert_eq!(filter_products(&items, &q).len(), 7);
    }

    #[test]
    fn browse_pages_filtered_results() {
        let items = listing();
        let page = browse(&items, &CatalogQuery::default(), Pagination::new(2, 6));
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "7");
    }

    #[test]
    fn categories_are_distinct_in_order() {
        assert_eq!(categories(&listing()), vec!["Grocery".to_string(), "Beauty".to_string()]);
    }
}
