//! Pure cart state transitions.
//!
//! `reduce` never touches storage and never fails: out-of-range quantities are
//! clamped to stock, unknown ids and non-positive additions are no-ops.

use models::{CartLine, PersistedCart, ProductDescriptor};

/// In-memory cart snapshot. Totals are private and only ever recomputed from
/// the lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CartState {
    items: Vec<CartLine>,
    total_items: u64,
    total_price: f64,
    is_open: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    Add { product: ProductDescriptor, quantity: i64 },
    Remove { product_id: String },
    UpdateQuantity { product_id: String, quantity: i64 },
    Clear,
    Toggle,
}

/// What a transition actually did.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Line inserted or merged; `quantity` is the line's resulting quantity.
    Added { product_id: String, requested: i64, quantity: u32, clamped: bool },
    Updated { product_id: String, requested: i64, quantity: u32, clamped: bool },
    Removed { product_id: String },
    Cleared,
    Toggled { open: bool },
    Unchanged,
}

impl Outcome {
    /// Whether the requested quantity was cut down to stock.
    pub fn clamped(&self) -> bool {
        matches!(self, Outcome::Added { clamped: true, .. } | Outcome::Updated { clamped: true, .. })
    }

    /// Whether the persisted part of the state changed.
    pub fn touches_items(&self) -> bool {
        !matches!(self, Outcome::Toggled { .. } | Outcome::Unchanged)
    }
}

impl CartState {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[CartLine] { &self.items }

    pub fn total_items(&self) -> u64 { self.total_items }

    pub fn total_price(&self) -> f64 { self.total_price }

    pub fn is_open(&self) -> bool { self.is_open }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn get(&self, product_id: &str) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id() == product_id)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|line| line.id() == product_id)
    }

    fn recompute_totals(&mut self) {
        self.total_items = self.items.iter().map(|line| line.quantity as u64).sum();
        self.total_price = self.items.iter().map(CartLine::line_total).sum();
    }

    /// Rebuild from a stored record. Stored totals are ignored; lines are
    /// deduplicated by id and clamped into `1..=stock`, empty ones dropped.
    pub fn from_persisted(record: PersistedCart) -> Self {
        let mut state = CartState::new();
        for line in record.items {
            let quantity = line.quantity.min(line.stock());
            if quantity == 0 {
                continue;
            }
            match state.position(line.id()) {
                Some(idx) => {
                    let existing = &mut state.items[idx];
                    existing.quantity = existing.quantity.saturating_add(quantity).min(existing.stock());
                }
                None => state.items.push(CartLine { quantity, ..line }),
            }
        }
        state.recompute_totals();
        state
    }

    pub fn to_persisted(&self) -> PersistedCart {
        PersistedCart { items: self.items.clone(), total_items: self.total_items, total_price: self.total_price }
    }
}

/// Apply one action to a snapshot and return the next snapshot.
pub fn reduce(state: &CartState, action: CartAction) -> (CartState, Outcome) {
    let mut next = state.clone();
    let outcome = match action {
        CartAction::Add { product, quantity } => add(&mut next, product, quantity),
        CartAction::Remove { product_id } => remove(&mut next, product_id),
        CartAction::UpdateQuantity { product_id, quantity } => update_quantity(&mut next, product_id, quantity),
        CartAction::Clear => {
            next.items.clear();
            Outcome::Cleared
        }
        CartAction::Toggle => {
            next.is_open = !next.is_open;
            Outcome::Toggled { open: next.is_open }
        }
    };
    next.recompute_totals();
    (next, outcome)
}

/// `requested` saturated into `u32` range; callers already filtered `<= 0`.
fn as_quantity(requested: i64) -> u32 {
    u32::try_from(requested).unwrap_or(u32::MAX)
}

fn add(state: &mut CartState, product: ProductDescriptor, requested: i64) -> Outcome {
    if requested <= 0 {
        return Outcome::Unchanged;
    }
    let stock = product.stock;
    let product_id = product.id.clone();
    match state.position(&product_id) {
        Some(idx) => {
            let wanted = (state.items[idx].quantity as u64).saturating_add(requested as u64);
            let quantity = wanted.min(stock as u64) as u32;
            if quantity == 0 {
                state.items.remove(idx);
                return Outcome::Removed { product_id };
            }
            let line = &mut state.items[idx];
            // Only stock is taken from the incoming descriptor so the clamp
            // holds; price, name and variant stay as first added.
            line.product.stock = stock;
            line.quantity = quantity;
            Outcome::Added { product_id, requested, quantity, clamped: (quantity as u64) < wanted }
        }
        None => {
            let quantity = as_quantity(requested).min(stock);
            if quantity == 0 {
                return Outcome::Unchanged;
            }
            let clamped = (quantity as i64) < requested;
            state.items.push(CartLine { product, quantity });
            Outcome::Added { product_id, requested, quantity, clamped }
        }
    }
}

fn remove(state: &mut CartState, product_id: String) -> Outcome {
    match state.position(&product_id) {
        Some(idx) => {
            state.items.remove(idx);
            Outcome::Removed { product_id }
        }
        None => Outcome::Unchanged,
    }
}

fn update_quantity(state: &mut CartState, product_id: String, requested: i64) -> Outcome {
    if requested <= 0 {
        return remove(state, product_id);
    }
    let Some(idx) = state.position(&product_id) else {
        return Outcome::Unchanged;
    };
    let line = &mut state.items[idx];
    let quantity = as_quantity(requested).min(line.stock());
    line.quantity = quantity;
    Outcome::Updated { product_id, requested, quantity, clamped: (quantity as i64) < requested }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oil() -> ProductDescriptor {
        ProductDescriptor {
            category: "Grocery".into(),
            brand: "Mezan".into(),
            moq: 5,
            selected_variant: Some("5L".into()),
            ..ProductDescriptor::new("p1", "Cooking Oil 5L", 1450.0, 5)
        }
    }

    fn add_action(product: ProductDescriptor, quantity: i64) -> CartAction {
        CartAction::Add { product, quantity }
    }

    #[test]
    fn storefront_scenario_add_merge_update_remove() {
        let s0 = CartState::new();

        let (s1, o1) = reduce(&s0, add_action(oil(), 3));
        assert_eq!(s1.items().len(), 1);
        assert_eq!(s1.get("p1").map(|l| l.quantity), Some(3));
        assert_eq!(s1.total_items(), 3);
        assert_eq!(s1.total_price(), 4350.0);
        assert!(!o1.clamped());

        let (s2, o2) = reduce(&s1, add_action(oil(), 4));
        assert_eq!(s2.get("p1").map(|l| l.quantity), Some(5));
        assert_eq!(s2.total_price(), 7250.0);
        assert_eq!(o2, Outcome::Added { product_id: "p1".into(), requested: 4, quantity: 5, clamped: true });

        let (s3, _) = reduce(&s2, CartAction::UpdateQuantity { product_id: "p1".into(), quantity: 2 });
        assert_eq!(s3.get("p1").map(|l| l.quantity), Some(2));
        assert_eq!(s3.total_price(), 2900.0);

        let (s4, o4) = reduce(&s3, CartAction::Remove { product_id: "p1".into() });
        assert!(s4.is_empty());
        assert_eq!(s4.total_items(), 0);
        assert_eq!(s4.total_price(), 0.0);
        assert_eq!(o4, Outcome::Removed { product_id: "p1".into() });
    }

    #[test]
    fn new_line_is_clamped_to_stock() {
        let (s, o) = reduce(&CartState::new(), add_action(oil(), 9));
        assert_eq!(s.get("p1").map(|l| l.quantity), Some(5));
        assert!(o.clamped());
    }

    #[test]
    fn non_positive_add_is_a_noop() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        for q in [0, -3] {
            let (s2, o) = reduce(&s1, add_action(oil(), q));
            assert_eq!(s2, s1);
            assert_eq!(o, Outcome::Unchanged);
        }
    }

    #[test]
    fn out_of_stock_product_is_never_inserted() {
        let sold_out = ProductDescriptor::new("p9", "Sugar", 850.0, 0);
        let (s, o) = reduce(&CartState::new(), add_action(sold_out, 1));
        assert!(s.is_empty());
        assert_eq!(o, Outcome::Unchanged);
    }

    #[test]
    fn merge_with_vanished_stock_drops_the_line() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        let now_empty = ProductDescriptor { stock: 0, ..oil() };
        let (s2, o) = reduce(&s1, add_action(now_empty, 1));
        assert!(s2.get("p1").is_none());
        assert_eq!(o, Outcome::Removed { product_id: "p1".into() });
    }

    #[test]
    fn merge_refreshes_stock_bound() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 5));
        let restocked = ProductDescriptor { stock: 20, ..oil() };
        let (s2, _) = reduce(&s1, add_action(restocked, 4));
        let line = s2.get("p1").cloned();
        assert_eq!(line.as_ref().map(|l| l.quantity), Some(9));
        assert_eq!(line.map(|l| l.stock()), Some(20));
    }

    #[test]
    fn update_to_zero_or_negative_removes() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        let (removed, _) = reduce(&s1, CartAction::Remove { product_id: "p1".into() });
        for q in [0, -5] {
            let (s2, o) = reduce(&s1, CartAction::UpdateQuantity { product_id: "p1".into(), quantity: q });
            assert_eq!(s2, removed);
            assert_eq!(o, Outcome::Removed { product_id: "p1".into() });
        }
    }

    #[test]
    fn update_unknown_id_is_a_noop() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        let (s2, o) = reduce(&s1, CartAction::UpdateQuantity { product_id: "nope".into(), quantity: 4 });
        assert_eq!(s2, s1);
        assert_eq!(o, Outcome::Unchanged);
    }

    #[test]
    fn update_is_clamped_to_line_stock() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 1));
        let (s2, o) = reduce(&s1, CartAction::UpdateQuantity { product_id: "p1".into(), quantity: 50 });
        assert_eq!(s2.get("p1").map(|l| l.quantity), Some(5));
        assert!(o.clamped());
    }

    #[test]
    fn remove_absent_is_idempotent() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 1));
        let (s2, o) = reduce(&s1, CartAction::Remove { product_id: "ghost".into() });
        assert_eq!(s2, s1);
        assert_eq!(o, Outcome::Unchanged);
    }

    #[test]
    fn clear_resets_totals_but_not_visibility() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 3));
        let (s2, _) = reduce(&s1, CartAction::Toggle);
        let (s3, o) = reduce(&s2, CartAction::Clear);
        assert!(s3.is_empty());
        assert_eq!(s3.total_items(), 0);
        assert_eq!(s3.total_price(), 0.0);
        assert!(s3.is_open());
        assert_eq!(o, Outcome::Cleared);
    }

    #[test]
    fn toggle_flips_visibility_only() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 3));
        let (s2, o) = reduce(&s1, CartAction::Toggle);
        assert!(s2.is_open());
        assert_eq!(s2.items(), s1.items());
        assert_eq!(o, Outcome::Toggled { open: true });
        assert!(!o.touches_items());
        let (s3, _) = reduce(&s2, CartAction::Toggle);
        assert!(!s3.is_open());
    }

    #[test]
    fn from_persisted_recomputes_and_normalizes() {
        let over = CartLine { product: oil(), quantity: 12 };
        let dup = CartLine { product: oil(), quantity: 1 };
        let zero = CartLine { product: ProductDescriptor::new("p2", "Cream", 450.0, 10), quantity: 0 };
        let record = PersistedCart { items: vec![over, zero, dup], total_items: 999, total_price: -1.0 };

        let state = CartState::from_persisted(record);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.get("p1").map(|l| l.quantity), Some(5));
        assert_eq!(state.total_items(), 5);
        assert_eq!(state.total_price(), 7250.0);
        assert!(!state.is_open());
    }

    #[test]
    fn persisted_roundtrip_keeps_lines_and_totals() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        let cream = ProductDescriptor::new("p2", "Fairness Cream 50g", 450.0, 80);
        let (s2, _) = reduce(&s1, add_action(cream, 2));
        let record = s2.to_persisted();
        assert_eq!(record.total_items, 4);
        assert_eq!(record.total_price, 3800.0);
        assert_eq!(CartState::from_persisted(record), s2);
    }

    #[test]
    fn merge_refreshes_stock_but_keeps_first_price_and_variant() {
        let (s1, _) = reduce(&CartState::new(), add_action(oil(), 2));
        let repriced = ProductDescriptor { price: 1600.0, selected_variant: Some("10L".into()), stock: 3, ..oil() };
        let (s2, outcome) = reduce(&s1, add_action(repriced, 4));
        assert!(outcome.clamped());
        let line = &s2.items()[0];
        assert_eq!(line.quantity, 3);
        assert_eq!(line.stock(), 3);
        assert_eq!(line.product.price, 1450.0);
        assert_eq!(line.product.selected_variant.as_deref(), Some("5L"));
        assert_eq!(s2.total_price(), 4350.0);
    }
}
