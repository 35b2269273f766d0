//! Cart module: pure reducer, persistence adapter and the owned store that
//! ties them together.

pub mod persist;
pub mod reducer;
pub mod store;

pub use persist::{CartPersister, PersistHandle, DEFAULT_CART_KEY};
pub use reducer::{reduce, CartAction, CartState, Outcome};
pub use store::CartStore;
