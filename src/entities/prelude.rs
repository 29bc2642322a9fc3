pub use super::offers::Entity as Offers;
pub use super::price_snapshots::Entity as PriceSnapshots;
pub use super::products::Entity as Products;
