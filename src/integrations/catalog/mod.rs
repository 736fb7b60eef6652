// src/integrations/catalog/mod.rs

pub mod client;

pub use client::{clamp_search_limit, CatalogApi, CatalogClient, SEARCH_LIMIT_MAX, SEARCH_LIMIT_MIN};

#[cfg(test)]
pub use client::MockCatalogApi;
