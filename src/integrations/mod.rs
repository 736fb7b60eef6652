// src/integrations/mod.rs
//
// External Integrations Module
//
// The remote catalog is the only external system.

pub mod catalog;

pub use catalog::{CatalogApi, CatalogClient};

#[cfg(test)]
pub use catalog::MockCatalogApi;
