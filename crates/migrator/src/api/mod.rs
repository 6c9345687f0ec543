//! Tenant REST API: client, resource models and per-resource handles

pub mod client;
pub mod models;
pub mod catalog;
pub mod content;
pub mod commerce;

pub use client::KiboClient;
pub use models::{
    Attribute, AttributeDraft, Category, CategoryContent, CategoryDraft, Channel, Document,
    DocumentDraft, DocumentList, DocumentMessage, DocumentType, Product, ProductContent,
    ProductType, ProductTypeDraft,
};
pub use catalog::{CategoriesApi, ProductAttributesApi, ProductTypesApi, ProductsApi};
pub use content::{DocumentListsApi, DocumentPublishingApi, DocumentTypesApi, DocumentsApi};
pub use commerce::ChannelsApi;
