//! Catalog administration resources

use async_trait::async_trait;

use super::client::KiboClient;
use super::models::{
    Attribute, AttributeDraft, Category, CategoryDraft, Product, ProductType, ProductTypeDraft,
};
use crate::driver::{Creator, Deleter, Lister, Page, Result};

const ADMIN: [&str; 4] = ["api", "commerce", "catalog", "admin"];
const ATTRIBUTE_DEFINITION: &str = "attributedefinition";

fn admin_path<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    ADMIN.iter().copied().chain(rest.iter().copied()).collect()
}

/// Products; use a master catalog client to delete across all child catalogs
#[derive(Clone)]
pub struct ProductsApi {
    client: KiboClient,
}

impl ProductsApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for ProductsApi {
    type Item = Product;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Product>> {
        let url = self.client.endpoint(&admin_path(&["products"]))?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Deleter<str> for ProductsApi {
    async fn delete(&self, product_code: &str) -> Result<()> {
        let url = self.client.endpoint(&admin_path(&["products", product_code]))?;
        self.client.delete(url, &[]).await
    }
}

#[derive(Clone)]
pub struct CategoriesApi {
    client: KiboClient,
}

impl CategoriesApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for CategoriesApi {
    type Item = Category;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Category>> {
        let url = self.client.endpoint(&admin_path(&["categories"]))?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Creator<CategoryDraft> for CategoriesApi {
    type Output = Category;

    async fn create(&self, draft: &CategoryDraft) -> Result<Category> {
        let url = self.client.endpoint(&admin_path(&["categories"]))?;
        self.client.post_json(url, draft).await
    }
}

/// Deletes the category and everything below it
#[async_trait]
impl Deleter<i64> for CategoriesApi {
    async fn delete(&self, category_id: &i64) -> Result<()> {
        let id = category_id.to_string();
        let url = self.client.endpoint(&admin_path(&["categories", id.as_str()]))?;
        self.client
            .delete(url, &[("cascadeDelete", "true".to_string())])
            .await
    }
}

#[derive(Clone)]
pub struct ProductTypesApi {
    client: KiboClient,
}

impl ProductTypesApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for ProductTypesApi {
    type Item = ProductType;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<ProductType>> {
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "producttypes"]))?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Creator<ProductTypeDraft> for ProductTypesApi {
    type Output = ProductType;

    async fn create(&self, draft: &ProductTypeDraft) -> Result<ProductType> {
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "producttypes"]))?;
        self.client.post_json(url, draft).await
    }
}

#[async_trait]
impl Deleter<i64> for ProductTypesApi {
    async fn delete(&self, product_type_id: &i64) -> Result<()> {
        let id = product_type_id.to_string();
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "producttypes", id.as_str()]))?;
        self.client.delete(url, &[]).await
    }
}

#[derive(Clone)]
pub struct ProductAttributesApi {
    client: KiboClient,
}

impl ProductAttributesApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for ProductAttributesApi {
    type Item = Attribute;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Attribute>> {
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "attributes"]))?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Creator<AttributeDraft> for ProductAttributesApi {
    type Output = Attribute;

    async fn create(&self, draft: &AttributeDraft) -> Result<Attribute> {
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "attributes"]))?;
        self.client.post_json(url, draft).await
    }
}

#[async_trait]
impl Deleter<str> for ProductAttributesApi {
    async fn delete(&self, attribute_fqn: &str) -> Result<()> {
        let url = self
            .client
            .endpoint(&admin_path(&[ATTRIBUTE_DEFINITION, "attributes", attribute_fqn]))?;
        self.client.delete(url, &[]).await
    }
}
