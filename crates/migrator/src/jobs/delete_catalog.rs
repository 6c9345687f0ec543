//! Empty a tenant's catalog: products, categories, product types, attributes
//!
//! Each collection is drained from the head, since deleted items drop out of
//! the listing. The base product type and system attributes are left alone.

use tracing::info;

use super::JobContext;
use crate::api::{
    Category, CategoriesApi, ProductAttributesApi, ProductType, ProductTypesApi, ProductsApi,
};
use crate::driver::{
    BatchItem, BatchReport, Deleter, MigrateError, PageOrder, ProtectedSet, Result,
};

/// Run all four deletions in dependency order
pub async fn delete_catalog(ctx: &JobContext) -> Result<Vec<BatchReport>> {
    let client = ctx.source_client()?;

    let products = delete_products(ctx).await?;
    let categories = delete_categories(ctx, &CategoriesApi::new(client.clone())).await?;
    let product_types = delete_product_types(ctx, &ProductTypesApi::new(client.clone())).await?;
    let attributes = delete_attributes(ctx, &ProductAttributesApi::new(client)).await?;

    Ok(vec![products, categories, product_types, attributes])
}

/// Delete every product from the master catalog
pub async fn delete_products(ctx: &JobContext) -> Result<BatchReport> {
    let client = ctx.master_catalog_client()?;
    let master_catalog = client.config().master_catalog.clone().unwrap_or_default();
    info!(master_catalog = %master_catalog, "Starting master catalog products deletion");

    let products = ProductsApi::new(client);
    let api = &products;
    ctx.executor()
        .drain_and_run(
            "products",
            &ctx.paginator(),
            api,
            None,
            PageOrder::AsListed,
            |product_code, _product| async move { api.delete(product_code.as_str()).await },
        )
        .await
}

/// Delete categories, last listed first so children go before their parents
pub async fn delete_categories(ctx: &JobContext, api: &CategoriesApi) -> Result<BatchReport> {
    ctx.executor()
        .drain_and_run(
            "categories",
            &ctx.paginator(),
            api,
            None,
            PageOrder::Reversed,
            |_, category: Category| async move {
                let id = category.id.ok_or_else(|| MigrateError::MissingKey {
                    name: category.display_name(),
                    field: "id",
                })?;
                api.delete(&id).await
            },
        )
        .await
}

/// Delete every product type except the base one
pub async fn delete_product_types(ctx: &JobContext, api: &ProductTypesApi) -> Result<BatchReport> {
    let protected = ProtectedSet::base_product_type();
    ctx.executor()
        .drain_and_run(
            "product types",
            &ctx.paginator(),
            api,
            Some(&protected),
            PageOrder::AsListed,
            |_, product_type: ProductType| async move {
                let id = product_type.id.ok_or_else(|| MigrateError::MissingKey {
                    name: product_type.display_name(),
                    field: "id",
                })?;
                api.delete(&id).await
            },
        )
        .await
}

/// Delete every attribute that is not a system attribute
pub async fn delete_attributes(
    ctx: &JobContext,
    api: &ProductAttributesApi,
) -> Result<BatchReport> {
    let protected = ProtectedSet::system_attributes();
    ctx.executor()
        .drain_and_run(
            "attributes",
            &ctx.paginator(),
            api,
            Some(&protected),
            PageOrder::AsListed,
            |attribute_fqn, _attribute| async move { api.delete(attribute_fqn.as_str()).await },
        )
        .await
}
