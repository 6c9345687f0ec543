//! Seed a sandbox catalog from the JSON files in the data directory

use tracing::info;

use super::JobContext;
use super::templates::{
    PRODUCT_ATTRIBUTES_FILE, PRODUCT_CATEGORIES_FILE, PRODUCT_TYPES_FILE, load_templates,
};
use crate::api::{
    AttributeDraft, CategoriesApi, CategoryDraft, ProductAttributesApi, ProductTypeDraft,
    ProductTypesApi,
};
use crate::driver::{BatchReport, Creator, Result};

/// Create attributes, then product types, then categories
///
/// All three files are read before anything is created, so a broken file
/// aborts the job without leaving a half-seeded catalog.
pub async fn seed_catalog(ctx: &JobContext) -> Result<Vec<BatchReport>> {
    let data_dir = &ctx.config.data_dir;
    let attributes: Vec<AttributeDraft> = load_templates(&data_dir.join(PRODUCT_ATTRIBUTES_FILE))?;
    let product_types: Vec<ProductTypeDraft> = load_templates(&data_dir.join(PRODUCT_TYPES_FILE))?;
    let categories: Vec<CategoryDraft> = load_templates(&data_dir.join(PRODUCT_CATEGORIES_FILE))?;

    let client = ctx.source_client()?;
    Ok(vec![
        create_attributes(ctx, &ProductAttributesApi::new(client.clone()), attributes).await,
        create_product_types(ctx, &ProductTypesApi::new(client.clone()), product_types).await,
        create_categories(ctx, &CategoriesApi::new(client), categories).await?,
    ])
}

pub async fn create_attributes(
    ctx: &JobContext,
    api: &ProductAttributesApi,
    drafts: Vec<AttributeDraft>,
) -> BatchReport {
    ctx.executor()
        .run("create attributes", drafts, None, |_, draft| async move {
            let created = api.create(&draft).await?;
            info!(
                attribute_code = created.attribute_code.as_deref().unwrap_or("-"),
                attribute_fqn = created.attribute_fqn.as_deref().unwrap_or("-"),
                "Created product attribute"
            );
            Ok(())
        })
        .await
}

pub async fn create_product_types(
    ctx: &JobContext,
    api: &ProductTypesApi,
    drafts: Vec<ProductTypeDraft>,
) -> BatchReport {
    ctx.executor()
        .run("create product types", drafts, None, |_, draft| async move {
            let created = api.create(&draft).await?;
            info!(
                product_type_id = created.id.unwrap_or_default(),
                product_type_name = created.name.as_deref().unwrap_or("-"),
                "Created product type"
            );
            Ok(())
        })
        .await
}

/// Create categories parents-first, wiring each child to its parent's new id
pub async fn create_categories(
    ctx: &JobContext,
    api: &CategoriesApi,
    drafts: Vec<CategoryDraft>,
) -> Result<BatchReport> {
    let executor = ctx.executor();
    ctx.resolver(&executor)
        .create_all("create categories", drafts, |draft| async move {
            let created = api.create(&draft).await?;
            info!(
                category_id = created.id.unwrap_or_default(),
                category_name = created.name().unwrap_or("-"),
                parent_category_name = draft.parent_category_name.as_deref().unwrap_or("-"),
                "Created category"
            );
            Ok(created.id)
        })
        .await
}
