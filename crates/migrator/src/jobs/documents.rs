//! Content jobs: copying documents between tenants and creating documents,
//! document types and document lists from templates

use serde_json::Value;
use tracing::{info, warn};

use super::JobContext;
use super::templates::{
    DOCUMENT_LIST_TEMPLATE_FILE, DOCUMENT_TEMPLATE_FILE, DOCUMENT_TYPE_TEMPLATE_FILE,
    load_template, load_templates,
};
use crate::api::{
    Document, DocumentDraft, DocumentList, DocumentListsApi, DocumentMessage,
    DocumentPublishingApi, DocumentType, DocumentTypesApi, DocumentsApi,
};
use crate::driver::{BatchItem, BatchReport, Creator, MigrateError, Publisher, Result};

/// Copy every document of `DOCUMENT_LIST_NAME` into the destination tenant
pub async fn copy_documents(ctx: &JobContext) -> Result<BatchReport> {
    let list_name = ctx.config.require_document_list_name()?;
    let source = DocumentsApi::new(ctx.source_client()?, list_name);
    let destination = DocumentsApi::new(ctx.destination_client()?, list_name);
    let dest = &destination;

    info!(document_list = list_name, "Starting document copy");
    ctx.executor()
        .fetch_and_run(
            "copy documents",
            &ctx.paginator(),
            &source,
            None,
            |_, document: Document| async move {
                let created = dest.create(&DocumentDraft::from(&document)).await?;
                info!(
                    document_list = dest.list_name(),
                    source_id = document.id.as_deref().unwrap_or("-"),
                    document_id = created.id.as_deref().unwrap_or("-"),
                    document_name = created.name.as_deref().unwrap_or("-"),
                    "Created document in destination"
                );
                Ok(())
            },
        )
        .await
}

/// Create each templated document and publish it once it has an id
///
/// Returns the create batch and the publish batch. A document whose create
/// call returned no id is counted as skipped in the publish batch.
pub async fn create_documents(ctx: &JobContext) -> Result<Vec<BatchReport>> {
    let drafts: Vec<DocumentDraft> =
        load_templates(&ctx.config.data_dir.join(DOCUMENT_TEMPLATE_FILE))?;
    let client = ctx.source_client()?;
    let publishing = DocumentPublishingApi::new(client.clone());
    let publisher = &publishing;

    let executor = ctx.executor();
    let mut created = executor.start("create documents");
    let mut published = executor.start("publish documents");
    let total = drafts.len();

    for (index, draft) in drafts.into_iter().enumerate() {
        info!(
            index = index + 1,
            total,
            document_name = %draft.display_name(),
            "Processing document"
        );

        let client = client.clone();
        let outcome = created
            .process(draft, None, |_, draft: DocumentDraft| async move {
                let list_name = draft.list_fqn.clone().ok_or_else(|| MigrateError::MissingKey {
                    name: draft.display_name(),
                    field: "listFQN",
                })?;
                let document = DocumentsApi::new(client, list_name).create(&draft).await?;
                info!(
                    document_id = document.id.as_deref().unwrap_or("-"),
                    document_name = document.name.as_deref().unwrap_or("-"),
                    list_fqn = document.list_fqn.as_deref().unwrap_or("-"),
                    publish_state = document.publish_state.as_deref().unwrap_or("-"),
                    "Created document"
                );
                Ok(document)
            })
            .await;

        if let Some(document) = outcome.into_output() {
            published
                .process(document, None, |document_id, _document| async move {
                    publisher.publish(&[document_id]).await
                })
                .await;
        }
    }

    Ok(vec![created.finish(), published.finish()])
}

pub async fn create_document_type(ctx: &JobContext) -> Result<BatchReport> {
    let template: DocumentType =
        load_template(&ctx.config.data_dir.join(DOCUMENT_TYPE_TEMPLATE_FILE))?;
    let api = DocumentTypesApi::new(ctx.source_client()?);
    let api = &api;

    Ok(ctx
        .executor()
        .run("create document type", vec![template], None, |_, document_type| async move {
            let created = api.create(&document_type).await?;
            info!(
                document_type_fqn = created.document_type_fqn.as_deref().unwrap_or("-"),
                name = created.name.as_deref().unwrap_or("-"),
                namespace = created.namespace.as_deref().unwrap_or("-"),
                "Created document type"
            );
            Ok(())
        })
        .await)
}

/// Create the templated list, scoped to the configured site
pub async fn create_document_list(ctx: &JobContext) -> Result<BatchReport> {
    let mut template: DocumentList =
        load_template(&ctx.config.data_dir.join(DOCUMENT_LIST_TEMPLATE_FILE))?;
    template.scope_id = Some(ctx.config.site_scope_id()?);

    let api = DocumentListsApi::new(ctx.source_client()?);
    let api = &api;

    Ok(ctx
        .executor()
        .run("create document list", vec![template], None, |_, list| async move {
            let created = api.create(&list).await?;
            info!(
                list_fqn = created.list_fqn.as_deref().unwrap_or("-"),
                name = created.name.as_deref().unwrap_or("-"),
                namespace = created.namespace.as_deref().unwrap_or("-"),
                scope_id = created.scope_id.unwrap_or_default(),
                "Created document list"
            );
            Ok(())
        })
        .await)
}

/// A document addressed by list and id
#[derive(Debug, Clone)]
struct DocumentRef {
    list_name: String,
    document_id: String,
}

impl BatchItem for DocumentRef {
    fn key(&self) -> Option<String> {
        Some(self.document_id.clone())
    }

    fn display_name(&self) -> String {
        format!("{}/{}", self.list_name, self.document_id)
    }
}

/// Fetch one document and log its messages
pub async fn view_document(
    ctx: &JobContext,
    list_name: &str,
    document_id: &str,
) -> Result<BatchReport> {
    let api = DocumentsApi::new(ctx.source_client()?, list_name);
    let api = &api;
    let target = DocumentRef {
        list_name: list_name.to_string(),
        document_id: document_id.to_string(),
    };

    Ok(ctx
        .executor()
        .run("view document", vec![target], None, |document_id, _| async move {
            let document = api.get(&document_id).await?;
            info!(
                document_id = %document_id,
                document_name = document.name.as_deref().unwrap_or("-"),
                document_type_fqn = document.document_type_fqn.as_deref().unwrap_or("-"),
                "Document retrieved"
            );
            for (index, message) in document_messages(&document).into_iter().enumerate() {
                info!(
                    index = index + 1,
                    text = message.text.as_deref().unwrap_or("-"),
                    redirect_url = message.redirect_url.as_deref().unwrap_or("-"),
                    "Document message"
                );
            }
            Ok(())
        })
        .await)
}

/// Decode `properties.messages`
///
/// Entries are usually JSON-encoded strings; plain objects are accepted too.
/// Entries that decode to neither are logged and dropped.
pub fn document_messages(document: &Document) -> Vec<DocumentMessage> {
    let Some(messages) = document
        .properties
        .as_ref()
        .and_then(|p| p.get("messages"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    messages
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let decoded: serde_json::Result<DocumentMessage> = match raw {
                Value::String(text) => serde_json::from_str(text),
                other => serde_json::from_value(other.clone()),
            };
            match decoded {
                Ok(message) => Some(message),
                Err(e) => {
                    warn!(index = index + 1, error = %e, "Unreadable document message");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod message_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_and_object_messages_decode() {
        let document: Document = serde_json::from_value(json!({
            "id": "d1",
            "properties": {
                "messages": [
                    "{\"text\":\"Free shipping\",\"redirectUrl\":\"/shipping\"}",
                    {"text": "Sale", "redirectUrl": "/sale"},
                    "not json"
                ]
            }
        }))
        .unwrap();

        let messages = document_messages(&document);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text.as_deref(), Some("Free shipping"));
        assert_eq!(messages[0].redirect_url.as_deref(), Some("/shipping"));
        assert_eq!(messages[1].text.as_deref(), Some("Sale"));
    }

    #[test]
    fn document_without_messages_yields_none() {
        let document: Document = serde_json::from_value(json!({"id": "d1"})).unwrap();
        assert!(document_messages(&document).is_empty());
    }
}
