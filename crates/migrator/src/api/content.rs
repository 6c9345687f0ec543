//! Content resources: documents, document types, lists and publishing

use async_trait::async_trait;

use super::client::KiboClient;
use super::models::{Document, DocumentDraft, DocumentList, DocumentType};
use crate::driver::{Creator, Lister, Page, Publisher, Result};

/// Documents of one list, addressed as `name@namespace`
#[derive(Clone)]
pub struct DocumentsApi {
    client: KiboClient,
    list_name: String,
}

impl DocumentsApi {
    pub fn new(client: KiboClient, list_name: impl Into<String>) -> Self {
        Self {
            client,
            list_name: list_name.into(),
        }
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    fn documents_path<'a>(&'a self, rest: Option<&'a str>) -> Vec<&'a str> {
        let mut path = vec![
            "api",
            "content",
            "documentlists",
            self.list_name.as_str(),
            "documents",
        ];
        path.extend(rest);
        path
    }

    pub async fn get(&self, document_id: &str) -> Result<Document> {
        let url = self.client.endpoint(&self.documents_path(Some(document_id)))?;
        self.client.get_json(url, &[]).await
    }
}

#[async_trait]
impl Lister for DocumentsApi {
    type Item = Document;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Document>> {
        let url = self.client.endpoint(&self.documents_path(None))?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Creator<DocumentDraft> for DocumentsApi {
    type Output = Document;

    async fn create(&self, draft: &DocumentDraft) -> Result<Document> {
        let url = self.client.endpoint(&self.documents_path(None))?;
        self.client.post_json(url, draft).await
    }
}

#[derive(Clone)]
pub struct DocumentTypesApi {
    client: KiboClient,
}

impl DocumentTypesApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Creator<DocumentType> for DocumentTypesApi {
    type Output = DocumentType;

    async fn create(&self, document_type: &DocumentType) -> Result<DocumentType> {
        let url = self.client.endpoint(&["api", "content", "documenttypes"])?;
        self.client.post_json(url, document_type).await
    }
}

#[derive(Clone)]
pub struct DocumentListsApi {
    client: KiboClient,
}

impl DocumentListsApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Creator<DocumentList> for DocumentListsApi {
    type Output = DocumentList;

    async fn create(&self, list: &DocumentList) -> Result<DocumentList> {
        let url = self.client.endpoint(&["api", "content", "documentlists"])?;
        self.client.post_json(url, list).await
    }
}

#[derive(Clone)]
pub struct DocumentPublishingApi {
    client: KiboClient,
}

impl DocumentPublishingApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

/// Moves drafts of the given document ids to the active (live) state
#[async_trait]
impl Publisher<String> for DocumentPublishingApi {
    async fn publish(&self, document_ids: &[String]) -> Result<()> {
        let url = self
            .client
            .endpoint(&["api", "content", "documentpublishing", "active"])?;
        self.client.put_json(url, document_ids).await
    }
}
