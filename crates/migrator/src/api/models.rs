//! Resource shapes exchanged with the API
//!
//! Remote models are what list endpoints return; drafts are what create
//! endpoints accept. Only the fields the jobs read are typed, everything else
//! passes through `extra` untouched so templates can carry any field the API
//! understands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::driver::{BatchItem, HierarchicalItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ProductContent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for Product {
    fn key(&self) -> Option<String> {
        self.product_code.clone()
    }

    fn display_name(&self) -> String {
        self.content
            .as_ref()
            .and_then(|c| c.product_name.clone())
            .or_else(|| self.product_code.clone())
            .unwrap_or_else(|| "<unnamed product>".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CategoryContent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    pub fn name(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.name.as_deref())
    }
}

impl BatchItem for Category {
    fn key(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.name()
            .or(self.category_code.as_deref())
            .unwrap_or("<unnamed category>")
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for ProductType {
    fn key(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "<unnamed product type>".to_string())
    }

    fn protection_key(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    #[serde(rename = "attributeFQN", default, skip_serializing_if = "Option::is_none")]
    pub attribute_fqn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for Attribute {
    fn key(&self) -> Option<String> {
        self.attribute_fqn.clone()
    }

    fn display_name(&self) -> String {
        self.admin_name
            .as_deref()
            .or(self.attribute_code.as_deref())
            .unwrap_or("<unnamed attribute>")
            .to_string()
    }

    fn protection_key(&self) -> Option<&str> {
        self.attribute_code.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "documentTypeFQN", default, skip_serializing_if = "Option::is_none")]
    pub document_type_fqn: Option<String>,
    #[serde(rename = "listFQN", default, skip_serializing_if = "Option::is_none")]
    pub list_fqn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for Document {
    fn key(&self) -> Option<String> {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_else(|| "<unnamed document>".to_string())
    }
}

/// One entry of a document's `properties.messages` list
///
/// Stored by the content editor as a JSON string, not a nested object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentType {
    #[serde(rename = "documentTypeFQN", default, skip_serializing_if = "Option::is_none")]
    pub document_type_fqn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for DocumentType {
    fn key(&self) -> Option<String> {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.document_type_fqn
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "<unnamed document type>".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentList {
    #[serde(rename = "listFQN", default, skip_serializing_if = "Option::is_none")]
    pub list_fqn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentList {
    /// `name@namespace`, the form list endpoints accept
    pub fn qualified_name(&self) -> Option<String> {
        match (&self.name, &self.namespace) {
            (Some(name), Some(ns)) => Some(format!("{}@{}", name, ns)),
            (Some(name), None) => Some(name.clone()),
            _ => None,
        }
    }
}

impl BatchItem for DocumentList {
    fn key(&self) -> Option<String> {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.list_fqn
            .clone()
            .or_else(|| self.qualified_name())
            .unwrap_or_else(|| "<unnamed document list>".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default)]
    pub site_ids: Vec<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Channel {
    /// Channel with no sites attached
    pub fn new(tenant_id: Option<i64>, code: &str, country_code: &str) -> Self {
        Self {
            tenant_id,
            code: Some(code.to_string()),
            name: Some(code.to_string()),
            country_code: Some(country_code.to_string()),
            ..Self::default()
        }
    }
}

impl BatchItem for Channel {
    fn key(&self) -> Option<String> {
        self.code.clone()
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "<unnamed channel>".to_string())
    }
}

/// Attribute definition read from a seed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for AttributeDraft {
    fn key(&self) -> Option<String> {
        self.attribute_code.clone()
    }

    fn display_name(&self) -> String {
        self.admin_name
            .as_deref()
            .or(self.attribute_code.as_deref())
            .unwrap_or("<unnamed attribute>")
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for ProductTypeDraft {
    fn key(&self) -> Option<String> {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "<unnamed product type>".to_string())
    }
}

/// Category read from a seed file
///
/// `parentCategoryName` is only used locally to find the parent; the API
/// receives the resolved `parentCategoryId` instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CategoryContent>,
    #[serde(default, skip_serializing)]
    pub parent_category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_category_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchItem for CategoryDraft {
    fn key(&self) -> Option<String> {
        HierarchicalItem::name(self).map(str::to_string)
    }

    fn display_name(&self) -> String {
        HierarchicalItem::name(self)
            .unwrap_or("<unnamed category>")
            .to_string()
    }
}

impl HierarchicalItem for CategoryDraft {
    type Id = i64;

    fn name(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.name.as_deref())
    }

    fn parent_reference_name(&self) -> Option<&str> {
        self.parent_category_name.as_deref().filter(|p| !p.is_empty())
    }

    fn attach_parent(&mut self, parent_id: i64) {
        self.parent_category_id = Some(parent_id);
    }
}

/// Document to create, either from a template or copied from another tenant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "documentTypeFQN", default, skip_serializing_if = "Option::is_none")]
    pub document_type_fqn: Option<String>,
    #[serde(rename = "listFQN", default, skip_serializing_if = "Option::is_none")]
    pub list_fqn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Carries over only the content fields; ids and audit info stay behind
impl From<&Document> for DocumentDraft {
    fn from(document: &Document) -> Self {
        Self {
            name: document.name.clone(),
            document_type_fqn: document.document_type_fqn.clone(),
            list_fqn: document.list_fqn.clone(),
            properties: document.properties.clone(),
            publish_state: document.publish_state.clone(),
            extra: Map::new(),
        }
    }
}

impl BatchItem for DocumentDraft {
    fn key(&self) -> Option<String> {
        self.name.clone()
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| "<unnamed document>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attribute_uses_fqn_as_key_and_code_for_protection() {
        let attr: Attribute = serde_json::from_value(json!({
            "attributeFQN": "tenant~rating",
            "attributeCode": "rating",
            "adminName": "Rating",
            "valueType": "AdminEntered"
        }))
        .unwrap();

        assert_eq!(attr.key().as_deref(), Some("tenant~rating"));
        assert_eq!(attr.protection_key(), Some("rating"));
        assert_eq!(attr.display_name(), "Rating");
        assert_eq!(attr.extra["valueType"], "AdminEntered");
    }

    #[test]
    fn category_draft_sends_parent_id_not_name() {
        let mut draft: CategoryDraft = serde_json::from_value(json!({
            "categoryCode": "tees",
            "parentCategoryName": "Shirts",
            "content": {"name": "Tees", "slug": "tees"}
        }))
        .unwrap();
        assert_eq!(draft.parent_reference_name(), Some("Shirts"));

        draft.attach_parent(42);
        let sent = serde_json::to_value(&draft).unwrap();

        assert_eq!(sent["parentCategoryId"], 42);
        assert_eq!(sent["categoryCode"], "tees");
        assert_eq!(sent["content"]["slug"], "tees");
        assert!(sent.get("parentCategoryName").is_none());
    }

    #[test]
    fn empty_parent_name_means_root() {
        let draft: CategoryDraft = serde_json::from_value(json!({
            "parentCategoryName": "",
            "content": {"name": "Apparel"}
        }))
        .unwrap();
        assert!(draft.parent_reference_name().is_none());
    }

    #[test]
    fn copied_document_keeps_only_content_fields() {
        let source: Document = serde_json::from_value(json!({
            "id": "abc",
            "name": "home-banner",
            "documentTypeFQN": "banner@mystore",
            "listFQN": "banners@mystore",
            "properties": {"messages": []},
            "publishState": "active",
            "insertDate": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let draft = DocumentDraft::from(&source);
        let sent = serde_json::to_value(&draft).unwrap();

        assert_eq!(sent["name"], "home-banner");
        assert_eq!(sent["listFQN"], "banners@mystore");
        assert!(sent.get("id").is_none());
        assert!(sent.get("insertDate").is_none());
    }

    #[test]
    fn channel_serializes_empty_site_list() {
        let channel = Channel::new(Some(100), "online", "US");
        let sent = serde_json::to_value(&channel).unwrap();
        assert_eq!(
            sent,
            json!({
                "tenantId": 100,
                "code": "online",
                "name": "online",
                "countryCode": "US",
                "siteIds": []
            })
        );
    }

    #[test]
    fn product_without_code_has_no_key() {
        let product: Product =
            serde_json::from_value(json!({"content": {"productName": "Mystery"}})).unwrap();
        assert!(product.key().is_none());
        assert_eq!(product.display_name(), "Mystery");
    }
}
