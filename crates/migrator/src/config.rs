//! Environment-driven configuration
//!
//! Everything is read once from the process environment (and `.env`, when
//! present) into plain structs that are passed to constructors. Blank values
//! count as unset.

use std::path::PathBuf;
use url::Url;

use crate::driver::{MigrateError, Result};

/// Connection settings for one tenant
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub tenant_id: String,
    pub site_id: Option<String>,
    pub catalog: Option<String>,
    pub master_catalog: Option<String>,
    pub client_id: String,
    pub shared_secret: String,
    pub auth_host: String,
    /// Host suffix for the tenant API, e.g. `sandbox.mozu.com`
    pub api_env: Option<String>,
    /// Full base URL; overrides the one derived from `api_env`
    pub api_base_url: Option<String>,
}

impl ApiConfig {
    /// Check every value needed to authenticate and build request URLs
    pub fn validate(&self) -> Result<()> {
        if self.tenant_id.is_empty() {
            return Err(MigrateError::missing_config(
                "TENANT_ID",
                "Set TENANT_ID in your .env file to the numeric tenant id",
            ));
        }
        if self.client_id.is_empty() {
            return Err(MigrateError::missing_config(
                "CLIENT_ID",
                "Set CLIENT_ID to the application key from Dev Center",
            ));
        }
        if self.shared_secret.is_empty() {
            return Err(MigrateError::missing_config(
                "SHARED_SECRET",
                "Set SHARED_SECRET to the application's shared secret",
            ));
        }
        if self.auth_host.is_empty() {
            return Err(MigrateError::missing_config(
                "AUTH_HOST",
                "Set AUTH_HOST, e.g. home.mozu.com",
            ));
        }
        if self.api_env.is_none() && self.api_base_url.is_none() {
            return Err(MigrateError::missing_config(
                "API_ENV",
                "Set API_ENV (e.g. sandbox.mozu.com) or API_BASE_URL",
            ));
        }
        Ok(())
    }

    /// Root URL of the tenant API
    pub fn base_url(&self) -> Result<Url> {
        let raw = match (&self.api_base_url, &self.api_env) {
            (Some(base), _) => base.clone(),
            (None, Some(env)) => format!("https://t{}.{}", self.tenant_id, strip_scheme(env)),
            (None, None) => {
                return Err(MigrateError::missing_config(
                    "API_ENV",
                    "Set API_ENV (e.g. sandbox.mozu.com) or API_BASE_URL",
                ));
            }
        };
        parse_url(&raw)
    }

    /// OAuth endpoint on the auth host
    pub fn auth_url(&self) -> Result<Url> {
        let host = with_scheme(&self.auth_host);
        let base = parse_url(&host)?;
        base.join("/api/platform/applications/authtickets/oauth")
            .map_err(|source| MigrateError::InvalidUrl { url: host, source })
    }

    /// Same tenant without site or child catalog context
    ///
    /// Product deletes must run at master catalog level; sending the site
    /// headers would scope them to one child catalog.
    pub fn for_master_catalog(&self) -> Self {
        Self {
            site_id: None,
            catalog: None,
            master_catalog: Some(
                self.master_catalog
                    .clone()
                    .unwrap_or_else(|| "1".to_string()),
            ),
            ..self.clone()
        }
    }
}

/// Everything one invocation of the tool needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Source tenant
    pub api: ApiConfig,
    pub dest_tenant_id: Option<String>,
    pub dest_site_id: Option<String>,
    /// Full base URL for the destination tenant; derived from its id when unset
    pub dest_api_base_url: Option<String>,
    pub document_list_name: Option<String>,
    /// Directory holding the JSON templates
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl MigrateConfig {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok(); // Ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api = ApiConfig {
            tenant_id: get("TENANT_ID").unwrap_or_default(),
            site_id: get("SITE_ID"),
            catalog: get("CATALOG"),
            master_catalog: get("MASTER_CATALOG"),
            client_id: get("CLIENT_ID").unwrap_or_default(),
            shared_secret: get("SHARED_SECRET").unwrap_or_default(),
            auth_host: get("AUTH_HOST").unwrap_or_default(),
            api_env: get("API_ENV"),
            api_base_url: get("API_BASE_URL"),
        };

        Self {
            api,
            dest_tenant_id: get("DEST_TENANT_ID"),
            dest_site_id: get("DEST_SITE_ID"),
            dest_api_base_url: get("DEST_API_BASE_URL"),
            document_list_name: get("DOCUMENT_LIST_NAME"),
            data_dir: get("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_dir: get("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs")),
        }
    }

    /// Destination tenant for copy jobs: source credentials, destination ids
    ///
    /// `API_BASE_URL` only applies to the source tenant; the destination uses
    /// `DEST_API_BASE_URL` or the URL derived from its tenant id.
    pub fn for_destination(&self) -> Result<ApiConfig> {
        let tenant_id = self.dest_tenant_id.clone().ok_or_else(|| {
            MigrateError::missing_config(
                "DEST_TENANT_ID",
                "Set DEST_TENANT_ID to the tenant documents are copied into",
            )
        })?;

        Ok(ApiConfig {
            tenant_id,
            site_id: self.dest_site_id.clone(),
            catalog: None,
            api_base_url: self.dest_api_base_url.clone(),
            ..self.api.clone()
        })
    }

    pub fn require_document_list_name(&self) -> Result<&str> {
        self.document_list_name.as_deref().ok_or_else(|| {
            MigrateError::missing_config(
                "DOCUMENT_LIST_NAME",
                "Set DOCUMENT_LIST_NAME to the list to copy, e.g. banners@mystore",
            )
        })
    }

    /// Site id as a number, for document list `scopeId`
    pub fn site_scope_id(&self) -> Result<i64> {
        let site = self.api.site_id.as_deref().ok_or_else(|| {
            MigrateError::missing_config("SITE_ID", "Set SITE_ID to the site the list belongs to")
        })?;
        site.parse().map_err(|_| MigrateError::Configuration {
            message: format!("SITE_ID '{}' is not a number", site),
            field: Some("SITE_ID".to_string()),
            suggestion: Some("Use the numeric site id shown in Admin".to_string()),
        })
    }
}

fn strip_scheme(host: &str) -> &str {
    host.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| MigrateError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> MigrateConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MigrateConfig::from_lookup(|key| vars.get(key).cloned())
    }

    fn complete() -> MigrateConfig {
        config_from(&[
            ("TENANT_ID", "12345"),
            ("SITE_ID", "67890"),
            ("CATALOG", "2"),
            ("MASTER_CATALOG", "1"),
            ("CLIENT_ID", "KIBO_APP.1.0.0.Release"),
            ("SHARED_SECRET", "s3cret"),
            ("AUTH_HOST", "home.mozu.com"),
            ("API_ENV", "sandbox.mozu.com"),
        ])
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert_eq!(config.log_level, "info");
        assert!(config.api.site_id.is_none());
    }

    #[test]
    fn pci_host_is_ignored() {
        let config = config_from(&[
            ("TENANT_ID", "12345"),
            ("SITE_ID", "67890"),
            ("CATALOG", "2"),
            ("MASTER_CATALOG", "1"),
            ("CLIENT_ID", "KIBO_APP.1.0.0.Release"),
            ("SHARED_SECRET", "s3cret"),
            ("AUTH_HOST", "home.mozu.com"),
            ("API_ENV", "sandbox.mozu.com"),
            ("PCI_HOST", "pmts.mozu.com"),
        ]);
        assert_eq!(config, complete());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("SITE_ID", "  "), ("DOCUMENT_LIST_NAME", "")]);
        assert!(config.api.site_id.is_none());
        assert!(config.require_document_list_name().is_err());
    }

    #[test]
    fn validate_names_the_first_missing_field() {
        let mut config = complete();
        assert!(config.api.validate().is_ok());

        config.api.shared_secret.clear();
        match config.api.validate() {
            Err(MigrateError::Configuration { field, .. }) => {
                assert_eq!(field.as_deref(), Some("SHARED_SECRET"))
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn base_url_derives_from_tenant_and_env() {
        let config = complete();
        assert_eq!(
            config.api.base_url().unwrap().as_str(),
            "https://t12345.sandbox.mozu.com/"
        );
        assert_eq!(
            config.api.auth_url().unwrap().as_str(),
            "https://home.mozu.com/api/platform/applications/authtickets/oauth"
        );
    }

    #[test]
    fn explicit_base_url_wins() {
        let mut config = complete();
        config.api.api_base_url = Some("http://127.0.0.1:9999".to_string());
        assert_eq!(config.api.base_url().unwrap().as_str(), "http://127.0.0.1:9999/");
    }

    #[test]
    fn master_catalog_view_drops_site_context() {
        let master = complete().api.for_master_catalog();
        assert!(master.site_id.is_none());
        assert!(master.catalog.is_none());
        assert_eq!(master.master_catalog.as_deref(), Some("1"));
        assert_eq!(master.tenant_id, "12345");
    }

    #[test]
    fn destination_requires_tenant() {
        let config = complete();
        assert!(config.for_destination().unwrap_err().is_fatal());

        let config = MigrateConfig {
            dest_tenant_id: Some("999".to_string()),
            dest_site_id: Some("111".to_string()),
            ..complete()
        };
        let dest = config.for_destination().unwrap();
        assert_eq!(dest.tenant_id, "999");
        assert_eq!(dest.site_id.as_deref(), Some("111"));
        assert_eq!(dest.client_id, config.api.client_id);
        assert_eq!(
            dest.base_url().unwrap().as_str(),
            "https://t999.sandbox.mozu.com/"
        );
    }

    #[test]
    fn site_scope_id_must_be_numeric() {
        assert_eq!(complete().site_scope_id().unwrap(), 67890);

        let mut config = complete();
        config.api.site_id = Some("main".to_string());
        assert!(config.site_scope_id().is_err());
    }
}
