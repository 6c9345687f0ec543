//! Sandbox setup and inspection helpers

use tracing::info;

use super::JobContext;
use crate::api::{Attribute, Channel, ChannelsApi, ProductAttributesApi};
use crate::driver::{BatchReport, Creator, Result};

/// Channels every new sandbox gets
pub const DEFAULT_CHANNEL_CODES: [&str; 3] = ["online", "phone", "crm"];
pub const DEFAULT_COUNTRY_CODE: &str = "US";

/// Fetch and log every attribute definition
pub async fn list_attributes(ctx: &JobContext) -> Result<Vec<Attribute>> {
    let api = ProductAttributesApi::new(ctx.source_client()?);
    let attributes = ctx.paginator().fetch_all("attributes", &api).await?;

    for attribute in &attributes {
        info!(
            attribute_fqn = attribute.attribute_fqn.as_deref().unwrap_or("-"),
            attribute_code = attribute.attribute_code.as_deref().unwrap_or("-"),
            admin_name = attribute.admin_name.as_deref().unwrap_or("-"),
            "Attribute"
        );
    }
    Ok(attributes)
}

pub async fn list_channels(ctx: &JobContext) -> Result<Vec<Channel>> {
    let api = ChannelsApi::new(ctx.source_client()?);
    let channels = ctx.paginator().fetch_all("channels", &api).await?;

    for channel in &channels {
        info!(
            code = channel.code.as_deref().unwrap_or("-"),
            name = channel.name.as_deref().unwrap_or("-"),
            country_code = channel.country_code.as_deref().unwrap_or("-"),
            sites = channel.site_ids.len(),
            "Channel"
        );
    }
    Ok(channels)
}

/// The default channels for `tenant_id`, not yet attached to any site
pub fn default_channels(tenant_id: &str) -> Vec<Channel> {
    let tenant_id = tenant_id.parse().ok();
    DEFAULT_CHANNEL_CODES
        .iter()
        .map(|code| Channel::new(tenant_id, code, DEFAULT_COUNTRY_CODE))
        .collect()
}

pub async fn create_channels(ctx: &JobContext) -> Result<BatchReport> {
    let api = ChannelsApi::new(ctx.source_client()?);
    let api = &api;
    let channels = default_channels(&ctx.config.api.tenant_id);

    Ok(ctx
        .executor()
        .run("create channels", channels, None, |code, channel| async move {
            let created = api.create(&channel).await?;
            info!(
                code = %code,
                name = created.name.as_deref().unwrap_or("-"),
                "Created channel"
            );
            Ok(())
        })
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_channels_carry_numeric_tenant() {
        let channels = default_channels("12345");
        let codes: Vec<_> = channels.iter().filter_map(|c| c.code.as_deref()).collect();

        assert_eq!(codes, vec!["online", "phone", "crm"]);
        assert!(channels.iter().all(|c| c.tenant_id == Some(12345)));
        assert!(channels.iter().all(|c| c.site_ids.is_empty()));
    }

    #[test]
    fn non_numeric_tenant_is_omitted() {
        assert!(default_channels("abc").iter().all(|c| c.tenant_id.is_none()));
    }
}
