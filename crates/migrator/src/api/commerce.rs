//! Tenant-level commerce settings

use async_trait::async_trait;

use super::client::KiboClient;
use super::models::Channel;
use crate::driver::{Creator, Lister, Page, Result};

#[derive(Clone)]
pub struct ChannelsApi {
    client: KiboClient,
}

impl ChannelsApi {
    pub fn new(client: KiboClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Lister for ChannelsApi {
    type Item = Channel;

    async fn list_page(&self, start_index: u32, page_size: u32) -> Result<Page<Channel>> {
        let url = self.client.endpoint(&["api", "commerce", "channels"])?;
        self.client.get_page(url, start_index, page_size).await
    }
}

#[async_trait]
impl Creator<Channel> for ChannelsApi {
    type Output = Channel;

    async fn create(&self, channel: &Channel) -> Result<Channel> {
        let url = self.client.endpoint(&["api", "commerce", "channels"])?;
        self.client.post_json(url, channel).await
    }
}
