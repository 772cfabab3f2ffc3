//! DigitalOcean provider implementation

use crate::api::{
    ActionEnvelope, ActionRequest, CreateDropletRequest, DropletEnvelope, DropletPage, ImagePage,
};
use crate::client::DigitalOceanClient;
use async_trait::async_trait;
use doproxy_cloud::{
    Action, ActionId, CreateDroplet, Droplet, DropletId, Image, InstanceProvider, Result,
};

const PER_PAGE: u32 = 200;

/// DigitalOcean provider
pub struct DigitalOceanProvider {
    client: DigitalOceanClient,
}

impl DigitalOceanProvider {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: DigitalOceanClient::new(api_token),
        }
    }

    pub fn with_client(client: DigitalOceanClient) -> Self {
        Self { client }
    }

    async fn droplet_action(&self, id: DropletId, request: &ActionRequest<'_>) -> Result<Action> {
        tracing::info!("Requesting {} on droplet {}", request.r#type, id);
        let envelope: ActionEnvelope = self
            .client
            .post(&format!("/droplets/{}/actions", id), request)
            .await?;
        Ok(envelope.action.into())
    }
}

#[async_trait]
impl InstanceProvider for DigitalOceanProvider {
    fn name(&self) -> &str {
        "digitalocean"
    }

    async fn find(&self, id: DropletId) -> Result<Option<Droplet>> {
        let envelope: Option<DropletEnvelope> = self
            .client
            .get_optional(&format!("/droplets/{}", id))
            .await?;
        Ok(envelope.map(|e| e.droplet.into()))
    }

    async fn create(&self, request: &CreateDroplet) -> Result<Droplet> {
        tracing::info!(
            "Creating droplet {} ({}, {}, image {})",
            request.name,
            request.region,
            request.size,
            request.image
        );
        let body = CreateDropletRequest::from(request);
        let envelope: DropletEnvelope = self.client.post("/droplets", &body).await?;
        Ok(envelope.droplet.into())
    }

    async fn delete(&self, id: DropletId) -> Result<()> {
        tracing::info!("Deleting droplet {}", id);
        self.client.delete(&format!("/droplets/{}", id)).await
    }

    async fn list_all(&self) -> Result<Vec<Droplet>> {
        let mut droplets = Vec::new();
        let mut page = 1;

        loop {
            let result: DropletPage = self
                .client
                .get(&format!("/droplets?page={}&per_page={}", page, PER_PAGE))
                .await?;
            droplets.extend(result.droplets.into_iter().map(Droplet::from));

            if !result.links.has_next() {
                break;
            }
            page += 1;
        }

        tracing::debug!("Listed {} droplets", droplets.len());
        Ok(droplets)
    }

    async fn list_private_images(&self) -> Result<Vec<Image>> {
        let mut images = Vec::new();
        let mut page = 1;

        loop {
            let result: ImagePage = self
                .client
                .get(&format!(
                    "/images?private=true&page={}&per_page={}",
                    page, PER_PAGE
                ))
                .await?;
            images.extend(result.images.into_iter().map(Image::from));

            if !result.links.has_next() {
                break;
            }
            page += 1;
        }

        tracing::debug!("Listed {} private images", images.len());
        Ok(images)
    }

    async fn shutdown(&self, id: DropletId) -> Result<Action> {
        self.droplet_action(
            id,
            &ActionRequest {
                r#type: "shutdown",
                name: None,
            },
        )
        .await
    }

    async fn snapshot(&self, id: DropletId, name: &str) -> Result<Action> {
        self.droplet_action(
            id,
            &ActionRequest {
                r#type: "snapshot",
                name: Some(name),
            },
        )
        .await
    }

    async fn power_on(&self, id: DropletId) -> Result<Action> {
        self.droplet_action(
            id,
            &ActionRequest {
                r#type: "power_on",
                name: None,
            },
        )
        .await
    }

    async fn find_action(&self, id: ActionId) -> Result<Action> {
        let envelope: ActionEnvelope = self.client.get(&format!("/actions/{}", id)).await?;
        Ok(envelope.action.into())
    }
}
