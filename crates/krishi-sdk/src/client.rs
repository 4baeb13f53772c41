//! Krishi order service client.

use std::sync::Arc;

use async_trait::async_trait;
use krishi_core::{
    CustomerGroup, FetchOutcome, ItemKey, Order, OrderDraft, OrderError, Result, SellerOrders,
    ViewerOrders, ViewerRole,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::auth::CredentialProvider;
use crate::config::ClientConfig;
use crate::gateway::OrderGateway;

/// Longest slice of a non-JSON body kept in logs.
const BODY_LOG_LIMIT: usize = 200;

/// Client for the order endpoints of the Krishi API.
#[derive(Clone)]
pub struct OrderClient {
    /// Base URL including the `/api` prefix.
    base_url: Url,

    /// HTTP client.
    http_client: reqwest::Client,

    /// Source of the bearer token.
    credentials: Arc<dyn CredentialProvider>,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
}

/// Response from placing an order.
#[derive(Debug, Deserialize)]
struct PlacedOrderResponse {
    order: Order,
    #[serde(default)]
    message: Option<String>,
}

/// Response carrying one order.
#[derive(Debug, Deserialize)]
struct OrderResponse {
    order: Order,
}

/// Response from the buyer listing.
#[derive(Debug, Deserialize)]
struct MyOrdersResponse {
    #[serde(default)]
    orders: Vec<Order>,
}

/// Response from the seller listing. Grouping may be left to the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SellerOrdersResponse {
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    grouped_by_customer: Option<Vec<CustomerGroup>>,
}

/// Request body for an item status change.
#[derive(Debug, Serialize)]
struct StatusRequest<'a> {
    status: &'a str,
}

impl OrderClient {
    /// Build a client without contacting the service.
    pub fn new(config: &ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OrderError::Config(e.to_string()))?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| OrderError::Config(format!("Invalid API URL {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(OrderError::Config(format!(
                "Invalid API URL {}: cannot be a base",
                config.base_url
            )));
        }

        Ok(Self {
            base_url,
            http_client,
            credentials,
        })
    }

    /// Build a client and verify the service answers its health check.
    pub async fn connect(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let client = Self::new(config, credentials)?;

        client
            .http_client
            .get(client.url(&["health"])?)
            .send()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| OrderError::Network(e.to_string()))?;

        info!(base_url = %client.base_url, "Connected to order service");
        Ok(client)
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Endpoint URL under the base. Each segment is percent-encoded, so an
    /// id containing `/` or `?` stays one segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| OrderError::Config(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token when one is available.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        let builder = self.http_client.request(method, url);
        Ok(match self.credentials.get() {
            Some(token) => builder.bearer_auth(token),
            None => {
                debug!(?segments, "Sending request without credentials");
                builder
            }
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder
            .send()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))
    }

    /// Decode a JSON response, turning failures into [`OrderError`].
    ///
    /// The content type is checked before the status: a non-JSON body is
    /// `MalformedResponse` whatever the status code.
    async fn read_json<T: DeserializeOwned>(&self, response: Response, failure: &str) -> Result<T> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.contains("application/json"));

        if !is_json {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_LOG_LIMIT).collect();
            warn!(status = status.as_u16(), body = %snippet, "Server returned non-JSON response");
            return Err(OrderError::MalformedResponse(format!(
                "HTTP {} without a JSON body",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| OrderError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| failure.to_string());

            warn!(status = status.as_u16(), %message, "Order service rejected request");

            if status == StatusCode::UNAUTHORIZED {
                self.credentials.clear();
            }
            if status == StatusCode::NOT_FOUND {
                return Err(OrderError::NotFound(message));
            }
            return Err(OrderError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| OrderError::MalformedResponse(e.to_string()))
    }

    /// Place an order.
    #[instrument(skip(self, draft), fields(items = draft.items.len(), total = draft.total))]
    pub async fn place_order(&self, draft: &OrderDraft) -> Result<Order> {
        let response = self
            .send(self.request(Method::POST, &["orders"])?.json(draft))
            .await?;

        let placed: PlacedOrderResponse = self.read_json(response, "Failed to place order").await?;
        info!(
            order_id = %placed.order.id,
            message = placed.message.as_deref().unwrap_or(""),
            "Order placed"
        );
        Ok(placed.order)
    }

    /// Set the status of one item.
    ///
    /// `item` addresses the line in the order's full item sequence; resolve it
    /// with [`Order::item_key`], never from a position in a filtered list.
    #[instrument(skip(self))]
    pub async fn update_item_status(
        &self,
        order_id: &str,
        item: ItemKey,
        status: &str,
    ) -> Result<Order> {
        if status.trim().is_empty() {
            return Err(OrderError::Invalid("Status cannot be empty".to_string()));
        }

        let builder = match item {
            ItemKey::Index(index) => self.request(
                Method::PATCH,
                &["orders", order_id, "item", index.to_string().as_str(), "status"],
            )?,
            ItemKey::Line(line_id) => self.request(
                Method::PATCH,
                &["orders", order_id, "items", line_id.to_string().as_str(), "status"],
            )?,
        };

        let response = self.send(builder.json(&StatusRequest { status })).await?;

        let updated: OrderResponse = self
            .read_json(response, "Failed to update item status")
            .await?;
        info!(order_id, %item, status, "Item status updated");
        Ok(updated.order)
    }

    /// Get an order by id.
    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order> {
        let response = self
            .send(self.request(Method::GET, &["orders", order_id])?)
            .await?;

        let found: OrderResponse = self.read_json(response, "Failed to fetch order").await?;
        Ok(found.order)
    }

    /// Orders placed by the signed-in buyer.
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        let response = self
            .send(self.request(Method::GET, &["orders", "my-orders"])?)
            .await?;

        let listing: MyOrdersResponse = self.read_json(response, "Failed to fetch orders").await?;
        Ok(listing.orders)
    }

    /// Orders containing the signed-in seller's products.
    ///
    /// Groups locally when the service does not send `groupedByCustomer`.
    pub async fn seller_orders(&self) -> Result<SellerOrders> {
        let response = self
            .send(self.request(Method::GET, &["orders", "seller", "orders"])?)
            .await?;

        let listing: SellerOrdersResponse = self
            .read_json(response, "Failed to fetch seller orders")
            .await?;

        Ok(match listing.grouped_by_customer {
            Some(grouped_by_customer) => SellerOrders {
                orders: listing.orders,
                grouped_by_customer,
            },
            None => {
                debug!("Service sent no grouping, grouping orders locally");
                SellerOrders::from_orders(listing.orders)
            }
        })
    }

    /// Listing for a viewer. Failures degrade to `Unavailable`.
    pub async fn fetch_orders_for_viewer(&self, role: ViewerRole) -> FetchOutcome<ViewerOrders> {
        let result = match role {
            ViewerRole::Buyer => self.my_orders().await.map(ViewerOrders::Buyer),
            ViewerRole::Seller => self.seller_orders().await.map(ViewerOrders::Seller),
        };

        match result {
            Ok(listing) => FetchOutcome::Loaded(listing),
            Err(error) => {
                warn!(?role, %error, "Order listing unavailable");
                FetchOutcome::Unavailable { error }
            }
        }
    }
}

#[async_trait]
impl OrderGateway for OrderClient {
    async fn place_order(&self, draft: &OrderDraft) -> Result<Order> {
        OrderClient::place_order(self, draft).await
    }

    async fn update_item_status(
        &self,
        order_id: &str,
        item: ItemKey,
        status: &str,
    ) -> Result<Order> {
        OrderClient::update_item_status(self, order_id, item, status).await
    }

    async fn fetch_orders_for_viewer(&self, role: ViewerRole) -> FetchOutcome<ViewerOrders> {
        OrderClient::fetch_orders_for_viewer(self, role).await
    }
}
