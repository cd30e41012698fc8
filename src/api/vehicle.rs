use futures::future::try_join_all;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{Client, HttpRequest, VEHICLES_PATH};
use crate::{Error, Result};

/// Upper bound on the pages an all-vehicles listing will request.
pub const MAX_PAGES: usize = 1_000;

/// A vehicle record as the vendor reports it. Only the device key is
/// interpreted; every other field is passed through untouched.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Numeric keys are kept as their decimal string. A record without a
    /// usable key still lists, but no command can target it.
    #[serde(
        rename = "deviceKey",
        default,
        deserialize_with = "lenient_device_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub device_key: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn lenient_device_key<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(key) => Some(key),
        Value::Number(key) => Some(key.to_string()),
        _ => None,
    })
}

impl Vehicle {
    pub fn device_key(&self) -> Option<&str> {
        self.device_key.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

#[derive(Deserialize, Debug)]
pub struct VehiclePage {
    pub count: usize,
    #[serde(default)]
    pub results: Vec<Vehicle>,
}

/// Which vehicles to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehiclesOptions {
    /// Every vehicle on the account, fetched in pages of the configured size.
    All,
    /// A single page.
    Page { limit: usize, offset: usize },
}

impl Default for VehiclesOptions {
    fn default() -> Self {
        VehiclesOptions::All
    }
}

impl VehiclesOptions {
    pub fn page(limit: usize, offset: usize) -> Self {
        VehiclesOptions::Page { limit, offset }
    }
}

/// Offsets of the pages still to fetch after the first page at offset 0.
fn remaining_page_offsets(count: usize, limit: usize) -> Result<Vec<usize>> {
    let pages = count
        .checked_add(limit - 1)
        .map(|total| total / limit)
        .filter(|pages| *pages <= MAX_PAGES)
        .ok_or(Error::ImplausibleCount { count, limit })?;
    Ok((1..pages).map(|page| page * limit).collect())
}

impl Client {
    /// List the vehicles on the account.
    ///
    /// With [`VehiclesOptions::All`], the first page reports the total count
    /// and the rest are fetched concurrently. The result is in offset order.
    /// The first failing page fails the whole call and the remaining
    /// requests are dropped. A page never contributes more than its limit.
    #[tracing::instrument(skip(self))]
    pub async fn vehicles(&self, options: VehiclesOptions) -> Result<Vec<Vehicle>> {
        let token = self.session.require()?;

        match options {
            VehiclesOptions::Page { limit, offset } => {
                Ok(self.fetch_page(token, limit, offset).await?.results)
            }
            VehiclesOptions::All => {
                let limit = self.api.page_limit.max(1);
                let first = self.fetch_page(token, limit, 0).await?;

                let offsets = remaining_page_offsets(first.count, limit)?;
                if offsets.is_empty() {
                    return Ok(first.results);
                }
                tracing::debug!(count = first.count, remaining = offsets.len(), "fetching remaining pages");

                let rest = try_join_all(
                    offsets
                        .into_iter()
                        .map(|offset| self.fetch_page(token, limit, offset)),
                )
                .await?;

                let mut vehicles = first.results;
                for page in rest {
                    vehicles.extend(page.results);
                }
                Ok(vehicles)
            }
        }
    }

    /// Find a vehicle by device key in a fresh listing of the account.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self, device_key: &str) -> Result<Option<Vehicle>> {
        let vehicle = self
            .vehicles(VehiclesOptions::All)
            .await?
            .into_iter()
            .find(|vehicle| vehicle.device_key() == Some(device_key));

        if vehicle.is_none() {
            tracing::debug!("no vehicle with this device key");
        }
        Ok(vehicle)
    }

    async fn fetch_page(&self, token: &str, limit: usize, offset: usize) -> Result<VehiclePage> {
        let request = HttpRequest::new(Method::GET, self.url(VEHICLES_PATH))
            .header("Authorization", format!("Bearer {}", token))
            .query("limit", limit)
            .query("offset", offset);

        let rsp = self.transport.send(request).await?;
        tracing::debug!(status = ?rsp.status, limit, offset);

        if !rsp.status.is_success() {
            return Err(Error::List {
                status: rsp.status,
                body: rsp.body,
            });
        }
        metrics::increment_counter!("vehicle_list_pages_fetched");

        let mut page: VehiclePage = serde_json::from_str(&rsp.body)?;
        if page.results.len() > limit {
            tracing::debug!(returned = page.results.len(), limit, "vendor page over limit");
            page.results.truncate(limit);
        }
        Ok(page)
    }
}
