#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use vehicle_remote::api::{CredentialExchanger, HttpRequest, HttpResponse, Transport};
use vehicle_remote::{config, Client, Error, Result};

pub static BASE_URL: &str = "https://vehicles.test";

type Responder = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;
type Delay = Box<dyn Fn(&HttpRequest) -> Duration + Send + Sync>;

/// Answers every request with `respond` and records what it was sent.
pub struct FakeTransport {
    requests: Mutex<Vec<HttpRequest>>,
    respond: Responder,
    delay: Option<Delay>,
}

impl FakeTransport {
    pub fn new(respond: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
            delay: None,
        }
    }

    pub fn with_delay(
        mut self,
        delay: impl Fn(&HttpRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn status(status: u16, body: &'static str) -> Self {
        Self::new(move |_| response(status, body))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(&request)).await;
        }
        Ok((self.respond)(&request))
    }
}

pub fn response(status: u16, body: impl Into<String>) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.into(),
    }
}

/// Hands out `tok-1`, `tok-2`, ... for the first `accepted` exchanges and
/// rejects the rest.
pub struct FakeExchanger {
    accepted: usize,
    calls: AtomicUsize,
}

impl FakeExchanger {
    pub fn accepting() -> Self {
        Self::accepting_first(usize::MAX)
    }

    pub fn rejecting() -> Self {
        Self::accepting_first(0)
    }

    pub fn accepting_first(accepted: usize) -> Self {
        Self {
            accepted,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialExchanger for FakeExchanger {
    async fn exchange(&self, username: &str, password: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.accepted && username == "driver@example.com" && password == "hunter2" {
            Ok(format!("tok-{}", n))
        } else {
            Err(Error::Authentication {
                message: "NotAuthorizedException: Incorrect username or password.".to_string(),
            })
        }
    }
}

pub fn credentials() -> config::Credentials {
    config::Credentials {
        username: "driver@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

pub fn api(page_limit: usize) -> config::Api {
    config::Api {
        base_url: BASE_URL.to_string(),
        page_limit,
        ..config::Api::default()
    }
}

pub fn client(transport: &Arc<FakeTransport>, page_limit: usize) -> Client {
    Client::with_collaborators(
        credentials(),
        api(page_limit),
        Arc::new(FakeExchanger::accepting()),
        transport.clone(),
    )
}

pub async fn logged_in(transport: &Arc<FakeTransport>, page_limit: usize) -> Client {
    let mut client = client(transport, page_limit);
    client.login().await.unwrap();
    client
}

pub fn query_usize(request: &HttpRequest, name: &str) -> usize {
    request
        .query
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.parse().unwrap())
        .unwrap()
}

/// A vehicle listing endpoint for a fleet of `count` vehicles with device
/// keys `DEV000`, `DEV001`, ...
pub fn fleet(count: usize) -> impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static {
    move |request| {
        let limit = query_usize(request, "limit");
        let offset = query_usize(request, "offset");
        let results = (offset..count.min(offset + limit))
            .map(|i| json!({ "deviceKey": format!("DEV{:03}", i), "name": format!("Car {}", i) }))
            .collect::<Vec<_>>();
        response(200, json!({ "count": count, "results": results }).to_string())
    }
}
