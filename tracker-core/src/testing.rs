//! Test doubles shared by the gateway and controller tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tokio::sync::Notify;

use crate::{
    client::{HttpResponse, WeatherClient},
    connectivity::Connectivity,
    model::{Condition, Current, Location, WeatherResponse},
};

pub fn sample_weather(city: &str) -> WeatherResponse {
    WeatherResponse {
        location: Location {
            name: city.to_string(),
            region: "Ile-de-France".to_string(),
            country: "France".to_string(),
        },
        current: Current {
            temperature: 53.6,
            humidity: 81,
            condition: Condition {
                text: "Partly cloudy".to_string(),
                icon: "//cdn.weatherapi.com/weather/64x64/day/116.png".to_string(),
            },
            uv: 3.0,
            feels_like: 51.6,
        },
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with a body naming the requested location.
    Echo,
    Status(u16, &'static str),
    EmptySuccess,
    Transport(&'static str),
}

#[derive(Debug)]
pub struct StubClient {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
    last_api_key: Mutex<Option<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl StubClient {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            last_api_key: Mutex::new(None),
            gates: Mutex::new(HashMap::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.last_api_key.lock().unwrap().clone()
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Requests for `location` block until the returned handle is notified.
    pub fn gate(&self, location: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(location.to_string(), notify.clone());
        notify
    }
}

#[async_trait]
impl WeatherClient for StubClient {
    async fn fetch(&self, api_key: &str, location: &str) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_api_key.lock().unwrap() = Some(api_key.to_string());

        let gate = self.gates.lock().unwrap().get(location).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Echo => Ok(HttpResponse {
                status: 200,
                message: "OK".into(),
                body: Some(sample_weather(location)),
            }),
            Reply::Status(status, message) => {
                Ok(HttpResponse { status, message: message.into(), body: None })
            }
            Reply::EmptySuccess => Ok(HttpResponse { status: 200, message: "OK".into(), body: None }),
            Reply::Transport(message) => Err(anyhow!(message)),
        }
    }
}

#[derive(Debug)]
pub struct StubConnectivity(AtomicBool);

impl StubConnectivity {
    pub fn online() -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(true)))
    }

    pub fn offline() -> Arc<Self> {
        Arc::new(Self(AtomicBool::new(false)))
    }
}

#[async_trait]
impl Connectivity for StubConnectivity {
    async fn is_available(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
