// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::sync::mpsc::Sender;
use std::thread;
use tours_app::TourRecord;
use tours_tui::{FetchEvent, InternalEvent};

pub struct ApiRuntime {
    client: tours_api::Client,
}

impl ApiRuntime {
    pub fn new(client: tours_api::Client) -> Self {
        Self { client }
    }
}

impl tours_tui::AppRuntime for ApiRuntime {
    fn fetch_tours(&mut self) -> Result<Vec<TourRecord>> {
        self.client.fetch_tours()
    }

    fn spawn_fetch(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name("tours-fetch".to_owned())
            .spawn(move || {
                let event = FetchEvent::from_result(request_id, client.fetch_tours());
                if tx.send(InternalEvent::Fetch(event)).is_err() {
                    tracing::debug!(request_id, "ui closed before fetch finished; result dropped");
                }
            })
            .context("spawn fetch thread")?;
        Ok(())
    }
}

/// Serves the built-in sample catalog without touching the network.
pub struct DemoRuntime {
    tours: Vec<TourRecord>,
}

impl Default for DemoRuntime {
    fn default() -> Self {
        Self {
            tours: tours_testkit::sample_tours(),
        }
    }
}

impl tours_tui::AppRuntime for DemoRuntime {
    fn fetch_tours(&mut self) -> Result<Vec<TourRecord>> {
        Ok(self.tours.clone())
    }
}
