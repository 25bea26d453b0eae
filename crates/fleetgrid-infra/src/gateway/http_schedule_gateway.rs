//! ScheduleGateway over the board server's HTTP API

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use fleetgrid_domain::repository::ScheduleGateway;
use fleetgrid_types::{
    Ack, DirectoryEntry, DirectoryList, Error, FilterState, MarkRequest, MetaResponse, Palette,
    Result, SchedulePayload, UploadResponse,
};

#[derive(Serialize)]
struct DeleteDirectoryRequest<'a> {
    vehicle_plate: &'a str,
}

/// Blocking HTTP client bound to one server base URL
pub struct HttpScheduleGateway {
    base_url: String,
    client: Client,
}

impl HttpScheduleGateway {
    /// Build a gateway; `timeout` of None means requests never time out
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send and turn any non-success status into `Error::Status` with the body text
    fn send(&self, label: &str, request: RequestBuilder) -> Result<Response> {
        debug!(endpoint = label, "request");
        let response = request.send().map_err(|e| {
            warn!(endpoint = label, error = %e, "transport failure");
            Error::Http(e.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(endpoint = label, status = status.as_u16(), "server error");
        Err(Error::Status {
            code: status.as_u16(),
            body,
        })
    }

    fn json<T: DeserializeOwned>(&self, label: &str, request: RequestBuilder) -> Result<T> {
        let response = self.send(label, request)?;
        let text = response.text().map_err(|e| Error::Http(e.to_string()))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn acknowledged(&self, label: &str, request: RequestBuilder) -> Result<()> {
        let ack: Ack = self.json(label, request)?;
        if ack.ok {
            Ok(())
        } else {
            Err(Error::Rejected(format!("{} not acknowledged", label)))
        }
    }

    fn filtered_query(day: &str, filters: &FilterState) -> Result<[(&'static str, String); 2]> {
        Ok([
            ("day", day.to_string()),
            ("filters", filters.to_query_value()?),
        ])
    }
}

impl ScheduleGateway for HttpScheduleGateway {
    fn meta(&self) -> Result<MetaResponse> {
        self.json("meta", self.client.get(self.url("/api/meta")))
    }

    fn schedule(&self, day: &str, filters: &FilterState) -> Result<SchedulePayload> {
        let query = Self::filtered_query(day, filters)?;
        self.json(
            "schedule",
            self.client.get(self.url("/api/schedule")).query(&query),
        )
    }

    fn mark(&self, request: &MarkRequest) -> Result<()> {
        self.send("mark", self.client.post(self.url("/api/mark")).json(request))?;
        Ok(())
    }

    fn upload(&self, path: &Path) -> Result<MetaResponse> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let form = multipart::Form::new().file("file", path)?;
        let response: UploadResponse = self.json(
            "upload",
            self.client.post(self.url("/api/upload")).multipart(form),
        )?;
        if !response.ok {
            return Err(Error::Rejected("upload not accepted".to_string()));
        }
        Ok(response.into_meta())
    }

    fn export(&self, day: &str, filters: &FilterState) -> Result<Vec<u8>> {
        let query = Self::filtered_query(day, filters)?;
        let response = self.send("export", self.client.get(self.url("/export")).query(&query))?;
        let bytes = response.bytes().map_err(|e| Error::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn palette(&self) -> Result<Palette> {
        self.json("palette", self.client.get(self.url("/api/palette")))
    }

    fn save_palette(&self, palette: &Palette) -> Result<Palette> {
        self.json(
            "palette",
            self.client.post(self.url("/api/palette")).json(palette),
        )
    }

    fn reset_palette(&self) -> Result<Palette> {
        self.json(
            "palette reset",
            self.client.post(self.url("/api/palette/reset")),
        )
    }

    fn directory(&self) -> Result<Vec<DirectoryEntry>> {
        let list: DirectoryList =
            self.json("directory", self.client.get(self.url("/api/directory")))?;
        Ok(list.items)
    }

    fn upsert_directory(&self, entry: &DirectoryEntry) -> Result<()> {
        self.acknowledged(
            "directory upsert",
            self.client
                .post(self.url("/api/directory/upsert"))
                .json(&entry.trimmed()),
        )
    }

    fn delete_directory(&self, plate: &str) -> Result<()> {
        self.acknowledged(
            "directory delete",
            self.client
                .post(self.url("/api/directory/delete"))
                .json(&DeleteDirectoryRequest {
                    vehicle_plate: plate.trim(),
                }),
        )
    }
}
