//! Vehicle directory editor

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use tracing::warn;

use fleetgrid_domain::repository::ScheduleGateway;
use fleetgrid_types::{DirectoryEntry, Result};

use super::status;
use crate::runner::TaskRunner;

#[derive(Debug)]
pub enum DirectoryEvent {
    Loaded(Result<Vec<DirectoryEntry>>),
    Saved(Result<()>),
    Deleted(Result<()>),
}

/// Editable list of directory rows; every successful write reloads the list
pub struct DirectoryEditor {
    gateway: Arc<dyn ScheduleGateway>,
    runner: TaskRunner,
    sender: Sender<DirectoryEvent>,
    receiver: Receiver<DirectoryEvent>,
    /// Rows as edited in place by the UI
    pub rows: Vec<DirectoryEntry>,
    status: String,
}

impl DirectoryEditor {
    pub fn new(gateway: Arc<dyn ScheduleGateway>, runner: TaskRunner) -> Self {
        let (sender, receiver) = channel();
        Self {
            gateway,
            runner,
            sender,
            receiver,
            rows: Vec::new(),
            status: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn load(&mut self) {
        self.status = status::LOADING.to_string();
        let gateway = Arc::clone(&self.gateway);
        self.runner
            .spawn(&self.sender, move || DirectoryEvent::Loaded(gateway.directory()));
    }

    /// New empty row at the top
    pub fn add_row(&mut self) {
        self.rows.insert(0, DirectoryEntry::default());
    }

    pub fn save(&mut self, index: usize) {
        let Some(entry) = self.rows.get(index).map(DirectoryEntry::trimmed) else {
            return;
        };
        self.status = status::SAVING.to_string();
        let gateway = Arc::clone(&self.gateway);
        self.runner.spawn(&self.sender, move || {
            DirectoryEvent::Saved(gateway.upsert_directory(&entry))
        });
    }

    /// Delete the row's plate on the server; rows without a plate are ignored
    pub fn delete(&mut self, index: usize) {
        let Some(plate) = self
            .rows
            .get(index)
            .map(|r| r.vehicle_plate.trim().to_string())
            .filter(|p| !p.is_empty())
        else {
            return;
        };
        let gateway = Arc::clone(&self.gateway);
        self.runner.spawn(&self.sender, move || {
            DirectoryEvent::Deleted(gateway.delete_directory(&plate))
        });
    }

    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.handle(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    fn handle(&mut self, event: DirectoryEvent) {
        match event {
            DirectoryEvent::Loaded(Ok(items)) => {
                self.status = status::row_count(items.len());
                self.rows = items;
            }
            DirectoryEvent::Loaded(Err(e)) => {
                warn!(error = %e, "directory fetch failed");
                self.status = status::FETCH_FAILED.to_string();
            }
            DirectoryEvent::Saved(Ok(())) => self.load(),
            DirectoryEvent::Saved(Err(e)) => {
                self.status = status::server_error(&e.server_text());
            }
            DirectoryEvent::Deleted(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "directory delete failed");
                }
                self.load();
            }
        }
    }
}
