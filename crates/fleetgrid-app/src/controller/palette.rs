//! Palette editor

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use tracing::debug;

use fleetgrid_domain::model::sanitize_palette;
use fleetgrid_domain::repository::ScheduleGateway;
use fleetgrid_types::{Palette, Result};

use super::status;
use crate::runner::TaskRunner;

#[derive(Debug)]
pub enum PaletteEvent {
    Loaded(Result<Palette>),
    Saved(Result<Palette>),
    Reset(Result<Palette>),
}

pub struct PaletteEditor {
    gateway: Arc<dyn ScheduleGateway>,
    runner: TaskRunner,
    sender: Sender<PaletteEvent>,
    receiver: Receiver<PaletteEvent>,
    /// Hex texts as typed by the user
    pub draft: Palette,
    status: String,
}

impl PaletteEditor {
    pub fn new(gateway: Arc<dyn ScheduleGateway>, runner: TaskRunner) -> Self {
        let (sender, receiver) = channel();
        Self {
            gateway,
            runner,
            sender,
            receiver,
            draft: Palette::default(),
            status: String::new(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Colors to preview: the draft with invalid fields replaced by defaults
    pub fn preview(&self) -> Palette {
        sanitize_palette(&self.draft)
    }

    pub fn load(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        self.runner
            .spawn(&self.sender, move || PaletteEvent::Loaded(gateway.palette()));
    }

    pub fn save(&mut self) {
        self.status = status::SAVING.to_string();
        let palette = self.preview();
        let gateway = Arc::clone(&self.gateway);
        self.runner.spawn(&self.sender, move || {
            PaletteEvent::Saved(gateway.save_palette(&palette))
        });
    }

    pub fn reset(&mut self) {
        self.status = status::RESETTING.to_string();
        let gateway = Arc::clone(&self.gateway);
        self.runner
            .spawn(&self.sender, move || PaletteEvent::Reset(gateway.reset_palette()));
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

    fn handle(&mut self, event: PaletteEvent) {
        match event {
            PaletteEvent::Loaded(Ok(palette)) => self.draft = palette,
            PaletteEvent::Loaded(Err(e)) => debug!(error = %e, "palette unavailable"),
            PaletteEvent::Saved(Ok(palette)) => {
                self.draft = palette;
                self.status = status::SAVED.to_string();
            }
            PaletteEvent::Saved(Err(_)) => self.status = status::SAVE_FAILED.to_string(),
            PaletteEvent::Reset(Ok(palette)) => {
                self.draft = palette;
                self.status = status::RESET_DONE.to_string();
            }
            PaletteEvent::Reset(Err(_)) => self.status = status::RESET_FAILED.to_string(),
        }
    }
}
