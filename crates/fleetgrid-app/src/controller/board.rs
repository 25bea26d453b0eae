//! Board controller: metadata, filters, schedule grid and cell marks

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;

use tracing::{debug, info, warn};

use fleetgrid_domain::model::{sanitize_palette, GridModel};
use fleetgrid_domain::repository::{PreferenceStore, ScheduleGateway};
use fleetgrid_domain::service::filter_picker::DEFAULT_OVERBROAD_THRESHOLD;
use fleetgrid_domain::service::resize::commit_resize;
use fleetgrid_domain::service::{
    FilterPicker, MultiSelect, OverlayManager, RequestGenerations, RequestKind, ResizeUpdate,
};
use fleetgrid_types::{FilterState, MarkRequest, MetaResponse, Palette, Result, SchedulePayload};

use super::status;
use crate::config::Config;
use crate::runner::TaskRunner;

/// Vertical grid scroll beyond this collapses the filter panel
pub const COLLAPSE_SCROLL_OFFSET: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    pub overbroad_threshold: usize,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            overbroad_threshold: DEFAULT_OVERBROAD_THRESHOLD,
        }
    }
}

impl From<&Config> for BoardSettings {
    fn from(config: &Config) -> Self {
        Self {
            overbroad_threshold: config.overbroad_filter_threshold,
        }
    }
}

/// Results posted back by gateway jobs
#[derive(Debug)]
pub enum BoardEvent {
    MetaLoaded {
        generation: u64,
        result: Result<MetaResponse>,
    },
    ScheduleLoaded {
        generation: u64,
        result: Result<SchedulePayload>,
    },
    Marked {
        request: MarkRequest,
        result: Result<()>,
    },
    PaletteLoaded(Result<Palette>),
    Uploaded {
        generation: u64,
        result: Result<MetaResponse>,
    },
    Exported {
        path: PathBuf,
        result: Result<usize>,
    },
}

/// Everything the board screen renders from
#[derive(Debug)]
pub struct BoardState {
    pub meta: MetaResponse,
    /// Restriction sent with schedule requests; mirrors the multi-selects
    pub filters: FilterState,
    /// One control per filterable column, in metadata order
    pub selects: Vec<MultiSelect>,
    pub picker: FilterPicker,
    pub overlay: OverlayManager,
    pub payload: Option<SchedulePayload>,
    pub grid: GridModel,
    pub status: String,
    pub palette: Palette,
    pub day: Option<String>,
    pub filters_collapsed: bool,
    pub uploading: bool,
}

impl BoardState {
    fn new(threshold: usize) -> Self {
        Self {
            meta: MetaResponse::default(),
            filters: FilterState::default(),
            selects: Vec::new(),
            picker: FilterPicker::restore(&[], None, threshold),
            overlay: OverlayManager::new(),
            payload: None,
            grid: GridModel::default(),
            status: String::new(),
            palette: Palette::default(),
            day: None,
            filters_collapsed: false,
            uploading: false,
        }
    }

    pub fn select(&self, column: &str) -> Option<&MultiSelect> {
        self.selects.iter().find(|s| s.column() == column)
    }

    /// Controls to render, in visible-filter order
    pub fn visible_selects(&self) -> Vec<&MultiSelect> {
        self.picker
            .selected()
            .iter()
            .filter_map(|column| self.select(column))
            .collect()
    }
}

/// Owns the board state and sequences every gateway call.
pub struct BoardController {
    gateway: Arc<dyn ScheduleGateway>,
    prefs: Box<dyn PreferenceStore>,
    runner: TaskRunner,
    settings: BoardSettings,
    generations: RequestGenerations,
    sender: Sender<BoardEvent>,
    receiver: Receiver<BoardEvent>,
    in_flight: usize,
    state: BoardState,
}

impl BoardController {
    pub fn new(
        gateway: Arc<dyn ScheduleGateway>,
        prefs: Box<dyn PreferenceStore>,
        runner: TaskRunner,
        settings: BoardSettings,
    ) -> Self {
        let (sender, receiver) = channel();
        Self {
            gateway,
            prefs,
            runner,
            settings,
            generations: RequestGenerations::new(),
            sender,
            receiver,
            in_flight: 0,
            state: BoardState::new(settings.overbroad_threshold),
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn prefs(&self) -> &dyn PreferenceStore {
        self.prefs.as_ref()
    }

    pub fn overlay_mut(&mut self) -> &mut OverlayManager {
        &mut self.state.overlay
    }

    pub fn picker_mut(&mut self) -> &mut FilterPicker {
        &mut self.state.picker
    }

    /// Mutable control for search editing; selection changes go through the
    /// filter methods so the request state stays in sync
    pub fn select_mut(&mut self, column: &str) -> Option<&mut MultiSelect> {
        self.state.selects.iter_mut().find(|s| s.column() == column)
    }

    /// True while any gateway call has not reported back
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce() -> BoardEvent + Send + 'static,
    {
        self.in_flight += 1;
        self.runner.spawn(&self.sender, job);
    }

    /// Palette, then metadata (which chains the first schedule fetch)
    pub fn start(&mut self) {
        self.load_palette();
        self.load_meta();
    }

    pub fn load_palette(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        self.spawn(move || BoardEvent::PaletteLoaded(gateway.palette()));
    }

    pub fn load_meta(&mut self) {
        let generation = self.generations.issue(RequestKind::Meta);
        let gateway = Arc::clone(&self.gateway);
        self.spawn(move || BoardEvent::MetaLoaded {
            generation,
            result: gateway.meta(),
        });
    }

    /// Re-fetch the schedule for the selected day and current filters
    pub fn refresh(&mut self) {
        let Some(day) = self.state.day.clone() else {
            self.state.status = status::PICK_DAY.to_string();
            return;
        };
        self.state.status = status::COUNTING.to_string();
        let generation = self.generations.issue(RequestKind::Schedule);
        let filters = self.state.filters.clone();
        let gateway = Arc::clone(&self.gateway);
        debug!(%day, generation, active = filters.active_count(), "schedule requested");
        self.spawn(move || BoardEvent::ScheduleLoaded {
            generation,
            result: gateway.schedule(&day, &filters),
        });
    }

    pub fn select_day(&mut self, day: &str) {
        if self.state.day.as_deref() == Some(day) {
            return;
        }
        self.state.day = Some(day.to_string());
        self.refresh();
    }

    /// Mirror the controls into the request filters; the grid follows on
    /// the next refresh, day change, upload or mark
    fn sync_filters(&mut self) {
        for select in &self.state.selects {
            self.state
                .filters
                .set(select.column(), select.selection().iter().cloned());
        }
    }

    pub fn toggle_filter_value(&mut self, column: &str, value: &str) {
        let changed = self
            .select_mut(column)
            .map(|s| s.toggle(value))
            .unwrap_or(false);
        if changed {
            self.sync_filters();
        }
    }

    pub fn select_all_values(&mut self, column: &str) {
        if let Some(select) = self.select_mut(column) {
            select.select_all();
            self.sync_filters();
        }
    }

    pub fn clear_filter(&mut self, column: &str) {
        if let Some(select) = self.select_mut(column) {
            select.clear();
            self.sync_filters();
        }
    }

    /// "Очистить фильтры"
    pub fn clear_all_filters(&mut self) {
        for select in &mut self.state.selects {
            select.clear();
        }
        self.sync_filters();
    }

    fn persist_picker(&self) {
        if let Err(e) = self.state.picker.persist(self.prefs.as_ref()) {
            warn!(error = %e, "visible filters not saved");
        }
    }

    /// Show or hide one filter control; its selection is kept either way
    pub fn toggle_visible_filter(&mut self, column: &str) {
        self.state.picker.toggle(column);
        self.persist_picker();
    }

    pub fn show_all_filters(&mut self) {
        self.state.picker.select_all();
        self.persist_picker();
    }

    pub fn hide_all_filters(&mut self) {
        self.state.picker.select_none();
        self.persist_picker();
    }

    /// Click on a grid cell; false when the cell is not toggleable
    pub fn click_cell(&mut self, row: usize, slot_index: usize) -> bool {
        let request = self
            .state
            .grid
            .cell(row, slot_index)
            .and_then(|cell| cell.click_request());
        match request {
            Some(request) => {
                self.mark(request);
                true
            }
            None => false,
        }
    }

    pub fn mark(&mut self, request: MarkRequest) {
        let gateway = Arc::clone(&self.gateway);
        self.spawn(move || {
            let result = gateway.mark(&request);
            BoardEvent::Marked { request, result }
        });
    }

    /// Upload a workbook; None means no file was chosen
    pub fn upload(&mut self, path: Option<&Path>) {
        let Some(path) = path.filter(|p| is_xlsx(p)) else {
            self.state.status = status::PICK_XLSX.to_string();
            return;
        };
        self.state.status = status::LOADING.to_string();
        self.state.uploading = true;
        // An upload replaces the dataset; earlier metadata responses are stale.
        let generation = self.generations.issue(RequestKind::Meta);
        let gateway = Arc::clone(&self.gateway);
        let path = path.to_path_buf();
        info!(path = %path.display(), "uploading workbook");
        self.spawn(move || BoardEvent::Uploaded {
            generation,
            result: gateway.upload(&path),
        });
    }

    /// Save the export of the current day and filters to `path`
    pub fn export(&mut self, path: PathBuf) {
        let Some(day) = self.state.day.clone() else {
            self.state.status = status::PICK_DAY.to_string();
            return;
        };
        let filters = self.state.filters.clone();
        let gateway = Arc::clone(&self.gateway);
        self.spawn(move || {
            let result = gateway.export(&day, &filters).and_then(|bytes| {
                std::fs::write(&path, &bytes)?;
                Ok(bytes.len())
            });
            BoardEvent::Exported { path, result }
        });
    }

    /// Apply a drag move to the live columns and persist it
    pub fn resize_column(&mut self, update: &ResizeUpdate) {
        if let Err(e) = commit_resize(update, &mut self.state.grid.columns, self.prefs.as_ref()) {
            warn!(column = %update.key, error = %e, "column width not saved");
        }
    }

    pub fn on_horizontal_scroll(&mut self) {
        self.state.overlay.close_all();
    }

    /// Vertical grid scroll: close popovers and tuck the filter panel away
    pub fn on_vertical_scroll(&mut self, offset: f32) {
        self.state.overlay.close_all();
        if offset > COLLAPSE_SCROLL_OFFSET {
            self.state.filters_collapsed = true;
        }
    }

    pub fn toggle_filters_panel(&mut self) {
        self.state.filters_collapsed = !self.state.filters_collapsed;
        if self.state.filters_collapsed {
            self.state.overlay.close_all();
        }
    }

    /// Apply every queued result; returns how many events were handled
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    self.handle(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        handled
    }

    fn handle(&mut self, event: BoardEvent) {
        match event {
            BoardEvent::MetaLoaded { generation, result } => {
                if !self.generations.is_current(RequestKind::Meta, generation) {
                    debug!(generation, "stale metadata dropped");
                    return;
                }
                match result {
                    Ok(meta) => self.apply_meta(meta),
                    Err(e) => {
                        warn!(error = %e, "metadata fetch failed");
                        self.state.status = status::FETCH_FAILED.to_string();
                    }
                }
            }
            BoardEvent::ScheduleLoaded { generation, result } => {
                if !self.generations.is_current(RequestKind::Schedule, generation) {
                    debug!(generation, "stale schedule dropped");
                    return;
                }
                match result {
                    Ok(payload) => self.apply_schedule(payload),
                    Err(e) => {
                        warn!(error = %e, "schedule fetch failed");
                        self.state.status = status::FETCH_FAILED.to_string();
                    }
                }
            }
            BoardEvent::Marked { request, result } => match result {
                Ok(()) => {
                    debug!(plate = %request.plate, slot = %request.slot, kind = %request.kind, "marked");
                    self.refresh();
                }
                Err(e) => {
                    warn!(plate = %request.plate, slot = %request.slot, error = %e, "mark rejected");
                }
            },
            BoardEvent::PaletteLoaded(result) => match result {
                Ok(palette) => self.state.palette = sanitize_palette(&palette),
                Err(e) => debug!(error = %e, "palette unavailable, keeping defaults"),
            },
            BoardEvent::Uploaded { generation, result } => {
                self.state.uploading = false;
                if !self.generations.is_current(RequestKind::Meta, generation) {
                    return;
                }
                match result {
                    Ok(meta) => {
                        info!(columns = meta.columns.len(), dates = meta.dates.len(), "workbook loaded");
                        self.state.status = status::UPLOADED.to_string();
                        self.apply_meta(meta);
                    }
                    Err(e) => {
                        warn!(error = %e, "upload failed");
                        self.state.status = status::UPLOAD_FAILED.to_string();
                    }
                }
            }
            BoardEvent::Exported { path, result } => match result {
                Ok(bytes) => {
                    info!(path = %path.display(), bytes, "export saved");
                    self.state.status = status::EXPORTED.to_string();
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "export failed");
                    self.state.status = status::EXPORT_FAILED.to_string();
                }
            },
        }
    }

    /// Rebuild filters, controls and picker for a (new) dataset
    fn apply_meta(&mut self, meta: MetaResponse) {
        self.state.overlay.close_all();

        if !meta.has_data {
            // Drop any in-flight schedule for the previous dataset.
            self.generations.issue(RequestKind::Schedule);
            self.state.filters.reset_columns(&[]);
            self.state.selects.clear();
            self.state.picker =
                FilterPicker::restore(&[], None, self.settings.overbroad_threshold);
            self.state.payload = None;
            self.state.grid = GridModel::default();
            self.state.day = None;
            self.state.meta = meta;
            self.state.status = status::NO_DATA.to_string();
            return;
        }

        let columns = meta.columns.clone();
        self.state.filters.reset_columns(&columns);
        self.state.selects = columns
            .iter()
            .map(|c| MultiSelect::new(c.clone(), meta.values_of(c).to_vec()))
            .collect();
        self.state.picker = FilterPicker::load(
            &columns,
            self.prefs.as_ref(),
            self.settings.overbroad_threshold,
        );
        self.persist_picker();
        self.state.day = meta.dates.first().cloned();
        self.state.meta = meta;
        self.refresh();
    }

    fn apply_schedule(&mut self, payload: SchedulePayload) {
        self.state.grid = GridModel::build(&payload, self.prefs.as_ref());
        self.state.status = payload.summary();
        self.state.payload = Some(payload);
    }
}

fn is_xlsx(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_xlsx() {
        assert!(is_xlsx(Path::new("/tmp/Заявки.XLSX")));
        assert!(!is_xlsx(Path::new("/tmp/report.csv")));
        assert!(!is_xlsx(Path::new("/tmp/xlsx")));
    }
}
