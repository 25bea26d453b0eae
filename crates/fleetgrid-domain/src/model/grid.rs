//! Grid layout model built from a schedule payload
//!
//! The model is rebuilt from scratch for every payload; renderers only read it,
//! except for column widths which drag-resize updates in place.

use fleetgrid_types::{Layer, MarkRequest, PlanId, SchedulePayload, Vehicle};

use crate::repository::PreferenceStore;
use crate::service::column_widths::saved_width;

/// Key prefix of slot columns (`t_08:30`)
pub const SLOT_KEY_PREFIX: &str = "t_";
/// Default width of a slot column
pub const SLOT_DEFAULT_WIDTH: f32 = 44.0;
/// Descriptive cells span the three layer rows of a vehicle
pub const DESCRIPTIVE_ROW_SPAN: usize = 3;

/// Pinned column definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyColumn {
    pub key: &'static str,
    pub title: &'static str,
    pub default_width: f32,
}

/// The six pinned columns, left to right. Start widths are compact; the
/// dispatcher widens what they need.
pub const STICKY_COLUMNS: [StickyColumn; 6] = [
    StickyColumn { key: "st1", title: "ТС", default_width: 110.0 },
    StickyColumn { key: "st2", title: "Гос номер ТС", default_width: 80.0 },
    StickyColumn { key: "st3", title: "Класс ТС", default_width: 160.0 },
    StickyColumn { key: "st4", title: "График работы", default_width: 105.0 },
    StickyColumn { key: "st5", title: "Режим работы", default_width: 105.0 },
    StickyColumn { key: "st6", title: "", default_width: 82.0 },
];

pub fn slot_key(slot: &str) -> String {
    format!("{}{}", SLOT_KEY_PREFIX, slot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Sticky,
    Slot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Stable key used for width persistence
    pub key: String,
    pub title: String,
    pub kind: ColumnKind,
    pub width: f32,
}

/// Widths shared by header and body, so both always line up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnGroup {
    columns: Vec<ColumnSpec>,
}

impl ColumnGroup {
    /// Sticky columns then one column per slot, seeded from saved widths
    pub fn build(slots: &[String], store: &dyn PreferenceStore) -> Self {
        let mut columns = Vec::with_capacity(STICKY_COLUMNS.len() + slots.len());
        for sticky in STICKY_COLUMNS.iter() {
            columns.push(ColumnSpec {
                key: sticky.key.to_string(),
                title: sticky.title.to_string(),
                kind: ColumnKind::Sticky,
                width: saved_width(store, sticky.key, sticky.default_width),
            });
        }
        for slot in slots {
            let key = slot_key(slot);
            columns.push(ColumnSpec {
                width: saved_width(store, &key, SLOT_DEFAULT_WIDTH),
                key,
                title: slot.clone(),
                kind: ColumnKind::Slot,
            });
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn sticky_columns(&self) -> &[ColumnSpec] {
        &self.columns[..STICKY_COLUMNS.len().min(self.columns.len())]
    }

    pub fn slot_columns(&self) -> &[ColumnSpec] {
        &self.columns[STICKY_COLUMNS.len().min(self.columns.len())..]
    }

    pub fn width(&self, key: &str) -> Option<f32> {
        self.columns.iter().find(|c| c.key == key).map(|c| c.width)
    }

    /// Update one column's live width; false for unknown keys
    pub fn set_width(&mut self, key: &str, width: f32) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.width = width;
                true
            }
            None => false,
        }
    }

    /// Left offset of each sticky column: the running sum of the widths before it
    pub fn sticky_offsets(&self) -> Vec<f32> {
        let mut x = 0.0;
        self.sticky_columns()
            .iter()
            .map(|c| {
                let left = x;
                x += c.width;
                left.round()
            })
            .collect()
    }

    /// Combined width of the pinned block
    pub fn sticky_width(&self) -> f32 {
        self.sticky_columns().iter().map(|c| c.width).sum()
    }

    /// Left offset of each slot column relative to the first slot column
    pub fn slot_offsets(&self) -> Vec<f32> {
        let mut x = 0.0;
        self.slot_columns()
            .iter()
            .map(|c| {
                let left = x;
                x += c.width;
                left
            })
            .collect()
    }

    /// Combined width of all slot columns
    pub fn slots_width(&self) -> f32 {
        self.slot_columns().iter().map(|c| c.width).sum()
    }

    /// Width of the first time column; 0 when the day has no slots
    pub fn first_slot_width(&self) -> f32 {
        self.slot_columns().first().map(|c| c.width).unwrap_or(0.0)
    }
}

/// Identity of a mutable cell, carried by the rendered cell itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTarget {
    pub day: String,
    pub plate: String,
    pub kind: Layer,
    pub slot: String,
}

impl CellTarget {
    /// Mutation flipping the value the cell currently shows
    pub fn toggle_request(&self, current: bool) -> MarkRequest {
        MarkRequest::new(&self.day, &self.plate, self.kind, &self.slot, !current)
    }
}

/// One (vehicle, layer, slot) cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    /// Schedule or fact: clickable filled/unfilled indicator
    Flag { filled: bool, target: CellTarget },
    /// Plan: read-only request tag
    Plan {
        tag: Option<String>,
        details: Option<String>,
    },
}

impl CellView {
    pub fn is_filled(&self) -> bool {
        match self {
            CellView::Flag { filled, .. } => *filled,
            CellView::Plan { tag, .. } => tag.is_some(),
        }
    }

    /// Mutation for a click on this cell; None for plan cells
    pub fn click_request(&self) -> Option<MarkRequest> {
        match self {
            CellView::Flag { filled, target } => Some(target.toggle_request(*filled)),
            CellView::Plan { .. } => None,
        }
    }
}

/// "№1201" or "№1201 +2"
pub fn plan_tag(ids: &[PlanId]) -> Option<String> {
    let first = ids.first()?;
    let extra = if ids.len() > 1 {
        format!(" +{}", ids.len() - 1)
    } else {
        String::new()
    };
    Some(format!("№{}{}", first, extra))
}

/// Full listing for cells holding several requests
pub fn plan_details(ids: &[PlanId]) -> Option<String> {
    if ids.len() > 1 {
        Some(
            ids.iter()
                .map(|id| format!("№{}", id))
                .collect::<Vec<_>>()
                .join(", "),
        )
    } else {
        None
    }
}

/// Descriptive cells spanning a vehicle's three rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptiveCells {
    pub name: String,
    pub plate: String,
    pub class: String,
    pub schedule_text: String,
    pub regime: String,
}

impl DescriptiveCells {
    fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            name: vehicle.vehicle_name.clone(),
            plate: vehicle.vehicle_plate.clone(),
            class: vehicle.vehicle_class.clone(),
            schedule_text: vehicle.schedule_text.clone(),
            regime: vehicle.regime_range(),
        }
    }

    /// Texts in sticky column order (st1..st5)
    pub fn texts(&self) -> [&str; 5] {
        [
            &self.name,
            &self.plate,
            &self.class,
            &self.schedule_text,
            &self.regime,
        ]
    }
}

/// One body row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub vehicle_index: usize,
    pub layer: Layer,
    /// Alternate background band (every second vehicle)
    pub alternate: bool,
    /// Present on the first row of each vehicle only
    pub descriptive: Option<DescriptiveCells>,
    pub cells: Vec<CellView>,
}

impl GridRow {
    pub fn layer_label(&self) -> &'static str {
        self.layer.label()
    }
}

/// Renderable board for one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridModel {
    pub day: String,
    pub slots: Vec<String>,
    pub columns: ColumnGroup,
    pub rows: Vec<GridRow>,
}

impl GridModel {
    pub fn build(payload: &SchedulePayload, store: &dyn PreferenceStore) -> Self {
        let columns = ColumnGroup::build(&payload.slots, store);
        let mut rows = Vec::with_capacity(payload.vehicles.len() * Layer::ALL.len());

        for (vehicle_index, vehicle) in payload.vehicles.iter().enumerate() {
            let plate = vehicle.vehicle_plate.as_str();
            for (layer_index, layer) in Layer::ALL.iter().copied().enumerate() {
                let cells = payload
                    .slots
                    .iter()
                    .map(|slot| build_cell(payload, layer, plate, slot))
                    .collect();
                rows.push(GridRow {
                    vehicle_index,
                    layer,
                    alternate: vehicle_index % 2 == 1,
                    descriptive: (layer_index == 0).then(|| DescriptiveCells::from_vehicle(vehicle)),
                    cells,
                });
            }
        }

        Self {
            day: payload.day.clone(),
            slots: payload.slots.clone(),
            columns,
            rows,
        }
    }

    /// Header titles: sticky titles followed by slot labels
    pub fn header_titles(&self) -> Vec<&str> {
        self.columns.columns().iter().map(|c| c.title.as_str()).collect()
    }

    pub fn vehicle_count(&self) -> usize {
        self.rows.len() / Layer::ALL.len()
    }

    pub fn cell(&self, row: usize, slot_index: usize) -> Option<&CellView> {
        self.rows.get(row)?.cells.get(slot_index)
    }
}

fn build_cell(payload: &SchedulePayload, layer: Layer, plate: &str, slot: &str) -> CellView {
    match layer {
        Layer::Plan => {
            let ids = payload.plan_ids(plate, slot);
            CellView::Plan {
                tag: plan_tag(ids),
                details: plan_details(ids),
            }
        }
        Layer::Schedule | Layer::Fact => CellView::Flag {
            filled: payload.flag(layer, plate, slot),
            target: CellTarget {
                day: payload.day.clone(),
                plate: plate.to_string(),
                kind: layer,
                slot: slot.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::MemoryStore;
    use crate::service::column_widths::save_width;
    use crate::service::resize::{commit_resize, ColumnResizer};
    use serde_json::json;

    fn payload() -> SchedulePayload {
        serde_json::from_value(json!({
            "day": "2024-01-10",
            "total_count": 5,
            "filtered_count": 5,
            "slots": ["08:00", "08:30", "09:00"],
            "vehicles": [
                {"vehicle_plate": "А001АА", "vehicle_name": "КАМАЗ", "vehicle_class": "Самосвал",
                 "schedule_text": "5/2", "regime_start": "08:00", "regime_end": "17:00"},
                {"vehicle_plate": "В002ВВ", "vehicle_name": "ГАЗель", "vehicle_class": "Фургон"}
            ],
            "schedule": {"А001АА": {"08:00": 1, "08:30": 1}},
            "plan": {"А001АА": {"08:30": [1201]}, "В002ВВ": {"09:00": [77, 78, 79]}},
            "fact": {"В002ВВ": {"08:00": 1}}
        }))
        .unwrap()
    }

    #[test]
    fn test_three_rows_per_vehicle_in_layer_order() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        assert_eq!(grid.rows.len(), 6);
        assert_eq!(grid.vehicle_count(), 2);
        let layers: Vec<Layer> = grid.rows.iter().map(|r| r.layer).collect();
        assert_eq!(
            layers,
            vec![Layer::Schedule, Layer::Plan, Layer::Fact, Layer::Schedule, Layer::Plan, Layer::Fact]
        );
        assert_eq!(grid.rows[1].layer_label(), "План");
    }

    #[test]
    fn test_descriptive_cells_only_on_first_row() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        let first = grid.rows[0].descriptive.as_ref().unwrap();
        assert_eq!(first.texts(), ["КАМАЗ", "А001АА", "Самосвал", "5/2", "08:00 - 17:00"]);
        assert!(grid.rows[1].descriptive.is_none());
        assert!(grid.rows[2].descriptive.is_none());
        assert_eq!(grid.rows[3].descriptive.as_ref().unwrap().regime, "");
    }

    #[test]
    fn test_alternate_band_every_second_vehicle() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        assert!(grid.rows[..3].iter().all(|r| !r.alternate));
        assert!(grid.rows[3..].iter().all(|r| r.alternate));
    }

    #[test]
    fn test_plan_tags() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        assert_eq!(
            grid.cell(1, 1),
            Some(&CellView::Plan { tag: Some("№1201".into()), details: None })
        );
        assert_eq!(
            grid.cell(4, 2),
            Some(&CellView::Plan {
                tag: Some("№77 +2".into()),
                details: Some("№77, №78, №79".into())
            })
        );
        assert_eq!(grid.cell(4, 0).unwrap().click_request(), None);
    }

    #[test]
    fn test_click_request_negates_rendered_value() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        let filled = grid.cell(0, 0).unwrap();
        assert!(filled.is_filled());
        let req = filled.click_request().unwrap();
        assert_eq!(req.kind, Layer::Schedule);
        assert_eq!(req.value, 0);

        let empty_fact = grid.cell(2, 1).unwrap();
        let req = empty_fact.click_request().unwrap();
        assert_eq!(
            req,
            MarkRequest::new("2024-01-10", "А001АА", Layer::Fact, "08:30", true)
        );
    }

    #[test]
    fn test_header_and_default_widths() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&payload(), &store);
        let titles = grid.header_titles();
        assert_eq!(&titles[..6], &["ТС", "Гос номер ТС", "Класс ТС", "График работы", "Режим работы", ""]);
        assert_eq!(&titles[6..], &["08:00", "08:30", "09:00"]);
        assert_eq!(grid.columns.width("t_08:30"), Some(SLOT_DEFAULT_WIDTH));
        assert_eq!(grid.columns.sticky_offsets(), vec![0.0, 110.0, 190.0, 350.0, 455.0, 560.0]);
        assert_eq!(grid.columns.sticky_width(), 642.0);
    }

    #[test]
    fn test_saved_widths_are_reapplied() {
        let store = MemoryStore::default();
        save_width(&store, "st2", 95.0).unwrap();
        save_width(&store, "t_08:00", 60.0).unwrap();
        store.set("colw:st3", "garbage").unwrap();
        store.set("colw:st4", "7").unwrap();

        let columns = ColumnGroup::build(&payload().slots, &store);
        assert_eq!(columns.width("st2"), Some(95.0));
        assert_eq!(columns.width("st3"), Some(160.0));
        assert_eq!(columns.width("st4"), Some(105.0));
        assert_eq!(columns.first_slot_width(), 60.0);
        assert_eq!(columns.sticky_offsets()[2], 205.0);
    }

    #[test]
    fn test_resize_round_trip_through_store() {
        let store = MemoryStore::default();
        let mut columns = ColumnGroup::build(&payload().slots, &store);
        let mut resizer = ColumnResizer::new();

        resizer.begin("st1", 110.0, 300.0);
        let update = resizer.drag_to(340.0).unwrap();
        commit_resize(&update, &mut columns, &store).unwrap();
        assert_eq!(columns.width("st1"), Some(150.0));
        assert_eq!(columns.sticky_offsets()[1], 150.0);
        resizer.end();
        assert!(resizer.drag_to(500.0).is_none());

        // "reload"
        let reloaded = ColumnGroup::build(&payload().slots, &store);
        assert_eq!(reloaded.width("st1"), Some(150.0));
    }

    #[test]
    fn test_resize_floors() {
        let mut resizer = ColumnResizer::new();
        resizer.begin("t_08:00", 44.0, 100.0);
        assert_eq!(resizer.drag_to(0.0).unwrap().width, 26.0);
        resizer.begin("st5", 105.0, 100.0);
        assert_eq!(resizer.drag_to(0.0).unwrap().width, 60.0);
        assert_eq!(resizer.active_key(), Some("st5"));
    }

    #[test]
    fn test_empty_day_has_no_slot_columns() {
        let store = MemoryStore::default();
        let grid = GridModel::build(&SchedulePayload::default(), &store);
        assert_eq!(grid.columns.columns().len(), 6);
        assert_eq!(grid.columns.first_slot_width(), 0.0);
        assert_eq!(grid.vehicle_count(), 0);
    }
}
