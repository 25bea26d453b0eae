//! In-process fake of the board server

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use fleetgrid_app::controller::BoardSettings;
use fleetgrid_app::{BoardController, TaskRunner};
use fleetgrid_domain::repository::ScheduleGateway;
use fleetgrid_infra::MemoryPreferenceStore;
use fleetgrid_types::{
    DirectoryEntry, Error, Flag, FilterState, Layer, MarkRequest, MetaResponse, Palette, PlanId,
    Result, SchedulePayload, Vehicle,
};

pub const DAY: &str = "2024-01-10";
pub const NEXT_DAY: &str = "2024-01-11";
pub const SLOTS: [&str; 4] = ["08:00", "08:30", "09:00", "09:30"];
const STATUSES: [&str; 3] = ["В работе", "Закрыта", "Новая"];

struct Record {
    vehicle: Vehicle,
    attributes: BTreeMap<String, String>,
}

#[derive(Default)]
struct Layers {
    schedule: HashMap<String, HashMap<String, Flag>>,
    fact: HashMap<String, HashMap<String, Flag>>,
}

pub struct FakeGateway {
    records: Vec<Record>,
    layers: Mutex<HashMap<String, Layers>>,
    palette: Mutex<Palette>,
    directory: Mutex<Vec<DirectoryEntry>>,
    pub marks: Mutex<Vec<MarkRequest>>,
    pub schedule_days: Mutex<Vec<String>>,
    pub schedule_calls: AtomicUsize,
    pub has_data: AtomicBool,
    pub fail_marks: AtomicBool,
    pub fail_meta: AtomicBool,
    schedule_gates: Mutex<HashMap<String, Receiver<()>>>,
    meta_gate: Mutex<Option<Receiver<()>>>,
}

/// Block until the test releases a held call
fn wait_for_release(gate: Option<Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.recv();
    }
}

impl FakeGateway {
    /// Six vehicles cycling through three statuses
    pub fn new() -> Self {
        let records = (0..6)
            .map(|i| {
                let plate = format!("А{:03}АА", i + 1);
                let mut attributes = BTreeMap::new();
                attributes.insert("Статус".to_string(), STATUSES[i % 3].to_string());
                attributes.insert("ТС".to_string(), format!("КАМАЗ {}", i + 1));
                Record {
                    vehicle: Vehicle {
                        vehicle_plate: plate,
                        vehicle_name: format!("КАМАЗ {}", i + 1),
                        vehicle_class: "Самосвал".to_string(),
                        schedule_text: "5/2".to_string(),
                        regime_start: "08:00".to_string(),
                        regime_end: "17:00".to_string(),
                    },
                    attributes,
                }
            })
            .collect();

        Self {
            records,
            layers: Mutex::new(HashMap::new()),
            palette: Mutex::new(Palette::default()),
            directory: Mutex::new(vec![DirectoryEntry {
                vehicle_plate: "А001АА".to_string(),
                schedule_text: "5/2".to_string(),
                regime_start: "08:00".to_string(),
                regime_end: "17:00".to_string(),
            }]),
            marks: Mutex::new(Vec::new()),
            schedule_days: Mutex::new(Vec::new()),
            schedule_calls: AtomicUsize::new(0),
            has_data: AtomicBool::new(true),
            fail_marks: AtomicBool::new(false),
            fail_meta: AtomicBool::new(false),
            schedule_gates: Mutex::new(HashMap::new()),
            meta_gate: Mutex::new(None),
        }
    }

    /// Hold the next schedule request for `day` until the sender fires
    pub fn hold_schedule(&self, day: &str) -> Sender<()> {
        let (release, gate) = channel();
        self.schedule_gates
            .lock()
            .unwrap()
            .insert(day.to_string(), gate);
        release
    }

    /// Hold the next metadata request until the sender fires
    pub fn hold_meta(&self) -> Sender<()> {
        let (release, gate) = channel();
        *self.meta_gate.lock().unwrap() = Some(gate);
        release
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn last_mark(&self) -> Option<MarkRequest> {
        self.marks.lock().unwrap().last().cloned()
    }

    fn meta_response(&self) -> MetaResponse {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in &self.records {
            for (column, value) in &record.attributes {
                let known = values.entry(column.clone()).or_default();
                if !known.contains(value) {
                    known.push(value.clone());
                }
            }
        }
        MetaResponse {
            has_data: true,
            dates: vec![DAY.to_string(), NEXT_DAY.to_string()],
            columns: vec!["Статус".to_string(), "ТС".to_string()],
            values,
        }
    }
}

impl ScheduleGateway for FakeGateway {
    fn meta(&self) -> Result<MetaResponse> {
        let gate = self.meta_gate.lock().unwrap().take();
        wait_for_release(gate);
        if self.fail_meta.load(Ordering::SeqCst) {
            return Err(Error::Http("connection refused".to_string()));
        }
        if !self.has_data.load(Ordering::SeqCst) {
            return Ok(MetaResponse::default());
        }
        Ok(self.meta_response())
    }

    fn schedule(&self, day: &str, filters: &FilterState) -> Result<SchedulePayload> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.schedule_gates.lock().unwrap().remove(day);
        wait_for_release(gate);
        self.schedule_days.lock().unwrap().push(day.to_string());

        let vehicles: Vec<Vehicle> = self
            .records
            .iter()
            .filter(|r| r.attributes.iter().all(|(c, v)| filters.accepts(c, v)))
            .map(|r| r.vehicle.clone())
            .collect();

        let layers = self.layers.lock().unwrap();
        let (schedule, fact) = layers
            .get(day)
            .map(|l| (l.schedule.clone(), l.fact.clone()))
            .unwrap_or_default();

        let mut plan = HashMap::new();
        if let Some(first) = vehicles.first() {
            let mut slots = HashMap::new();
            slots.insert("08:30".to_string(), vec![PlanId::from("1201"), PlanId::from("1202")]);
            plan.insert(first.vehicle_plate.clone(), slots);
        }

        Ok(SchedulePayload {
            day: day.to_string(),
            total_count: self.records.len() as u64,
            filtered_count: vehicles.len() as u64,
            slots: SLOTS.iter().map(|s| s.to_string()).collect(),
            vehicles,
            schedule,
            plan,
            fact,
        })
    }

    fn mark(&self, request: &MarkRequest) -> Result<()> {
        self.marks.lock().unwrap().push(request.clone());
        if self.fail_marks.load(Ordering::SeqCst) {
            return Err(Error::Status {
                code: 500,
                body: "internal error".to_string(),
            });
        }
        let mut layers = self.layers.lock().unwrap();
        let day = layers.entry(request.day.clone()).or_default();
        let target = match request.kind {
            Layer::Schedule => &mut day.schedule,
            Layer::Fact => &mut day.fact,
            Layer::Plan => return Err(Error::Rejected("plan is read-only".to_string())),
        };
        target
            .entry(request.plate.clone())
            .or_default()
            .insert(request.slot.clone(), Flag(request.value()));
        Ok(())
    }

    fn upload(&self, path: &Path) -> Result<MetaResponse> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        self.has_data.store(true, Ordering::SeqCst);
        Ok(self.meta_response())
    }

    fn export(&self, day: &str, filters: &FilterState) -> Result<Vec<u8>> {
        let payload = self.schedule(day, filters)?;
        Ok(format!("export {} {}", day, payload.filtered_count).into_bytes())
    }

    fn palette(&self) -> Result<Palette> {
        Ok(self.palette.lock().unwrap().clone())
    }

    fn save_palette(&self, palette: &Palette) -> Result<Palette> {
        *self.palette.lock().unwrap() = palette.clone();
        Ok(palette.clone())
    }

    fn reset_palette(&self) -> Result<Palette> {
        *self.palette.lock().unwrap() = Palette::default();
        Ok(Palette::default())
    }

    fn directory(&self) -> Result<Vec<DirectoryEntry>> {
        Ok(self.directory.lock().unwrap().clone())
    }

    fn upsert_directory(&self, entry: &DirectoryEntry) -> Result<()> {
        if entry.vehicle_plate.is_empty() {
            return Err(Error::Status {
                code: 400,
                body: "vehicle_plate is required".to_string(),
            });
        }
        let mut items = self.directory.lock().unwrap();
        items.retain(|e| e.vehicle_plate != entry.vehicle_plate);
        items.push(entry.clone());
        Ok(())
    }

    fn delete_directory(&self, plate: &str) -> Result<()> {
        self.directory
            .lock()
            .unwrap()
            .retain(|e| e.vehicle_plate != plate);
        Ok(())
    }
}

/// Controller over a fresh fake with inline execution and in-memory preferences
pub fn board() -> (BoardController, Arc<FakeGateway>) {
    let fake = Arc::new(FakeGateway::new());
    let controller = BoardController::new(
        fake.clone(),
        Box::new(MemoryPreferenceStore::new()),
        TaskRunner::Inline,
        BoardSettings::default(),
    );
    (controller, fake)
}

/// Started board with every queued result applied
pub fn started_board() -> (BoardController, Arc<FakeGateway>) {
    let (mut controller, fake) = board();
    controller.start();
    controller.poll();
    (controller, fake)
}

/// Controller running gateway calls on worker threads
pub fn threaded_board() -> (BoardController, Arc<FakeGateway>) {
    let fake = Arc::new(FakeGateway::new());
    let controller = BoardController::new(
        fake.clone(),
        Box::new(MemoryPreferenceStore::new()),
        TaskRunner::Threaded,
        BoardSettings::default(),
    );
    (controller, fake)
}

/// Poll until `done` holds, failing after five seconds
pub fn poll_until(controller: &mut BoardController, done: impl Fn(&BoardController) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        controller.poll();
        if done(controller) {
            return;
        }
        assert!(Instant::now() < deadline, "board did not settle");
        thread::sleep(Duration::from_millis(5));
    }
}
