//! Wire types shared by the gateway, the controller and the renderers

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Deserialize null as default value
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// One of the three stacked per-vehicle rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Planned working interval
    Schedule,
    /// Assigned request numbers (read-only)
    Plan,
    /// Recorded actual activity
    Fact,
}

impl Layer {
    /// Render order of the three rows
    pub const ALL: [Layer; 3] = [Layer::Schedule, Layer::Plan, Layer::Fact];

    /// Row label shown in the layer column
    pub fn label(&self) -> &'static str {
        match self {
            Layer::Schedule => "График работы",
            Layer::Plan => "План",
            Layer::Fact => "Факт",
        }
    }

    /// Wire name used by `/api/mark`
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Schedule => "schedule",
            Layer::Plan => "plan",
            Layer::Fact => "fact",
        }
    }

    /// Only schedule and fact cells can be toggled
    pub fn is_mutable(&self) -> bool {
        !matches!(self, Layer::Plan)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "schedule" => Ok(Layer::Schedule),
            "plan" => Ok(Layer::Plan),
            "fact" => Ok(Layer::Fact),
            other => Err(format!("unknown layer: {}", other)),
        }
    }
}

/// Boolean cell value; the server sends `0|1`, older payloads `true|false`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        let set = match value {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
            _ => false,
        };
        Ok(Flag(set))
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.0))
    }
}

/// Request number assigned in the plan layer (numeric or textual on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanId(pub String);

impl<'de> Deserialize<'de> for PlanId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let text = match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        Ok(PlanId(text))
    }
}

impl Serialize for PlanId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlanId {
    fn from(s: &str) -> Self {
        PlanId(s.to_string())
    }
}

/// Vehicle row descriptor, keyed by license plate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Госномер, unique key
    pub vehicle_plate: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_class: String,
    /// Free-form work pattern (e.g. "5/2 8 часов")
    #[serde(default, deserialize_with = "null_to_default")]
    pub schedule_text: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub regime_start: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub regime_end: String,
}

impl Vehicle {
    /// "07:00 - 18:00" when both ends are known, otherwise empty
    pub fn regime_range(&self) -> String {
        let start = self.regime_start.trim();
        let end = self.regime_end.trim();
        if start.is_empty() || end.is_empty() {
            String::new()
        } else {
            format!("{} - {}", start, end)
        }
    }
}

/// Known column values per filterable column
pub type ColumnValues = BTreeMap<String, Vec<String>>;

/// `GET /api/meta` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaResponse {
    #[serde(default)]
    pub has_data: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub values: ColumnValues,
}

impl MetaResponse {
    /// Known values of one column (empty for unknown columns)
    pub fn values_of(&self, column: &str) -> &[String] {
        self.values.get(column).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// `POST /api/upload` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub values: ColumnValues,
}

impl UploadResponse {
    /// An accepted upload carries the same information as a metadata load
    pub fn into_meta(self) -> MetaResponse {
        MetaResponse {
            has_data: self.ok,
            dates: self.dates,
            columns: self.columns,
            values: self.values,
        }
    }
}

/// plate -> slot -> flag
pub type FlagLayer = HashMap<String, HashMap<String, Flag>>;
/// plate -> slot -> request ids
pub type PlanLayer = HashMap<String, HashMap<String, Vec<PlanId>>>;

/// `GET /api/schedule` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulePayload {
    #[serde(default, deserialize_with = "null_to_default")]
    pub day: String,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub filtered_count: u64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slots: Vec<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicles: Vec<Vehicle>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub schedule: FlagLayer,
    #[serde(default, deserialize_with = "null_to_default")]
    pub plan: PlanLayer,
    #[serde(default, deserialize_with = "null_to_default")]
    pub fact: FlagLayer,
}

impl SchedulePayload {
    /// Boolean value of a schedule/fact cell; plan cells report "has any id"
    pub fn flag(&self, layer: Layer, plate: &str, slot: &str) -> bool {
        let source = match layer {
            Layer::Schedule => &self.schedule,
            Layer::Fact => &self.fact,
            Layer::Plan => return !self.plan_ids(plate, slot).is_empty(),
        };
        source
            .get(plate)
            .and_then(|slots| slots.get(slot))
            .map(|f| f.0)
            .unwrap_or(false)
    }

    /// Request ids assigned to a plan cell
    pub fn plan_ids(&self, plate: &str, slot: &str) -> &[PlanId] {
        self.plan
            .get(plate)
            .and_then(|slots| slots.get(slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Status line summary ("Показано заявок: F / T")
    pub fn summary(&self) -> String {
        format!("Показано заявок: {} / {}", self.filtered_count, self.total_count)
    }
}

/// `POST /api/mark` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkRequest {
    pub day: String,
    pub plate: String,
    pub kind: Layer,
    pub slot: String,
    /// 0 or 1
    pub value: u8,
}

impl MarkRequest {
    pub fn new(day: &str, plate: &str, kind: Layer, slot: &str, value: bool) -> Self {
        Self {
            day: day.to_string(),
            plate: plate.to_string(),
            kind,
            slot: slot.to_string(),
            value: u8::from(value),
        }
    }

    pub fn value(&self) -> bool {
        self.value != 0
    }
}

/// Presentation colors served by `/api/palette`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub accent: String,
    pub schedule_fill: String,
    pub plan_fill: String,
    pub fact_fill: String,
    pub border: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: "#55b4c7".to_string(),
            schedule_fill: "#55b4c7".to_string(),
            plan_fill: "#55b4c7".to_string(),
            fact_fill: "#2563eb".to_string(),
            border: "#0b0f14".to_string(),
        }
    }
}

/// Vehicle master record edited in the directory screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_plate: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub schedule_text: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub regime_start: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub regime_end: String,
}

impl DirectoryEntry {
    /// Copy with every field trimmed, as sent to the server
    pub fn trimmed(&self) -> Self {
        Self {
            vehicle_plate: self.vehicle_plate.trim().to_string(),
            schedule_text: self.schedule_text.trim().to_string(),
            regime_start: self.regime_start.trim().to_string(),
            regime_end: self.regime_end.trim().to_string(),
        }
    }
}

/// `GET /api/directory` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryList {
    #[serde(default, deserialize_with = "null_to_default")]
    pub items: Vec<DirectoryEntry>,
}

/// Generic `{ok: true}` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

/// Format an ISO date as "DD.MM.YYYY"; anything else is shown verbatim
pub fn day_label(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flags_accept_ints_bools_and_null() {
        let payload: SchedulePayload = serde_json::from_value(json!({
            "day": "2024-01-10",
            "slots": ["00:00", "00:30", "01:00", "01:30"],
            "vehicles": [{"vehicle_plate": "А001АА", "vehicle_name": null}],
            "schedule": {"А001АА": {"00:00": 1, "00:30": 0, "01:00": true, "01:30": null}},
            "plan": {},
            "fact": null
        }))
        .unwrap();

        assert!(payload.flag(Layer::Schedule, "А001АА", "00:00"));
        assert!(!payload.flag(Layer::Schedule, "А001АА", "00:30"));
        assert!(payload.flag(Layer::Schedule, "А001АА", "01:00"));
        assert!(!payload.flag(Layer::Schedule, "А001АА", "01:30"));
        assert!(!payload.flag(Layer::Fact, "А001АА", "00:00"));
        assert_eq!(payload.vehicles[0].vehicle_name, "");
    }

    #[test]
    fn test_plan_ids_numeric_and_text() {
        let payload: SchedulePayload = serde_json::from_value(json!({
            "plan": {"P1": {"08:00": [1201, "1202"]}}
        }))
        .unwrap();

        let ids = payload.plan_ids("P1", "08:00");
        assert_eq!(ids, &[PlanId::from("1201"), PlanId::from("1202")]);
        assert!(payload.flag(Layer::Plan, "P1", "08:00"));
        assert!(payload.plan_ids("P1", "08:30").is_empty());
    }

    #[test]
    fn test_mark_request_wire_shape() {
        let req = MarkRequest::new("2024-01-10", "А001АА", Layer::Fact, "08:00", true);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"day": "2024-01-10", "plate": "А001АА", "kind": "fact", "slot": "08:00", "value": 1})
        );
    }

    #[test]
    fn test_regime_range() {
        let mut v = Vehicle {
            vehicle_plate: "X".into(),
            regime_start: "07:00".into(),
            regime_end: "18:00".into(),
            ..Default::default()
        };
        assert_eq!(v.regime_range(), "07:00 - 18:00");
        v.regime_end.clear();
        assert_eq!(v.regime_range(), "");
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label("2024-01-10"), "10.01.2024");
        assert_eq!(day_label("завтра"), "завтра");
    }

    #[test]
    fn test_meta_without_data() {
        let meta: MetaResponse = serde_json::from_str(r#"{"has_data": false}"#).unwrap();
        assert!(!meta.has_data);
        assert!(meta.columns.is_empty());
        assert!(meta.values_of("Статус").is_empty());
    }
}
