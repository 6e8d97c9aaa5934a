use serde::{Deserialize, Serialize};

/// One measurement job as stored in the `jobs` collection. Field aliases
/// accept documents exported from the legacy web app unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "contactPerson")]
    pub contact_person: Option<String>,
    #[serde(default, alias = "contactPhone")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub inspectors: Vec<String>,
    #[serde(default)]
    pub analysts: Vec<String>,
    #[serde(default, alias = "reportCreator")]
    pub report_creator: Option<String>,
    #[serde(default)]
    pub results: Vec<MeasurementResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementResult {
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default, alias = "workType")]
    pub work_type: Option<String>,
    #[serde(default, alias = "measurementType")]
    pub kind: MeasurementKind,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default, alias = "spotValue")]
    pub spot_value: Option<String>,
    #[serde(default, alias = "areaAvgValue")]
    pub area_avg_value: Option<String>,
    #[serde(default, alias = "areaMinValue")]
    pub area_min_value: Option<String>,
    /// Compared verbatim against the configured pass word; anything else is
    /// rendered as the fail case.
    #[serde(default)]
    pub evaluation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeasurementKind {
    Spot,
    Area,
}

impl Default for MeasurementKind {
    fn default() -> Self {
        MeasurementKind::Area
    }
}

impl From<String> for MeasurementKind {
    fn from(raw: String) -> Self {
        // Anything that is not exactly "spot" takes the area branch.
        if raw == "spot" {
            MeasurementKind::Spot
        } else {
            MeasurementKind::Area
        }
    }
}

impl From<MeasurementKind> for String {
    fn from(kind: MeasurementKind) -> Self {
        match kind {
            MeasurementKind::Spot => "spot".to_string(),
            MeasurementKind::Area => "area".to_string(),
        }
    }
}

/// Master-data record for one staff member, keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectorRecord {
    #[serde(alias = "inspectorName")]
    pub name: String,
    #[serde(default, alias = "inspectorTitle")]
    pub title: String,
    #[serde(default, alias = "inspectorLicense")]
    pub license: Option<String>,
    #[serde(default)]
    pub role: Option<StaffRole>,
}

impl InspectorRecord {
    /// Synthesized record for a name with no master-data entry.
    pub fn unknown(name: &str) -> Self {
        InspectorRecord {
            name: name.to_string(),
            title: String::new(),
            license: None,
            role: None,
        }
    }

    /// Explicit role when present, else classified from the title markers
    /// the legacy data used.
    pub fn effective_role(&self) -> StaffRole {
        if let Some(role) = self.role {
            return role;
        }
        StaffRole::from_title(&self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StaffRole {
    Controller,
    Inspector,
    Analyst,
    Officer,
    Unspecified,
}

const MARKER_CONTROLLER: &str = "ผู้ควบคุม";
const MARKER_INSPECTOR: &str = "ผู้ตรวจวัด";
const MARKER_ANALYST: &str = "นักวิชาการ";
const MARKER_OFFICER: &str = "เจ้าหน้าที่";

impl StaffRole {
    pub fn from_title(title: &str) -> StaffRole {
        if title.contains(MARKER_CONTROLLER) {
            StaffRole::Controller
        } else if title.contains(MARKER_INSPECTOR) {
            StaffRole::Inspector
        } else if title.contains(MARKER_ANALYST) {
            StaffRole::Analyst
        } else if title.contains(MARKER_OFFICER) {
            StaffRole::Officer
        } else {
            StaffRole::Unspecified
        }
    }

    /// The "inspectors" staff filter spans measurement, analysis and officer
    /// roles; controllers and unclassified staff are excluded.
    pub fn is_field_staff(self) -> bool {
        matches!(
            self,
            StaffRole::Inspector | StaffRole::Analyst | StaffRole::Officer
        )
    }
}

impl From<String> for StaffRole {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "controller" => StaffRole::Controller,
            "inspector" => StaffRole::Inspector,
            "analyst" => StaffRole::Analyst,
            "officer" => StaffRole::Officer,
            _ => StaffRole::Unspecified,
        }
    }
}

impl From<StaffRole> for String {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Controller => "controller",
            StaffRole::Inspector => "inspector",
            StaffRole::Analyst => "analyst",
            StaffRole::Officer => "officer",
            StaffRole::Unspecified => "unspecified",
        }
        .to_string()
    }
}

/// Company master data; at most one active instance exists in the store.
/// Every license field is independently optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub license_factory: Option<String>,
    #[serde(default)]
    pub license_chemical_measurement: Option<String>,
    #[serde(default)]
    pub license_chemical_analysis: Option<String>,
    #[serde(default)]
    pub license_heat: Option<String>,
    #[serde(default)]
    pub license_welfare_light: Option<String>,
    #[serde(default)]
    pub license_sound: Option<String>,
    #[serde(default)]
    pub standard_remarks: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub inspectors: Vec<InspectorRecord>,
    #[serde(default)]
    pub company: Option<CompanyInfo>,
}

impl MasterData {
    pub fn inspector(&self, name: &str) -> Option<&InspectorRecord> {
        self.inspectors.iter().find(|i| i.name == name)
    }
}
