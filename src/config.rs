use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Render settings plus tool configuration. Sections merge shallowly: an
/// omitted section takes its documented default wholesale, a present section
/// must supply every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub page: Page,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub header: Header,
    #[serde(default)]
    pub footer: Footer,
    #[serde(default)]
    pub watermark: Watermark,
    #[serde(default)]
    pub table: Table,
    #[serde(default)]
    pub strings: Strings,
    #[serde(default)]
    pub assemble: Assemble,
    #[serde(default)]
    pub store: Store,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page: Default::default(),
            margins: Default::default(),
            header: Default::default(),
            footer: Default::default(),
            watermark: Default::default(),
            table: Default::default(),
            strings: Default::default(),
            assemble: Default::default(),
            store: Default::default(),
            output: Default::default(),
            export: Default::default(),
            locale: Default::default(),
            logging: Default::default(),
            debug: Default::default(),
            security: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub paper_size: String,
    pub orientation: String,
}
impl Default for Page {
    fn default() -> Self {
        Self {
            paper_size: "A4".into(),
            orientation: "portrait".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Margins {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}
impl Default for Margins {
    fn default() -> Self {
        Self {
            top: "15mm".into(),
            bottom: "15mm".into(),
            left: "15mm".into(),
            right: "15mm".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub enabled: bool,
    pub text: String,
    pub align: String,
    pub font_size: String,
}
impl Default for Header {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "".into(),
            align: "center".into(),
            font_size: "12px".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    pub enabled: bool,
    pub text: String,
    pub align: String,
    pub font_size: String,
}
impl Default for Footer {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "หน้า {page} จาก {total}".into(),
            align: "center".into(),
            font_size: "10px".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Watermark {
    pub enabled: bool,
    pub text: String,
    pub opacity: f32,
    pub size: String,
    pub color: String,
    pub rotation: i32,
}
impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "".into(),
            opacity: 0.2,
            size: "48px".into(),
            color: "#cccccc".into(),
            rotation: 45,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Rows per page for the tag-expanded results tables.
    pub items_per_page: usize,
    /// Rows per page for the denser print-CSS table variant.
    pub items_per_page_print: usize,
    pub value_placeholder: String,
}
impl Default for Table {
    fn default() -> Self {
        Self {
            items_per_page: 20,
            items_per_page_print: 15,
            value_placeholder: "-".into(),
        }
    }
}

/// Localized report phrases. Defaults match the Thai wording of the legacy
/// app; the pass word doubles as the exact-match key for evaluation styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strings {
    pub pass_word: String,
    pub fail_word: String,
    pub not_specified: String,
    pub no_results: String,
    pub no_details: String,
    pub no_license_info: String,
    pub report_title: String,
    pub document_label: String,
    pub page_caption: String,
    pub summary_title: String,
    pub label_total: String,
    pub label_pass: String,
    pub label_fail: String,
    pub label_pass_rate: String,
    pub label_spot: String,
    pub label_area: String,
    pub label_average: String,
    pub label_minimum: String,
    pub remark_master_title: String,
    pub remark_job_title: String,
    pub no_job_remarks: String,
    pub observations_label: String,
}
impl Default for Strings {
    fn default() -> Self {
        Self {
            pass_word: "ผ่าน".into(),
            fail_word: "ไม่ผ่าน".into(),
            not_specified: "ไม่ระบุ".into(),
            no_results: "ไม่มีข้อมูลการตรวจวัด".into(),
            no_details: "ไม่มีรายละเอียดการตรวจวัด".into(),
            no_license_info: "ไม่พบข้อมูลใบอนุญาต".into(),
            report_title: "รายงานการตรวจวัดความสว่าง".into(),
            document_label: "รายงาน".into(),
            page_caption: "หน้าที่ {page} จาก {total} (รายการที่ {first}-{last} จากทั้งหมด {count} รายการ)"
                .into(),
            summary_title: "สรุปผลการตรวจวัดความสว่าง".into(),
            label_total: "รวมทั้งหมด".into(),
            label_pass: "ผ่านเกณฑ์".into(),
            label_fail: "ไม่ผ่านเกณฑ์".into(),
            label_pass_rate: "อัตราผ่านเกณฑ์".into(),
            label_spot: "แบบจุด".into(),
            label_area: "แบบพื้นที่".into(),
            label_average: "เฉลี่ย".into(),
            label_minimum: "ต่ำสุด".into(),
            remark_master_title: "ข้อเสนอแนะมาตรฐาน".into(),
            remark_job_title: "ข้อเสนอแนะเฉพาะงาน".into(),
            no_job_remarks: "ไม่มีข้อเสนอแนะเฉพาะสำหรับงานนี้".into(),
            observations_label: "ข้อสังเกต".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assemble {
    pub normalize_unicode: bool,
    /// Legacy behavior: wrap pass/fail words everywhere in the document,
    /// not just in evaluation cells.
    pub highlight_outside_tables: bool,
}
impl Default for Assemble {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            highlight_outside_tables: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub root: String,
}
impl Default for Store {
    fn default() -> Self {
        Self { root: "data".into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub out_dir: String,
    pub write_document: bool,
    pub write_report_json: bool,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            write_document: true,
            write_report_json: true,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    /// "none" writes the document only; "open" hands it to the platform
    /// opener; "command" runs the converter argv below.
    pub mode: String,
    /// Converter argv; `{input}` and `{output}` are substituted per run.
    pub command: Vec<String>,
    pub timeout_seconds: u64,
    pub opener: Vec<String>,
}
impl Default for Export {
    fn default() -> Self {
        Self {
            mode: "none".into(),
            command: Vec::new(),
            timeout_seconds: 120,
            opener: vec!["xdg-open".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locale {
    /// Fixed clock offset for the date/time tags. Thailand has no DST.
    pub utc_offset_hours: i8,
}
impl Default for Locale {
    fn default() -> Self {
        Self { utc_offset_hours: 7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            dump_effective_config: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
        }
    }
}
