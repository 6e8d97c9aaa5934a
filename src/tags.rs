use crate::config::Config;
use crate::model::{CompanyInfo, InspectorRecord, JobData, MasterData, StaffRole};
use crate::paginate::{self, TableStyle};
use crate::template::{TagMap, Template};
use crate::util;
use anyhow::Result;
use time::OffsetDateTime;

/// Closed tag vocabulary. Template lint reports anything outside this list.
pub const VOCABULARY: [&str; 34] = [
    "JOB_ID",
    "CUSTOMER_NAME",
    "LOCATION",
    "ADDRESS",
    "CONTACT_PERSON",
    "CONTACT_PHONE",
    "DATE",
    "TIME",
    "STATUS",
    "RECOMMENDATIONS",
    "OBSERVATIONS",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "THAI_DATE",
    "INSPECTORS",
    "ANALYSTS",
    "REPORT_CREATOR",
    "STAFF_CONTROLLERS",
    "STAFF_INSPECTORS",
    "STAFF_REPORTERS",
    "ALL_STAFF",
    "LICENSE_FACTORY",
    "LICENSE_LIGHT",
    "COMPANY_LICENSES",
    "RESULTS_COUNT",
    "PASS_COUNT",
    "FAIL_COUNT",
    "SPOT_COUNT",
    "AREA_COUNT",
    "RESULTS_TABLE",
    "RESULTS_TABLE_ROWS",
    "MEASUREMENT_DETAILS_TABLE",
    "REMARK_MASTER",
    "REMARK_JOB",
];

pub const TH_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Fallback bullet list for the master remark block when the company record
/// carries no standard remarks of its own.
pub const DEFAULT_MASTER_REMARKS: [&str; 5] = [
    "เพิ่มจำนวนหลอดไฟในพื้นที่ที่มีค่าแสงสว่างไม่เพียงพอ",
    "เปลี่ยนหลอดไฟเป็นแบบให้แสงสว่างมากกว่าเดิม",
    "ตรวจสอบและทำความสะอาดหลอดไฟเป็นประจำ",
    "ปรับตำแหน่งการจัดวางโต๊ะทำงานให้รับแสงได้ดีขึ้น",
    "หลีกเลี่ยงการติดตั้งไฟส่องสว่างในตำแหน่งที่ก่อให้เกิดเงา",
];

const DOIW_HEADING: &str = "<strong>กรมโรงงานอุตสาหกรรม:</strong>";
const REGISTRATION_LABEL: &str = "เลขทะเบียน";
const LICENSE_LABEL: &str = "ใบอนุญาตเลขที่";
const SERVICE_CHEMICAL_MEASUREMENT: &str =
    "ผู้ให้บริการตรวจวัดระดับความเข้มข้นของสารเคมีอันตราย";
const SERVICE_CHEMICAL_ANALYSIS: &str =
    "ผู้ให้บริการวิเคราะห์ระดับความเข้มข้นของสารเคมีอันตราย";
const SERVICE_HEAT: &str =
    "ผู้ให้บริการตรวจวัดและวิเคราะห์สภาวะการทำงานเกี่ยวกับระดับความร้อน";
const SERVICE_WELFARE_LIGHT: &str =
    "ผู้ให้บริการตรวจวัดและวิเคราะห์สภาวะการทำงานเกี่ยวกับระดับแสงสว่าง";
const SERVICE_SOUND: &str =
    "ผู้ให้บริการตรวจวัดและวิเคราะห์สภาวะการทำงานเกี่ยวกับระดับเสียง";

/// Resolves the tag vocabulary against one job plus shared master data.
pub struct TagProcessor<'a> {
    cfg: &'a Config,
    master: &'a MasterData,
    now: OffsetDateTime,
}

impl<'a> TagProcessor<'a> {
    pub fn new(cfg: &'a Config, master: &'a MasterData) -> Result<Self> {
        let now = util::now_with_offset(cfg.locale.utc_offset_hours)?;
        Ok(Self::with_now(cfg, master, now))
    }

    /// Fixed-clock constructor so date tags are reproducible.
    pub fn with_now(cfg: &'a Config, master: &'a MasterData, now: OffsetDateTime) -> Self {
        Self { cfg, master, now }
    }

    /// Substitutes the whole vocabulary into `content`. Without a job and an
    /// id this is a no-op: the template comes back untouched, tags intact.
    pub fn process(
        &self,
        content: &str,
        job: Option<&JobData>,
        job_id: Option<&str>,
    ) -> Result<String> {
        let (job, job_id) = match (job, job_id) {
            (Some(job), Some(id)) => (job, id),
            _ => return Ok(content.to_string()),
        };
        let template = Template::parse(content)?;
        let tags = self.tag_map(job, job_id);
        template.render(&tags)
    }

    /// The full tag-to-value map for one job.
    pub fn tag_map(&self, job: &JobData, job_id: &str) -> TagMap {
        let mut tags = TagMap::new();
        self.basic_tags(&mut tags, job, job_id);
        self.personnel_tags(&mut tags, job);
        self.company_tags(&mut tags);
        self.results_tags(&mut tags, job);
        self.remark_tags(&mut tags, job);
        tags
    }

    fn basic_tags(&self, tags: &mut TagMap, job: &JobData, job_id: &str) {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        tags.insert("JOB_ID".into(), job_id.to_string());
        tags.insert("CUSTOMER_NAME".into(), field(&job.customer_name));
        tags.insert("LOCATION".into(), field(&job.location));
        tags.insert("ADDRESS".into(), field(&job.address));
        tags.insert("CONTACT_PERSON".into(), field(&job.contact_person));
        tags.insert("CONTACT_PHONE".into(), field(&job.contact_phone));
        tags.insert("DATE".into(), field(&job.date));
        tags.insert("TIME".into(), field(&job.time));
        tags.insert("STATUS".into(), field(&job.status));
        tags.insert("RECOMMENDATIONS".into(), field(&job.recommendations));
        tags.insert("OBSERVATIONS".into(), field(&job.observations));
        tags.insert("CURRENT_DATE".into(), self.current_date());
        tags.insert("CURRENT_TIME".into(), self.current_time());
        tags.insert("THAI_DATE".into(), self.thai_date());
    }

    fn personnel_tags(&self, tags: &mut TagMap, job: &JobData) {
        let ns = &self.cfg.strings.not_specified;
        tags.insert("INSPECTORS".into(), job.inspectors.join(", "));
        tags.insert("ANALYSTS".into(), job.analysts.join(", "));
        tags.insert(
            "REPORT_CREATOR".into(),
            job.report_creator.clone().unwrap_or_default(),
        );

        let records: Vec<InspectorRecord> = job
            .inspectors
            .iter()
            .map(|name| self.lookup(name))
            .collect();

        let controllers = join_or(
            records
                .iter()
                .filter(|r| r.effective_role() == StaffRole::Controller)
                .map(person_with_title_license),
            ns,
        );
        tags.insert("STAFF_CONTROLLERS".into(), controllers);

        let field_staff = join_or(
            records
                .iter()
                .filter(|r| r.effective_role().is_field_staff())
                .map(person_with_title),
            ns,
        );
        tags.insert("STAFF_INSPECTORS".into(), field_staff);

        let reporter = match &job.report_creator {
            Some(name) => person_with_title(&self.lookup(name)),
            None => ns.clone(),
        };
        tags.insert("STAFF_REPORTERS".into(), reporter);

        let mut all: Vec<String> = records.iter().map(person_dash_title).collect();
        if let Some(creator) = &job.report_creator {
            if !job.inspectors.iter().any(|n| n == creator) {
                all.push(person_dash_title(&self.lookup(creator)));
            }
        }
        tags.insert("ALL_STAFF".into(), join_or(all.into_iter(), ns));
    }

    fn company_tags(&self, tags: &mut TagMap) {
        match &self.master.company {
            Some(company) => {
                tags.insert(
                    "LICENSE_FACTORY".into(),
                    company.license_factory.clone().unwrap_or_default(),
                );
                tags.insert(
                    "LICENSE_LIGHT".into(),
                    company.license_welfare_light.clone().unwrap_or_default(),
                );
                tags.insert("COMPANY_LICENSES".into(), license_list(company));
            }
            None => {
                tags.insert("LICENSE_FACTORY".into(), String::new());
                tags.insert("LICENSE_LIGHT".into(), String::new());
                tags.insert(
                    "COMPANY_LICENSES".into(),
                    self.cfg.strings.no_license_info.clone(),
                );
            }
        }
    }

    fn results_tags(&self, tags: &mut TagMap, job: &JobData) {
        let stats = paginate::ResultStats::collect(&job.results, &self.cfg.strings.pass_word);
        tags.insert("RESULTS_COUNT".into(), stats.total.to_string());
        tags.insert("PASS_COUNT".into(), stats.pass.to_string());
        tags.insert("FAIL_COUNT".into(), stats.fail.to_string());
        tags.insert("SPOT_COUNT".into(), stats.spot.to_string());
        tags.insert("AREA_COUNT".into(), stats.area.to_string());

        let table = &self.cfg.table;
        tags.insert(
            "RESULTS_TABLE".into(),
            paginate::render_results_table(
                self.cfg,
                &job.results,
                TableStyle::Summary,
                table.items_per_page,
            ),
        );
        tags.insert(
            "RESULTS_TABLE_ROWS".into(),
            paginate::render_results_table(
                self.cfg,
                &job.results,
                TableStyle::Summary,
                table.items_per_page_print,
            ),
        );
        tags.insert(
            "MEASUREMENT_DETAILS_TABLE".into(),
            paginate::render_results_table(
                self.cfg,
                &job.results,
                TableStyle::Detailed,
                table.items_per_page,
            ),
        );
    }

    fn remark_tags(&self, tags: &mut TagMap, job: &JobData) {
        let s = &self.cfg.strings;

        let bullets: Vec<&str> = match &self.master.company {
            Some(c) if !c.standard_remarks.is_empty() => {
                c.standard_remarks.iter().map(String::as_str).collect()
            }
            _ => DEFAULT_MASTER_REMARKS.to_vec(),
        };
        let bullet_lines = bullets
            .iter()
            .map(|b| format!("• {b}"))
            .collect::<Vec<_>>()
            .join("<br>");
        tags.insert(
            "REMARK_MASTER".into(),
            remark_block("remark-master", &s.remark_master_title, &bullet_lines),
        );

        let mut content = match &job.recommendations {
            Some(r) if !r.is_empty() => line_breaks(r),
            _ => format!("<em>{}</em>", s.no_job_remarks),
        };
        if let Some(obs) = &job.observations {
            if !obs.is_empty() {
                content.push_str(&format!(
                    "<br><br><strong>{}:</strong><br>{}",
                    s.observations_label,
                    line_breaks(obs)
                ));
            }
        }
        tags.insert(
            "REMARK_JOB".into(),
            remark_block("remark-job", &s.remark_job_title, &content),
        );
    }

    fn lookup(&self, name: &str) -> InspectorRecord {
        self.master
            .inspector(name)
            .cloned()
            .unwrap_or_else(|| InspectorRecord::unknown(name))
    }

    fn current_date(&self) -> String {
        let d = self.now.date();
        format!(
            "{}/{}/{}",
            d.day(),
            u8::from(d.month()),
            thai_buddhist_year(d.year())
        )
    }

    fn current_time(&self) -> String {
        let t = self.now.time();
        format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
    }

    fn thai_date(&self) -> String {
        let d = self.now.date();
        let month = TH_MONTHS[u8::from(d.month()) as usize - 1];
        format!("{} {} พ.ศ. {}", d.day(), month, thai_buddhist_year(d.year()))
    }
}

pub fn thai_buddhist_year(gregorian: i32) -> i32 {
    gregorian + 543
}

fn join_or(items: impl Iterator<Item = String>, fallback: &str) -> String {
    let joined = items.collect::<Vec<_>>().join("<br>");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}

fn person_with_title(rec: &InspectorRecord) -> String {
    if rec.title.is_empty() {
        rec.name.clone()
    } else {
        format!("{} ({})", rec.name, rec.title)
    }
}

fn person_with_title_license(rec: &InspectorRecord) -> String {
    if rec.title.is_empty() {
        return rec.name.clone();
    }
    match &rec.license {
        Some(license) => format!("{} ({} - {})", rec.name, rec.title, license),
        None => format!("{} ({})", rec.name, rec.title),
    }
}

fn person_dash_title(rec: &InspectorRecord) -> String {
    let mut out = rec.name.clone();
    if !rec.title.is_empty() {
        out.push_str(&format!(" - {}", rec.title));
    }
    if let Some(license) = &rec.license {
        out.push_str(&format!(" ({license})"));
    }
    out
}

/// Registry bullet list, fixed order, only the licenses actually present.
fn license_list(company: &CompanyInfo) -> String {
    let mut lines = Vec::new();
    if let Some(factory) = &company.license_factory {
        let company_line = match &company.name {
            Some(name) => format!("- {name} {REGISTRATION_LABEL} {factory}"),
            None => format!("- {REGISTRATION_LABEL} {factory}"),
        };
        lines.push(format!("{DOIW_HEADING}<br>{company_line}"));
    }
    let services = [
        (&company.license_chemical_measurement, SERVICE_CHEMICAL_MEASUREMENT),
        (&company.license_chemical_analysis, SERVICE_CHEMICAL_ANALYSIS),
        (&company.license_heat, SERVICE_HEAT),
        (&company.license_welfare_light, SERVICE_WELFARE_LIGHT),
        (&company.license_sound, SERVICE_SOUND),
    ];
    for (value, service) in services {
        if let Some(v) = value {
            lines.push(format!("- {service} {LICENSE_LABEL} {v}"));
        }
    }
    lines.join("<br><br>")
}

fn remark_block(class: &str, title: &str, content: &str) -> String {
    format!(
        "<div class=\"remark-section {class} avoid-break\">\n<div class=\"remark-title\">{title}</div>\n<div class=\"remark-content\">{content}</div>\n</div>"
    )
}

fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}
