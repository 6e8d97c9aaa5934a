use crate::config::Config;
use crate::model::{MeasurementKind, MeasurementResult};
use serde::{Deserialize, Serialize};

pub const SUMMARY_HEADERS: [&str; 7] = [
    "ลำดับ",
    "Lay Out",
    "พื้นที่ตรวจวัด",
    "ลักษณะงาน",
    "ค่ามาตรฐาน",
    "ผลที่วัดได้",
    "ผลการประเมิน",
];

pub const DETAILED_HEADERS: [&str; 9] = [
    "ลำดับ",
    "Lay Out",
    "พื้นที่ตรวจวัด",
    "ลักษณะงาน",
    "ประเภทการวัด",
    "ค่ามาตรฐาน (LUX)",
    "ผลที่วัดได้ (LUX)",
    "ผลการประเมิน",
    "หมายเหตุ",
];

const SUMMARY_WIDTHS: [&str; 7] = ["8%", "18%", "25%", "20%", "12%", "12%", "15%"];

/// 1-based inclusive slice of the item sequence shown on one table page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub page: u32,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePlan {
    pub total_items: usize,
    pub items_per_page: usize,
    pub total_pages: u32,
    pub pages: Vec<PageRange>,
}

impl TablePlan {
    pub fn new(total_items: usize, items_per_page: usize) -> Self {
        let per_page = items_per_page.max(1);
        let total_pages = total_items.div_ceil(per_page) as u32;
        let mut pages = Vec::with_capacity(total_pages as usize);
        for page in 1..=total_pages {
            let start = (page as usize - 1) * per_page + 1;
            let end = (start + per_page - 1).min(total_items);
            pages.push(PageRange { page, start, end });
        }
        Self {
            total_items,
            items_per_page: per_page,
            total_pages,
            pages,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResultStats {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub spot: usize,
    pub area: usize,
}

impl ResultStats {
    /// Strict binary split: a result passes on exact equality with the
    /// configured pass word, every other value (or no value) fails.
    pub fn collect(results: &[MeasurementResult], pass_word: &str) -> Self {
        let mut stats = Self {
            total: results.len(),
            ..Self::default()
        };
        for r in results {
            if r.evaluation.as_deref() == Some(pass_word) {
                stats.pass += 1;
            } else {
                stats.fail += 1;
            }
            match r.kind {
                MeasurementKind::Spot => stats.spot += 1,
                MeasurementKind::Area => stats.area += 1,
            }
        }
        stats
    }

    pub fn pass_rate_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.pass as f64 / self.total as f64) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Seven columns, combined area value cell.
    Summary,
    /// Nine columns with measurement kind and split area values.
    Detailed,
}

/// Renders the paginated results table markup used as a composite tag value.
/// Each page gets its own table plus the two remark tokens; the summary
/// block appears exactly once after the last page.
pub fn render_results_table(
    cfg: &Config,
    results: &[MeasurementResult],
    style: TableStyle,
    items_per_page: usize,
) -> String {
    if results.is_empty() {
        let text = match style {
            TableStyle::Summary => &cfg.strings.no_results,
            TableStyle::Detailed => &cfg.strings.no_details,
        };
        return format!("<p class=\"text-center\">{text}</p>");
    }

    let plan = TablePlan::new(results.len(), items_per_page);
    let stats = ResultStats::collect(results, &cfg.strings.pass_word);
    let mut out = String::new();

    for range in &plan.pages {
        if range.page > 1 {
            out.push_str("<div class=\"page-break\"></div>\n");
        }
        out.push_str("<div class=\"avoid-break\">\n");
        push_table_open(&mut out, style);
        for idx in range.start..=range.end {
            push_row(&mut out, cfg, &results[idx - 1], idx, style);
        }
        out.push_str("</tbody></table>\n");
        out.push_str("{{REMARK_MASTER}}\n{{REMARK_JOB}}\n");
        if plan.total_pages > 1 {
            out.push_str(&format!(
                "<p class=\"text-center\">{}</p>\n",
                page_caption(&cfg.strings.page_caption, range, &plan)
            ));
        }
        out.push_str("</div>\n");
    }

    push_summary(&mut out, cfg, &stats, style);
    out
}

fn push_table_open(out: &mut String, style: TableStyle) {
    out.push_str("<table>\n<thead>\n<tr>\n");
    match style {
        TableStyle::Summary => {
            for (header, width) in SUMMARY_HEADERS.iter().zip(SUMMARY_WIDTHS.iter()) {
                out.push_str(&format!("<th style=\"width: {width};\">{header}</th>\n"));
            }
        }
        TableStyle::Detailed => {
            for header in DETAILED_HEADERS.iter() {
                out.push_str(&format!("<th>{header}</th>\n"));
            }
        }
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
}

fn push_row(
    out: &mut String,
    cfg: &Config,
    result: &MeasurementResult,
    seq: usize,
    style: TableStyle,
) {
    let placeholder = cfg.table.value_placeholder.as_str();
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let value = |v: &Option<String>| v.clone().unwrap_or_else(|| placeholder.to_string());

    let eval_text = text(&result.evaluation);
    let eval_class = evaluation_class(result.evaluation.as_deref(), &cfg.strings.pass_word);

    out.push_str("<tr>\n");
    out.push_str(&format!("<td class=\"text-center\">{seq}</td>\n"));
    out.push_str(&format!("<td>{}</td>\n", text(&result.layout)));
    out.push_str(&format!("<td>{}</td>\n", text(&result.area)));
    out.push_str(&format!("<td>{}</td>\n", text(&result.work_type)));
    match style {
        TableStyle::Summary => {
            let measured = match result.kind {
                MeasurementKind::Spot => value(&result.spot_value),
                MeasurementKind::Area => format!(
                    "{} / {}",
                    value(&result.area_avg_value),
                    value(&result.area_min_value)
                ),
            };
            out.push_str(&format!(
                "<td class=\"text-center\">{}</td>\n",
                text(&result.standard)
            ));
            out.push_str(&format!("<td class=\"text-center\">{measured}</td>\n"));
        }
        TableStyle::Detailed => {
            let kind_label = match result.kind {
                MeasurementKind::Spot => &cfg.strings.label_spot,
                MeasurementKind::Area => &cfg.strings.label_area,
            };
            let measured = match result.kind {
                MeasurementKind::Spot => value(&result.spot_value),
                MeasurementKind::Area => format!(
                    "{}: {}<br>{}: {}",
                    cfg.strings.label_average,
                    value(&result.area_avg_value),
                    cfg.strings.label_minimum,
                    value(&result.area_min_value)
                ),
            };
            out.push_str(&format!("<td class=\"text-center\">{kind_label}</td>\n"));
            out.push_str(&format!(
                "<td class=\"text-center\">{}</td>\n",
                text(&result.standard)
            ));
            out.push_str(&format!("<td class=\"text-center\">{measured}</td>\n"));
        }
    }
    out.push_str(&format!(
        "<td class=\"text-center {eval_class}\">{eval_text}</td>\n"
    ));
    if style == TableStyle::Detailed {
        out.push_str(&format!("<td class=\"text-center\">{placeholder}</td>\n"));
    }
    out.push_str("</tr>\n");
}

fn push_summary(out: &mut String, cfg: &Config, stats: &ResultStats, style: TableStyle) {
    let s = &cfg.strings;
    out.push_str("<div class=\"summary-section\">\n");
    out.push_str(&format!(
        "<div class=\"summary-title\">{}</div>\n",
        s.summary_title
    ));
    out.push_str("<div class=\"summary-stats\">\n");
    push_stat(out, "stat-total", stats.total, &s.label_total);
    push_stat(out, "stat-pass", stats.pass, &s.label_pass);
    push_stat(out, "stat-fail", stats.fail, &s.label_fail);
    out.push_str("</div>\n");
    if style == TableStyle::Detailed {
        out.push_str("<div class=\"summary-stats\">\n");
        push_stat(out, "stat-total", stats.spot, &s.label_spot);
        push_stat(out, "stat-total", stats.area, &s.label_area);
        out.push_str("</div>\n");
    }
    out.push_str(&format!(
        "<div class=\"text-center\"><strong>{}: {}%</strong></div>\n",
        s.label_pass_rate,
        stats.pass_rate_percent()
    ));
    out.push_str("</div>\n");
}

fn push_stat(out: &mut String, class: &str, value: usize, label: &str) {
    out.push_str(&format!(
        "<div class=\"stat-item\"><span class=\"stat-number {class}\">{value}</span><div>{label}</div></div>\n"
    ));
}

pub fn evaluation_class(evaluation: Option<&str>, pass_word: &str) -> &'static str {
    if evaluation == Some(pass_word) {
        "result-pass"
    } else {
        "result-fail"
    }
}

fn page_caption(template: &str, range: &PageRange, plan: &TablePlan) -> String {
    template
        .replace("{page}", &range.page.to_string())
        .replace("{total}", &plan.total_pages.to_string())
        .replace("{first}", &range.start.to_string())
        .replace("{last}", &range.end.to_string())
        .replace("{count}", &plan.total_items.to_string())
}
