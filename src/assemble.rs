use crate::config::Config;
use anyhow::Result;
use regex::Regex;

pub const SARABUN_FONT_LINK: &str = "<link href=\"https://fonts.googleapis.com/css2?family=Sarabun:wght@300;400;500;600;700&display=swap\" rel=\"stylesheet\">";

const DRAFT_TITLE: &str = "Draft";

/// Body styles shared by every document. Class names are a contract with
/// template authors; the generated tables rely on the same set.
const CSS_MAIN: &str = r#"* {
    box-sizing: border-box;
    -webkit-print-color-adjust: exact;
    color-adjust: exact;
}

html, body {
    margin: 0;
    padding: 0;
    font-family: 'Sarabun', 'Segoe UI', Arial, sans-serif;
    font-size: 14px;
    line-height: 1.6;
    color: #333;
    background: white;
}

h1 {
    font-size: 20px;
    font-weight: 700;
    margin: 0 0 20px 0;
    text-align: center;
    color: #2c3e50;
}

h2 {
    font-size: 18px;
    font-weight: 600;
    margin: 25px 0 15px 0;
    color: #34495e;
    border-bottom: 2px solid #3498db;
    padding-bottom: 5px;
}

h3 {
    font-size: 16px;
    font-weight: 600;
    margin: 20px 0 10px 0;
    color: #2c3e50;
}

p {
    margin: 0 0 12px 0;
    line-height: 1.6;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin: 15px 0;
    background: white;
    border: 1px solid #34495e;
}

th {
    background: linear-gradient(135deg, #3498db, #2980b9);
    color: white;
    font-weight: 600;
    padding: 12px 8px;
    text-align: center;
    border: 1px solid #2c3e50;
    font-size: 13px;
}

td {
    padding: 10px 8px;
    border: 1px solid #bdc3c7;
    vertical-align: middle;
    font-size: 13px;
}

tbody tr:nth-child(even) {
    background-color: #f8f9fa;
}

tbody tr:nth-child(odd) {
    background-color: white;
}

.text-center { text-align: center; }
.text-left { text-align: left; }
.text-right { text-align: right; }

.result-pass {
    color: #27ae60;
    font-weight: 600;
    background-color: #d5f4e6 !important;
}

.result-fail {
    color: #e74c3c;
    font-weight: 600;
    background-color: #fdf2f2 !important;
}

.page-break {
    page-break-before: always;
}

.avoid-break {
    page-break-inside: avoid;
}

.remark-section {
    margin: 20px 0;
    padding: 15px;
    border-radius: 8px;
    page-break-inside: avoid;
}

.remark-master {
    background: linear-gradient(135deg, #e8f4fd, #f0f8ff);
    border-left: 5px solid #3498db;
}

.remark-job {
    background: linear-gradient(135deg, #fff8e1, #fef9e7);
    border-left: 5px solid #f39c12;
}

.remark-title {
    font-weight: 600;
    margin: 0 0 10px 0;
    font-size: 15px;
}

.remark-content {
    font-size: 13px;
    line-height: 1.6;
}
"#;

const CSS_SECTIONS: &str = r#".company-header {
    text-align: center;
    margin-bottom: 30px;
    padding: 20px;
    border: 2px solid #3498db;
    border-radius: 10px;
    background: linear-gradient(135deg, #f8f9fa, #ffffff);
}

.company-name {
    font-size: 18px;
    font-weight: 700;
    color: #2c3e50;
    margin: 0 0 10px 0;
}

.company-license {
    font-size: 12px;
    color: #7f8c8d;
    margin: 5px 0;
}

.summary-section {
    margin: 25px 0;
    padding: 20px;
    background: linear-gradient(135deg, #f8f9fa, #ffffff);
    border: 1px solid #dee2e6;
    border-radius: 10px;
    page-break-inside: avoid;
}

.summary-title {
    font-size: 16px;
    font-weight: 600;
    color: #2c3e50;
    margin: 0 0 15px 0;
    text-align: center;
}

.summary-stats {
    display: flex;
    justify-content: space-around;
    text-align: center;
    margin-bottom: 15px;
}

.stat-item {
    flex: 1;
    padding: 10px;
}

.stat-number {
    font-size: 24px;
    font-weight: 700;
    display: block;
    margin-bottom: 5px;
}

.stat-pass { color: #27ae60; }
.stat-fail { color: #e74c3c; }
.stat-total { color: #3498db; }

.signature-section {
    margin-top: 40px;
    page-break-inside: avoid;
}

.signature-row {
    display: flex;
    justify-content: space-between;
    margin-top: 60px;
}

.signature-item {
    text-align: center;
    flex: 1;
    margin: 0 20px;
}

.signature-line {
    border-bottom: 1px solid #333;
    margin-bottom: 10px;
    height: 50px;
}

.signature-title {
    font-weight: 600;
    margin-bottom: 5px;
}

.signature-name {
    font-size: 12px;
    color: #666;
}

@media print {
    .no-print { display: none !important; }

    body {
        -webkit-print-color-adjust: exact;
        color-adjust: exact;
    }

    table, th, td {
        border-color: #000 !important;
    }
}

@media screen {
    body {
        background: #f5f5f5;
        padding: 20px;
    }

    .page-container {
        background: white;
        box-shadow: 0 4px 6px rgba(0,0,0,0.1);
        margin: 0 auto;
        max-width: 210mm;
        min-height: 297mm;
        padding: 20mm;
    }
}
"#;

/// Builds the `<style>` block: the `@page` geometry from config, then the
/// shared body styles, with the watermark rule only when enabled.
pub fn print_css(cfg: &Config) -> String {
    let mut css = String::from("<style>\n");
    css.push_str(&page_rule(cfg));
    css.push('\n');
    css.push_str(CSS_MAIN);
    if cfg.watermark.enabled {
        css.push_str(&watermark_rule(cfg));
    }
    css.push_str(CSS_SECTIONS);
    css.push_str("</style>");
    css
}

fn page_rule(cfg: &Config) -> String {
    let mut rule = format!(
        "@page {{\n    size: {} {};\n    margin-top: {};\n    margin-bottom: {};\n    margin-left: {};\n    margin-right: {};\n",
        cfg.page.paper_size,
        cfg.page.orientation,
        cfg.margins.top,
        cfg.margins.bottom,
        cfg.margins.left,
        cfg.margins.right,
    );
    if cfg.header.enabled {
        rule.push_str(&format!(
            "    @top-{} {{\n        content: \"{}\";\n        font-size: {};\n        font-family: 'Sarabun', sans-serif;\n    }}\n",
            cfg.header.align,
            counter_content(&cfg.header.text),
            cfg.header.font_size,
        ));
    }
    if cfg.footer.enabled {
        rule.push_str(&format!(
            "    @bottom-{} {{\n        content: \"{}\";\n        font-size: {};\n        font-family: 'Sarabun', sans-serif;\n    }}\n",
            cfg.footer.align,
            counter_content(&cfg.footer.text),
            cfg.footer.font_size,
        ));
    }
    rule.push_str("}\n");
    rule
}

/// `{page}` and `{total}` become CSS page counters. The surrounding quotes
/// come from the caller, so the replacements close and reopen the string.
fn counter_content(text: &str) -> String {
    text.replace("{page}", "\" counter(page) \"")
        .replace("{total}", "\" counter(pages) \"")
}

fn watermark_rule(cfg: &Config) -> String {
    format!(
        ".watermark {{\n    position: fixed;\n    top: 50%;\n    left: 50%;\n    transform: translate(-50%, -50%) rotate({}deg);\n    font-size: {};\n    color: {};\n    opacity: {};\n    z-index: -1;\n    font-weight: bold;\n    pointer-events: none;\n    user-select: none;\n}}\n",
        cfg.watermark.rotation, cfg.watermark.size, cfg.watermark.color, cfg.watermark.opacity,
    )
}

/// Wraps processed content in the standalone document shell.
pub fn assemble(cfg: &Config, content: &str, job_id: Option<&str>) -> String {
    let title = format!(
        "{} - {}",
        cfg.strings.report_title,
        job_id.unwrap_or(DRAFT_TITLE)
    );
    let watermark = if cfg.watermark.enabled {
        format!("<div class=\"watermark\">{}</div>\n", cfg.watermark.text)
    } else {
        String::new()
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"th\">\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>{title}</title>\n{SARABUN_FONT_LINK}\n{css}\n</head>\n<body>\n{watermark}<div class=\"page-container\">\n{content}\n</div>\n</body>\n</html>\n",
        css = print_css(cfg),
    )
}

/// Legacy whole-document highlighting. One alternation with the longer word
/// first, otherwise the pass word would hit inside the fail word and break
/// its markup.
pub fn highlight_keywords(cfg: &Config, html: &str) -> Result<String> {
    if !cfg.assemble.highlight_outside_tables {
        return Ok(html.to_string());
    }
    let mut words: Vec<&str> = [cfg.strings.pass_word.as_str(), cfg.strings.fail_word.as_str()]
        .into_iter()
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Ok(html.to_string());
    }
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let pattern = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    let re = Regex::new(&pattern)?;
    let pass = cfg.strings.pass_word.as_str();
    Ok(re
        .replace_all(html, |caps: &regex::Captures| {
            let word = &caps[0];
            let class = if word == pass { "result-pass" } else { "result-fail" };
            format!("<span class=\"{class}\">{word}</span>")
        })
        .into_owned())
}
