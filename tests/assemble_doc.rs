use lux_report::assemble::{assemble, highlight_keywords, print_css};
use lux_report::config::Config;

#[test]
fn document_shell_wraps_content() {
    let cfg = Config::default();
    let doc = assemble(&cfg, "<p>เนื้อหา</p>", Some("J-1"));
    assert!(doc.starts_with("<!DOCTYPE html>"));
    assert!(doc.contains("<html lang=\"th\">"));
    assert!(doc.contains("<title>รายงานการตรวจวัดความสว่าง - J-1</title>"));
    assert!(doc.contains("family=Sarabun"));
    assert!(doc.contains("<div class=\"page-container\">\n<p>เนื้อหา</p>"));
    assert!(doc.trim_end().ends_with("</html>"));
}

#[test]
fn draft_document_title_without_job() {
    let cfg = Config::default();
    let doc = assemble(&cfg, "x", None);
    assert!(doc.contains("<title>รายงานการตรวจวัดความสว่าง - Draft</title>"));
}

#[test]
fn page_rule_carries_geometry_and_counters() {
    let cfg = Config::default();
    let css = print_css(&cfg);
    assert!(css.contains("size: A4 portrait;"));
    assert!(css.contains("margin-top: 15mm;"));
    // default header is disabled, footer enabled
    assert!(!css.contains("@top-"));
    assert!(css.contains("@bottom-center"));
    assert!(css.contains("content: \"หน้า \" counter(page) \" จาก \" counter(pages) \"\";"));
}

#[test]
fn header_block_appears_when_enabled() {
    let mut cfg = Config::default();
    cfg.header.enabled = true;
    cfg.header.text = "บริษัท ทดสอบ".into();
    cfg.header.align = "left".into();
    let css = print_css(&cfg);
    assert!(css.contains("@top-left"));
    assert!(css.contains("content: \"บริษัท ทดสอบ\";"));
}

#[test]
fn watermark_rule_and_element_follow_the_toggle() {
    let mut cfg = Config::default();
    let off = assemble(&cfg, "x", None);
    assert!(!off.contains("class=\"watermark\""));
    assert!(!print_css(&cfg).contains(".watermark"));

    cfg.watermark.enabled = true;
    cfg.watermark.text = "ฉบับร่าง".into();
    cfg.watermark.rotation = 30;
    let on = assemble(&cfg, "x", None);
    assert!(on.contains("<div class=\"watermark\">ฉบับร่าง</div>"));
    let css = print_css(&cfg);
    assert!(css.contains(".watermark"));
    assert!(css.contains("rotate(30deg)"));
}

#[test]
fn highlight_is_off_by_default() {
    let cfg = Config::default();
    let html = "ผลการประเมิน: ผ่าน และ ไม่ผ่าน";
    assert_eq!(highlight_keywords(&cfg, html).unwrap(), html);
}

#[test]
fn highlight_wraps_longest_word_first() {
    let mut cfg = Config::default();
    cfg.assemble.highlight_outside_tables = true;
    let out = highlight_keywords(&cfg, "ก ผ่าน ข ไม่ผ่าน ค").unwrap();
    assert!(out.contains("<span class=\"result-pass\">ผ่าน</span>"));
    assert!(out.contains("<span class=\"result-fail\">ไม่ผ่าน</span>"));
    // the fail word must never be split by the pass-word match
    assert!(!out.contains("ไม่<span"));
}

#[test]
fn css_classes_used_by_tables_are_defined() {
    let cfg = Config::default();
    let css = print_css(&cfg);
    for class in [
        ".result-pass",
        ".result-fail",
        ".page-break",
        ".avoid-break",
        ".remark-section",
        ".remark-master",
        ".remark-job",
        ".summary-section",
        ".summary-stats",
        ".stat-item",
        ".stat-number",
        ".signature-section",
        ".no-print",
        ".page-container",
    ] {
        assert!(css.contains(class), "missing {class}");
    }
}
