use lux_report::assemble::{assemble, highlight_keywords};
use lux_report::config::Config;
use lux_report::model::{
    CompanyInfo, InspectorRecord, JobData, MasterData, MeasurementKind, MeasurementResult,
};
use lux_report::tags::TagProcessor;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const TEMPLATE: &str = include_str!("../templates/report-default.html");

fn mk_now() -> OffsetDateTime {
    let date = Date::from_calendar_date(2024, Month::September, 6).unwrap();
    let time = Time::from_hms(10, 30, 0).unwrap();
    PrimitiveDateTime::new(date, time).assume_offset(UtcOffset::from_hms(7, 0, 0).unwrap())
}

fn mk_job() -> JobData {
    let spot = MeasurementResult {
        layout: Some("L1".into()),
        area: Some("แผนกประกอบ".into()),
        kind: MeasurementKind::Spot,
        standard: Some("400".into()),
        spot_value: Some("420".into()),
        evaluation: Some("ผ่าน".into()),
        ..MeasurementResult::default()
    };
    let area = MeasurementResult {
        layout: Some("L2".into()),
        kind: MeasurementKind::Area,
        area_avg_value: Some("310".into()),
        area_min_value: Some("250".into()),
        evaluation: Some("ไม่ผ่าน".into()),
        ..MeasurementResult::default()
    };
    JobData {
        customer_name: Some("บริษัท ลูกค้า จำกัด".into()),
        location: Some("โรงงานสมุทรปราการ".into()),
        inspectors: vec!["สมชาย ใจดี".into()],
        report_creator: Some("สมชาย ใจดี".into()),
        recommendations: Some("เพิ่มโคมไฟบริเวณ L2".into()),
        results: vec![spot, area],
        ..JobData::default()
    }
}

fn mk_master() -> MasterData {
    MasterData {
        inspectors: vec![InspectorRecord {
            name: "สมชาย ใจดี".into(),
            title: "ผู้ตรวจวัดและวิเคราะห์".into(),
            license: Some("กท-001".into()),
            role: None,
        }],
        company: Some(CompanyInfo {
            name: Some("บริษัท ผู้ให้บริการ จำกัด".into()),
            license_factory: Some("ทบ-123".into()),
            license_welfare_light: Some("สส-99".into()),
            ..CompanyInfo::default()
        }),
    }
}

#[test]
fn default_template_renders_to_a_complete_document() {
    let cfg = Config::default();
    let master = mk_master();
    let processor = TagProcessor::with_now(&cfg, &master, mk_now());

    let content = processor
        .process(TEMPLATE, Some(&mk_job()), Some("J-2024-001"))
        .unwrap();
    let content = highlight_keywords(&cfg, &content).unwrap();
    let document = assemble(&cfg, &content, Some("J-2024-001"));

    assert!(
        !document.contains("{{"),
        "unresolved token left in document"
    );
    assert!(document.contains("<title>รายงานการตรวจวัดความสว่าง - J-2024-001</title>"));
    assert!(document.contains("บริษัท ลูกค้า จำกัด"));
    assert!(document.contains("รวม 2 รายการ: ผ่าน 1 / ไม่ผ่าน 1"));
    assert!(document.contains("แบบจุด 1 / แบบพื้นที่ 1"));
    assert!(document.contains("remark-master"));
    assert!(document.contains("remark-job"));
    assert!(document.contains("summary-section"));
    assert!(document.contains("ออกรายงานเมื่อ 6 กันยายน พ.ศ. 2567 เวลา 10:30:00 น."));
}

#[test]
fn draft_render_keeps_tokens_and_draft_title() {
    let cfg = Config::default();
    let master = MasterData::default();
    let processor = TagProcessor::with_now(&cfg, &master, mk_now());

    let content = processor.process(TEMPLATE, None, None).unwrap();
    let document = assemble(&cfg, &content, None);

    assert!(document.contains("{{CUSTOMER_NAME}}"));
    assert!(document.contains("{{RESULTS_TABLE}}"));
    assert!(document.contains("- Draft</title>"));
}

#[test]
fn rendered_document_is_deterministic() {
    let cfg = Config::default();
    let master = mk_master();
    let processor = TagProcessor::with_now(&cfg, &master, mk_now());

    let job = mk_job();
    let first = processor.process(TEMPLATE, Some(&job), Some("J-1")).unwrap();
    let second = processor.process(TEMPLATE, Some(&job), Some("J-1")).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        assemble(&cfg, &first, Some("J-1")),
        assemble(&cfg, &second, Some("J-1"))
    );
}
