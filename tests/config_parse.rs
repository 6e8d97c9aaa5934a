use lux_report::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../lux-report.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.table.items_per_page, 20);
    assert_eq!(cfg.table.items_per_page_print, 15);
    assert_eq!(cfg.strings.pass_word, "ผ่าน");
    assert!(cfg.footer.enabled);
    assert!(!cfg.output.out_dir.is_empty());
}

#[test]
fn empty_config_uses_defaults() {
    let cfg: Config = toml::from_str("").expect("parse empty TOML");
    assert_eq!(cfg.page.paper_size, "A4");
    assert_eq!(cfg.margins.top, "15mm");
    assert_eq!(cfg.locale.utc_offset_hours, 7);
    assert_eq!(cfg.strings.fail_word, "ไม่ผ่าน");
    assert_eq!(cfg.export.mode, "none");
}

#[test]
fn missing_section_takes_defaults_wholesale() {
    let raw = r#"
[table]
items_per_page = 10
items_per_page_print = 8
value_placeholder = "n/a"
"#;
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.table.items_per_page, 10);
    assert_eq!(cfg.table.value_placeholder, "n/a");
    // untouched sections keep their defaults
    assert_eq!(cfg.footer.text, "หน้า {page} จาก {total}");
    assert_eq!(cfg.strings.pass_word, "ผ่าน");
}

#[test]
fn partial_section_is_rejected() {
    let raw = r#"
[margins]
top = "10mm"
"#;
    assert!(toml::from_str::<Config>(raw).is_err());
}

#[test]
fn unknown_export_mode_parses_but_fails_later() {
    // mode is a plain string in config; validation happens at export time
    let raw = r#"
[export]
mode = "mail"
command = []
timeout_seconds = 5
opener = ["open"]
"#;
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(lux_report::export::ExportMode::parse(&cfg.export.mode).is_err());
}
