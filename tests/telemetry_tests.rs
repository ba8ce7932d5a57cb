use chart_sync::telemetry::init_default_tracing;

#[test]
fn second_install_reports_existing_subscriber() {
    let first = init_default_tracing();
    assert_eq!(first, cfg!(feature = "telemetry"));
    assert!(!init_default_tracing());
}
