use nk_core::errors::{ErrorInfo, NkError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("path", "N20_K3/0")
        .with_context("reason", "example")
}

#[test]
fn config_error_surface() {
    let err = NkError::Config(sample_info("alias-cycle", "cycle detected"));
    assert_eq!(err.info().code, "alias-cycle");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn io_error_surface() {
    let err = NkError::io(
        "provision-mkdir",
        std::path::Path::new("/readonly/N20"),
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    );
    assert_eq!(err.info().code, "provision-mkdir");
    assert_eq!(err.info().context["path"], "/readonly/N20");
}

#[test]
fn table_error_display_includes_context_and_hint() {
    let err = NkError::Table(
        ErrorInfo::new("no-runs", "nothing to concatenate")
            .with_context("root", "runs")
            .with_hint("check the discovery pattern"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("table error: nothing to concatenate (code: no-runs)"));
    assert!(rendered.contains("root=runs"));
    assert!(rendered.contains("hint: check the discovery pattern"));
}

#[test]
fn errors_roundtrip_through_json() {
    let err = NkError::Log(sample_info("log-malformed", "short set line"));
    let json = serde_json::to_string(&err).unwrap();
    let restored: NkError = serde_json::from_str(&json).unwrap();
    assert_eq!(err, restored);
}
