use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GeomotionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GeomotionError::unsupported("x")
            .to_string()
            .contains("unsupported operand:")
    );
    assert!(
        GeomotionError::construction("x")
            .to_string()
            .contains("construction error:")
    );
    assert!(
        GeomotionError::cycle("circle")
            .to_string()
            .contains("dependency cycle detected at node circle")
    );
}

#[test]
fn only_cycles_are_fatal() {
    assert!(GeomotionError::cycle("a").is_fatal());
    assert!(!GeomotionError::unsupported("a").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GeomotionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
