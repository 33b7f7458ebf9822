use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ReelError::EmptyTimeline
            .to_string()
            .contains("empty timeline")
    );
    assert!(
        ReelError::media_decode(2, "x")
            .to_string()
            .contains("media decode error: slide 2:")
    );
    assert!(ReelError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn slide_validation_names_the_index() {
    let err = ReelError::slide_validation(3, "image file not found");
    assert_eq!(err.slide(), Some(3));
    assert_eq!(
        err.to_string(),
        "validation error: slide 3: image file not found"
    );
    assert_eq!(ReelError::validation("fps must be non-zero").slide(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.slide(), None);
}
