use super::*;
use kurbo::Point;

#[test]
fn glyph_cache_returns_inserted_shapes() {
    let mut cache = GlyphCache::new();
    cache.insert("x", vec![Shape::circle(Point::ORIGIN, 1.0)]);
    assert_eq!(cache.compile("x").unwrap().len(), 1);
    assert!(cache.contains("x"));
}

#[test]
fn unknown_text_is_unsupported() {
    let cache = GlyphCache::new();
    let err = cache.compile("y").unwrap_err();
    assert!(matches!(err, GeomotionError::Unsupported(_)));
    assert!(NoTextCompiler.compile("y").is_err());
}
