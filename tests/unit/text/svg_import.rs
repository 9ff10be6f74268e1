use super::*;

const TRIANGLE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <g transform="translate(1,0)">
    <path d="M0,0 L4,0 L4,2 Z" fill="#ff0000"/>
  </g>
</svg>"##;

#[test]
fn imports_paths_with_group_transform_and_flipped_y() {
    let shapes = shapes_from_svg(TRIANGLE.as_bytes()).unwrap();
    assert_eq!(shapes.len(), 1);
    let b = shapes[0].bounds().unwrap();
    assert!((b.x0 - 1.0).abs() < 1e-6);
    assert!((b.x1 - 5.0).abs() < 1e-6);
    assert!((b.y0 + 2.0).abs() < 1e-6);
    assert!(b.y1.abs() < 1e-6);
    assert_eq!(shapes[0].style.fill, Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn rejects_invalid_svg() {
    assert!(shapes_from_svg(b"not svg").is_err());
}
