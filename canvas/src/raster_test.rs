use super::*;

const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);

fn red_image(w: u32, h: u32) -> RasterImage {
    RasterImage::from_rgba(&RgbaImage::from_pixel(w, h, RED)).unwrap()
}

fn identity() -> Placement {
    Placement { left: 0.0, top: 0.0, scale_x: 1.0, scale_y: 1.0 }
}

fn rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
    Rect { left, top, width, height }
}

// =============================================================
// encode / decode
// =============================================================

#[test]
fn from_rgba_records_dimensions() {
    let img = red_image(12, 7);
    assert_eq!((img.width, img.height), (12, 7));
    assert!(!img.png.is_empty());
}

#[test]
fn from_encoded_accepts_png() {
    let img = red_image(4, 4);
    let again = RasterImage::from_encoded(&img.png).unwrap();
    assert_eq!((again.width, again.height), (4, 4));
    assert_eq!(*again.decode().unwrap().get_pixel(2, 2), RED);
}

#[test]
fn from_encoded_rejects_garbage() {
    assert!(matches!(RasterImage::from_encoded(b"not an image"), Err(RasterError::Codec(_))));
}

#[test]
fn serde_uses_base64_string() {
    let img = red_image(2, 2);
    let json = serde_json::to_value(&img).unwrap();
    assert!(json["png"].is_string());
    let back: RasterImage = serde_json::from_value(json).unwrap();
    assert_eq!(back, img);
}

// =============================================================
// native_region
// =============================================================

#[test]
fn native_region_compensates_display_scale() {
    let img = red_image(100, 100);
    let placement = Placement { left: 10.0, top: 20.0, scale_x: 0.5, scale_y: 0.5 };
    let r = img.native_region(&rect(15.0, 25.0, 10.0, 5.0), &placement).unwrap();
    assert_eq!(r, PixelRect { x: 10, y: 10, width: 20, height: 10 });
}

#[test]
fn native_region_clamps_to_image() {
    let img = red_image(10, 10);
    let r = img.native_region(&rect(-5.0, 8.0, 10.0, 10.0), &identity()).unwrap();
    assert_eq!(r, PixelRect { x: 0, y: 8, width: 5, height: 2 });
}

#[test]
fn native_region_outside_is_error() {
    let img = red_image(10, 10);
    assert!(matches!(img.native_region(&rect(50.0, 50.0, 5.0, 5.0), &identity()), Err(RasterError::OutsideImage)));
}

#[test]
fn native_region_empty_is_error() {
    let img = red_image(10, 10);
    assert!(matches!(img.native_region(&rect(1.0, 1.0, 0.0, 5.0), &identity()), Err(RasterError::EmptyRegion)));
}

// =============================================================
// flatten
// =============================================================

#[test]
fn flatten_paints_region_white_only() {
    let img = red_image(10, 10);
    let flat = img.flatten(&rect(2.0, 2.0, 3.0, 3.0), &identity()).unwrap();
    let px = flat.decode().unwrap();
    assert_eq!(*px.get_pixel(3, 3), WHITE);
    assert_eq!(*px.get_pixel(2, 2), WHITE);
    assert_eq!(*px.get_pixel(4, 4), WHITE);
    assert_eq!(*px.get_pixel(5, 5), RED);
    assert_eq!(*px.get_pixel(0, 0), RED);
    assert_eq!((flat.width, flat.height), (10, 10));
}

#[test]
fn flatten_leaves_original_untouched() {
    let img = red_image(6, 6);
    let flat = img.flatten(&rect(0.0, 0.0, 6.0, 6.0), &identity()).unwrap();
    assert_eq!(*img.decode().unwrap().get_pixel(1, 1), RED);
    assert_eq!(*flat.decode().unwrap().get_pixel(1, 1), WHITE);
}

// =============================================================
// extract
// =============================================================

#[test]
fn extract_is_native_resolution() {
    let img = red_image(600, 600);
    let placement = Placement { left: 0.0, top: 0.0, scale_x: 0.5, scale_y: 0.5 };
    let out = img.extract(&rect(50.0, 50.0, 200.0, 200.0), &placement).unwrap();
    assert_eq!((out.width, out.height), (400, 400));
    assert_eq!(*out.decode().unwrap().get_pixel(0, 0), RED);
}

#[test]
fn extract_clips_to_image() {
    let img = red_image(10, 10);
    let out = img.extract(&rect(5.0, 5.0, 10.0, 10.0), &identity()).unwrap();
    assert_eq!((out.width, out.height), (5, 5));
    assert_eq!(*out.decode().unwrap().get_pixel(4, 4), RED);
}

#[test]
fn extract_never_exceeds_native_size() {
    let img = red_image(10, 10);
    let out = img.extract(&rect(0.0, 0.0, 3000.0, 3000.0), &identity()).unwrap();
    assert_eq!((out.width, out.height), (10, 10));
}

#[test]
fn extract_outside_image_is_error() {
    let img = red_image(10, 10);
    assert!(matches!(img.extract(&rect(20.0, 20.0, 5.0, 5.0), &identity()), Err(RasterError::OutsideImage)));
}

#[test]
fn extract_empty_is_error() {
    let img = red_image(10, 10);
    assert!(matches!(img.extract(&rect(0.0, 0.0, 0.2, 0.2), &identity()), Err(RasterError::EmptyRegion)));
}
