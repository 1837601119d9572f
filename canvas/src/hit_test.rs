use super::*;
use crate::doc::{Shape, Style};

fn rect(left: f64, top: f64, w: f64, h: f64) -> Drawable {
    Drawable::new(Shape::Rect { width: w, height: h }, left, top, Style::default())
}

#[test]
fn empty_scene_hits_nothing() {
    assert_eq!(topmost(&[], Point::new(0.0, 0.0)), None);
}

#[test]
fn hit_inside_bounds() {
    let r = rect(10.0, 10.0, 20.0, 20.0);
    let id = r.id;
    assert_eq!(topmost(&[r], Point::new(15.0, 25.0)), Some(id));
}

#[test]
fn miss_outside_bounds() {
    let r = rect(10.0, 10.0, 20.0, 20.0);
    assert_eq!(topmost(&[r], Point::new(31.0, 15.0)), None);
}

#[test]
fn topmost_wins_on_overlap() {
    let below = rect(0.0, 0.0, 50.0, 50.0);
    let above = rect(10.0, 10.0, 10.0, 10.0);
    let above_id = above.id;
    assert_eq!(topmost(&[below, above], Point::new(15.0, 15.0)), Some(above_id));
}

#[test]
fn previews_are_transparent_to_hits() {
    let below = rect(0.0, 0.0, 50.0, 50.0);
    let below_id = below.id;
    let preview = rect(0.0, 0.0, 50.0, 50.0).into_preview();
    assert_eq!(topmost(&[below, preview], Point::new(5.0, 5.0)), Some(below_id));
}

#[test]
fn non_interactive_is_skipped() {
    let mut r = rect(0.0, 0.0, 50.0, 50.0);
    r.interactive = false;
    assert_eq!(topmost(&[r], Point::new(5.0, 5.0)), None);
}
