//! Placement of the overlay window on a display work-area.
//!
//! Every anchor has two rectangles. The end bounds are where the overlay rests while it is
//! open. The start bounds are where a show animation begins and a hide animation ends: on the
//! edge the anchor points at, or just past it.

use crate::config::{Anchor, SizeSpec};
use crate::platform::{Bounds, Size};

/// Turns one configured dimension into pixels. Values above 1 are pixels, anything else is a
/// fraction of `available`. The result never exceeds `available`.
pub fn resolve_dimension(spec: f64, available: u32) -> u32 {
    let pixels = if spec > 1.0 {
        spec.round()
    } else {
        (available as f64 * spec).round()
    };
    (pixels.max(0.0) as u32).min(available)
}

pub fn resolve_size(work_area: &Bounds, size: &SizeSpec) -> Size {
    Size::new(
        resolve_dimension(size.width, work_area.size.width),
        resolve_dimension(size.height, work_area.size.height),
    )
}

pub fn start_bounds(work_area: &Bounds, anchor: Anchor, size: &SizeSpec) -> Bounds {
    let (x, y) = (work_area.position.x, work_area.position.y);
    let (width, height) = (work_area.size.width, work_area.size.height);
    let Size {
        width: width_size,
        height: height_size,
    } = resolve_size(work_area, size);

    // One pixel inside the right edge, so the window stays on this display while off-screen.
    let right_edge = x + width as i32 - 1;
    let bottom_edge = y + height as i32;

    match anchor {
        Anchor::TopLeft => Bounds::new(x, y, width_size, height_size),
        Anchor::BottomLeft => Bounds::new(x, bottom_edge, width_size, height_size),
        Anchor::TopRight => Bounds::new(right_edge, y, width_size, height_size),
        Anchor::BottomRight => Bounds::new(right_edge, bottom_edge, width_size, height_size),
        Anchor::Center => Bounds::new(
            x + quarter(width),
            y + quarter(height),
            half(width),
            half(height),
        ),
        Anchor::Left => Bounds::new(x, y, width_size, height),
        Anchor::Right => Bounds::new(right_edge, y, width_size, height),
        Anchor::Bottom => Bounds::new(x, bottom_edge, width, height_size),
        Anchor::Top => Bounds::new(x, y, width, height_size),
    }
}

pub fn end_bounds(work_area: &Bounds, anchor: Anchor, size: &SizeSpec) -> Bounds {
    let (x, y) = (work_area.position.x, work_area.position.y);
    let (width, height) = (work_area.size.width, work_area.size.height);
    let Size {
        width: width_size,
        height: height_size,
    } = resolve_size(work_area, size);

    let flush_right = x + (width - width_size) as i32;
    let flush_bottom = y + (height - height_size) as i32;

    match anchor {
        Anchor::TopLeft => Bounds::new(x, y, width_size, height_size),
        Anchor::BottomLeft => Bounds::new(x, flush_bottom, width_size, height_size),
        Anchor::TopRight => Bounds::new(flush_right, y, width_size, height_size),
        Anchor::BottomRight => Bounds::new(flush_right, flush_bottom, width_size, height_size),
        Anchor::Center => Bounds::new(
            x + ((width - width_size) / 2) as i32,
            y + ((height - height_size) / 2) as i32,
            width_size,
            height_size,
        ),
        Anchor::Left => Bounds::new(x, y, width_size, height),
        Anchor::Bottom => Bounds::new(x, flush_bottom, width, height_size),
        Anchor::Right => Bounds::new(flush_right, y, width_size, height),
        Anchor::Top => Bounds::new(x, y, width, height_size),
    }
}

/// Records a user resize into `size`, keeping only the dimensions the anchor lets vary.
pub fn remember_size(anchor: Anchor, size: &mut SizeSpec, actual: &Size) {
    match anchor {
        Anchor::Top | Anchor::Bottom => size.height = pixels(actual.height),
        Anchor::Left | Anchor::Right => size.width = pixels(actual.width),
        Anchor::TopLeft
        | Anchor::TopRight
        | Anchor::BottomLeft
        | Anchor::BottomRight
        | Anchor::Center => {
            size.width = pixels(actual.width);
            size.height = pixels(actual.height);
        }
    }
}

/// A pixel length as a size value. 0 and 1 would read back as fractions.
fn pixels(length: u32) -> f64 {
    length.max(2) as f64
}

fn quarter(length: u32) -> i32 {
    (length as f64 / 4.0).round() as i32
}

fn half(length: u32) -> u32 {
    (length as f64 / 2.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_hd() -> Bounds {
        Bounds::new(0, 0, 1920, 1080)
    }

    fn sizes() -> Vec<SizeSpec> {
        vec![
            SizeSpec {
                width: 0.4,
                height: 0.4,
            },
            SizeSpec {
                width: 1.0,
                height: 0.3,
            },
            SizeSpec {
                width: 0.01,
                height: 1.0,
            },
            SizeSpec {
                width: 800.0,
                height: 600.0,
            },
            SizeSpec {
                width: 5000.0,
                height: 3000.0,
            },
        ]
    }

    fn work_areas() -> Vec<Bounds> {
        vec![
            full_hd(),
            Bounds::new(0, 25, 1440, 875),
            Bounds::new(1920, 0, 2560, 1400),
            Bounds::new(-1280, 200, 1280, 984),
        ]
    }

    #[test]
    fn test_top_scenario() {
        let size = SizeSpec {
            width: 1.0,
            height: 0.3,
        };
        assert_eq!(
            end_bounds(&full_hd(), Anchor::Top, &size),
            Bounds::new(0, 0, 1920, 324)
        );
        assert_eq!(
            start_bounds(&full_hd(), Anchor::Top, &size),
            Bounds::new(0, 0, 1920, 324)
        );
    }

    #[test]
    fn test_resolve_dimension() {
        assert_eq!(resolve_dimension(0.3, 1080), 324);
        assert_eq!(resolve_dimension(1.0, 1080), 1080);
        assert_eq!(resolve_dimension(600.0, 1080), 600);
        assert_eq!(resolve_dimension(1.5, 1080), 2);
        assert_eq!(resolve_dimension(4000.0, 1080), 1080);
    }

    #[test]
    fn test_end_bounds_stay_inside_work_area() {
        for work_area in work_areas() {
            for size in sizes() {
                for anchor in Anchor::ALL {
                    let end = end_bounds(&work_area, anchor, &size);
                    assert!(
                        work_area.encloses(&end),
                        "{anchor:?} {size:?} on {work_area:?} gave {end:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_end_bounds_flush_with_edges() {
        let area = Bounds::new(100, 50, 1000, 800);
        let size = SizeSpec {
            width: 300.0,
            height: 200.0,
        };

        let bottom_right = end_bounds(&area, Anchor::BottomRight, &size);
        assert_eq!(bottom_right, Bounds::new(800, 650, 300, 200));
        assert_eq!(bottom_right.right(), area.right());
        assert_eq!(bottom_right.bottom(), area.bottom());

        let right = end_bounds(&area, Anchor::Right, &size);
        assert_eq!(right, Bounds::new(800, 50, 300, 800));

        let bottom = end_bounds(&area, Anchor::Bottom, &size);
        assert_eq!(bottom, Bounds::new(100, 650, 1000, 200));

        let center = end_bounds(&area, Anchor::Center, &size);
        assert_eq!(center, Bounds::new(450, 350, 300, 200));
    }

    #[test]
    fn test_start_bounds_move_along_primary_axis() {
        let size = SizeSpec::default();
        let area = full_hd();

        for anchor in [Anchor::Bottom, Anchor::BottomLeft] {
            let start = start_bounds(&area, anchor, &size);
            let end = end_bounds(&area, anchor, &size);
            assert_eq!(start.position.x, end.position.x);
            assert_eq!(start.position.y, area.bottom());
            assert!(start.position.y > end.position.y);
        }

        for anchor in [Anchor::Right, Anchor::TopRight] {
            let start = start_bounds(&area, anchor, &size);
            let end = end_bounds(&area, anchor, &size);
            assert_eq!(start.position.y, end.position.y);
            assert_eq!(start.position.x, area.right() - 1);
            assert!(start.position.x > end.position.x);
        }

        let start = start_bounds(&area, Anchor::BottomRight, &size);
        let end = end_bounds(&area, Anchor::BottomRight, &size);
        assert!(start.position.x > end.position.x);
        assert!(start.position.y > end.position.y);
    }

    #[test]
    fn test_top_and_left_anchors_grow_in_place() {
        let size = SizeSpec::default();
        for anchor in [Anchor::Top, Anchor::Left, Anchor::TopLeft] {
            assert_eq!(
                start_bounds(&full_hd(), anchor, &size),
                end_bounds(&full_hd(), anchor, &size)
            );
        }
    }

    #[test]
    fn test_center_starts_from_half_work_area() {
        let area = Bounds::new(1920, 0, 2560, 1400);
        let start = start_bounds(&area, Anchor::Center, &SizeSpec::default());
        assert_eq!(start, Bounds::new(1920 + 640, 350, 1280, 700));
        assert_ne!(start, end_bounds(&area, Anchor::Center, &SizeSpec::default()));
    }

    #[test]
    fn test_edge_anchors_keep_orthogonal_dimension() {
        let area = Bounds::new(0, 25, 1440, 875);
        let size = SizeSpec {
            width: 0.5,
            height: 0.5,
        };
        for anchor in [Anchor::Top, Anchor::Bottom] {
            assert_eq!(end_bounds(&area, anchor, &size).size.width, 1440);
            assert_eq!(start_bounds(&area, anchor, &size).size.width, 1440);
        }
        for anchor in [Anchor::Left, Anchor::Right] {
            assert_eq!(end_bounds(&area, anchor, &size).size.height, 875);
            assert_eq!(start_bounds(&area, anchor, &size).size.height, 875);
        }
    }

    #[test]
    fn test_remember_size_by_anchor() {
        let actual = Size::new(700, 350);

        let mut size = SizeSpec::default();
        remember_size(Anchor::Top, &mut size, &actual);
        assert_eq!((size.width, size.height), (0.4, 350.0));

        let mut size = SizeSpec::default();
        remember_size(Anchor::Right, &mut size, &actual);
        assert_eq!((size.width, size.height), (700.0, 0.4));

        let mut size = SizeSpec::default();
        remember_size(Anchor::Center, &mut size, &actual);
        assert_eq!((size.width, size.height), (700.0, 350.0));
    }

    #[test]
    fn test_remember_size_keeps_tiny_windows_in_pixels() {
        let area = Bounds::new(0, 0, 1920, 1080);
        let mut size = SizeSpec::default();
        remember_size(Anchor::Center, &mut size, &Size::new(1, 0));

        assert_eq!((size.width, size.height), (2.0, 2.0));
        assert_eq!(resolve_size(&area, &size), Size::new(2, 2));
    }
}
