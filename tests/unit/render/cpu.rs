use super::*;

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn clear_fills_the_whole_frame() {
    let canvas = Canvas::new(16, 8).unwrap();
    let mut surface = CpuSurface::new(canvas).unwrap();
    surface.clear(Hsba::opaque(0.0, 100.0, 100.0));
    let frame = surface.finish_frame();
    assert_eq!(frame.width, 16);
    assert_eq!(frame.height, 8);
    assert!(frame.premultiplied);
    assert_eq!(frame.data.len(), 16 * 8 * 4);
    assert_eq!(px(&frame, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 15, 7), [255, 0, 0, 255]);
}

#[test]
fn polygon_covers_its_interior_only() {
    let canvas = Canvas::new(32, 32).unwrap();
    let mut surface = CpuSurface::new(canvas).unwrap();
    surface.clear(Hsba::opaque(0.0, 0.0, 0.0));
    let square = [
        Point::new(8.0, 8.0),
        Point::new(24.0, 8.0),
        Point::new(24.0, 24.0),
        Point::new(8.0, 24.0),
    ];
    surface.fill_polygon(&square, Hsba::opaque(0.0, 0.0, 100.0));
    assert_eq!(surface.fill_count(), 1);
    let frame = surface.finish_frame();
    assert_eq!(px(&frame, 16, 16), [255, 255, 255, 255]);
    assert_eq!(px(&frame, 2, 2), [0, 0, 0, 255]);
}

#[test]
fn degenerate_polygons_are_skipped() {
    let mut surface = CpuSurface::new(Canvas::new(8, 8).unwrap()).unwrap();
    surface.clear(Hsba::opaque(0.0, 0.0, 0.0));
    surface.fill_polygon(&[], Hsba::opaque(0.0, 0.0, 100.0));
    surface.fill_polygon(
        &[Point::new(0.0, 0.0), Point::new(8.0, 8.0)],
        Hsba::opaque(0.0, 0.0, 100.0),
    );
    assert_eq!(surface.fill_count(), 0);
}

#[test]
fn resize_rebuilds_buffers_and_rejects_oversized() {
    let mut surface = CpuSurface::new(Canvas::new(8, 8).unwrap()).unwrap();
    surface.resize(Canvas::new(10, 6).unwrap()).unwrap();
    surface.clear(Hsba::opaque(0.0, 0.0, 0.0));
    let frame = surface.finish_frame();
    assert_eq!((frame.width, frame.height), (10, 6));
    assert_eq!(frame.data.len(), 10 * 6 * 4);

    assert!(surface.resize(Canvas::new(70_000, 8).unwrap()).is_err());
    assert_eq!(surface.size(), Canvas::new(10, 6).unwrap());
    assert!(CpuSurface::new(Canvas::new(8, 70_000).unwrap()).is_err());
}
