use flow_folio::context::{MAX_PIXEL_RATIO, MouseState, capped_surface_size};
use winit::dpi::PhysicalPosition;

#[test]
fn ordinary_screens_render_at_full_size() {
    assert_eq!(capped_surface_size(1280, 720, 1.0), (1280, 720));
    assert_eq!(capped_surface_size(2560, 1440, MAX_PIXEL_RATIO), (2560, 1440));
}

#[test]
fn dense_screens_are_capped_at_twice_the_css_size() {
    // 1000 x 500 css pixels at a ratio of 3
    assert_eq!(capped_surface_size(3000, 1500, 3.0), (2000, 1000));
    assert_eq!(capped_surface_size(1, 1, 4.0), (1, 1));
}

#[test]
fn pointer_starts_off_screen() {
    let mut mouse = MouseState::default();
    assert!(mouse.ndc.x < -1.0 && mouse.ndc.y < -1.0);

    mouse.move_to(PhysicalPosition::new(400.0, 300.0), 800, 600);
    assert_eq!(mouse.ndc, cgmath::Vector2::new(0.0, 0.0));
}
