use std::sync::Arc;
use std::thread;

use softgl::core::{
    Capability, HeadlessSurface, Rectangle, RenderError, SoftwareProgram, SoftwareRenderer, SoftwareTexture,
    VertexOutput, MAX_DEPTH,
};
use softgl::{Buffering, RendererConfig};

fn config(width: u32, height: u32) -> RendererConfig {
    RendererConfig {
        width,
        height,
        ..Default::default()
    }
}

fn renderer(width: u32, height: u32) -> SoftwareRenderer<HeadlessSurface> {
    SoftwareRenderer::new(HeadlessSurface::new(), &config(width, height)).unwrap()
}

fn noop_program() -> Arc<SoftwareProgram> {
    SoftwareProgram::shared(
        |_input, _env| VertexOutput::new(glam::Vec4::W, Vec::new()),
        |_varyings, _env| None,
    )
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_construction_allocates_nothing() {
    let r = renderer(16, 16);
    assert!(!r.is_initialized());
    assert!(!r.surface().is_visible());
    assert_eq!(r.surface().size(), (0, 0));
    assert_eq!(r.read_pixel_color(0, 0), Err(RenderError::NotInitialized));
}

#[test]
fn test_init_then_dispose_then_init() {
    let mut r = renderer(4, 2);
    r.init().unwrap();
    assert!(r.is_initialized());
    assert!(r.surface().is_visible());

    r.dispose();
    assert!(!r.is_initialized());
    assert_eq!(r.clear_pixels(), Err(RenderError::NotInitialized));

    r.init().unwrap();
    r.clear_pixels().unwrap();
    assert_eq!(r.read_pixel_depth(3, 1).unwrap(), MAX_DEPTH);
}

#[test]
fn test_dispose_keeps_texture_bindings() {
    let mut r = renderer(2, 2);
    r.init().unwrap();
    r.bind_texture(3, Arc::new(SoftwareTexture::checkerboard(2, 2, 1, 1, 2)));
    r.set_program(Some(noop_program()));

    r.dispose();
    assert!(r.program().is_none());
    assert!(r.texture(3).is_some());
}

#[test]
fn test_zero_scale_config_rejected() {
    let bad = RendererConfig {
        scale: 0,
        ..Default::default()
    };
    assert!(matches!(
        SoftwareRenderer::new(HeadlessSurface::new(), &bad),
        Err(RenderError::InvalidConfig(_))
    ));
}

#[test]
fn test_overflowing_scaled_size_rejected_at_construction() {
    let bad = RendererConfig {
        width: 70000,
        height: 1,
        scale: 70000,
        ..Default::default()
    };
    assert!(matches!(
        SoftwareRenderer::new(HeadlessSurface::new(), &bad),
        Err(RenderError::InvalidConfig(_))
    ));
}

#[test]
fn test_overflowing_resize_keeps_previous_size() {
    let cfg = RendererConfig { scale: 4, ..config(3, 3) };
    let mut r = SoftwareRenderer::new(HeadlessSurface::new(), &cfg).unwrap();
    r.init().unwrap();

    assert!(matches!(r.set_window_size(u32::MAX / 2, 2), Err(RenderError::InvalidConfig(_))));
    assert_eq!((r.window_width(), r.window_height()), (3, 3));
    assert_eq!(r.surface().size(), (12, 12));
    assert!(r.read_pixel_color(2, 2).is_ok());
}

#[test]
fn test_config_settings_reach_pipeline() {
    let cfg = RendererConfig {
        debug: false,
        depth_writing: false,
        clear_color: 0x0A0B0C,
        buffering: Buffering::Double,
        ..config(2, 2)
    };
    let r = SoftwareRenderer::new(HeadlessSurface::new(), &cfg).unwrap();
    assert!(!r.is_debug_enabled());
    assert!(!r.is_depth_writing());
    assert_eq!(r.clear_color(), 0x0A0B0C);
}

// ============================================================================
// Window
// ============================================================================

#[test]
fn test_title_and_scaled_surface_size() {
    let cfg = RendererConfig {
        title: "spinning".to_string(),
        scale: 3,
        ..config(10, 5)
    };
    let mut r = SoftwareRenderer::new(HeadlessSurface::new(), &cfg).unwrap();
    r.init().unwrap();
    assert_eq!(r.surface().title(), "spinning");
    assert_eq!(r.surface().size(), (30, 15));

    r.set_window_title("renamed");
    assert_eq!(r.window_title(), "renamed");
    assert_eq!(r.surface().title(), "renamed");

    r.set_window_size(4, 4).unwrap();
    assert_eq!((r.window_width(), r.window_height()), (4, 4));
    assert_eq!(r.surface().size(), (12, 12));
}

#[test]
fn test_resize_before_init_defers_allocation() {
    let mut r = renderer(2, 2);
    r.set_window_size(5, 7).unwrap();
    assert_eq!(r.surface().size(), (0, 0));

    r.init().unwrap();
    assert_eq!(r.view_port(), Rectangle::sized(5, 7));
    assert!(r.read_pixel_color(4, 6).is_ok());
}

#[test]
fn test_viewport_set_copies() {
    let mut r = renderer(8, 8);
    r.init().unwrap();
    let mut vp = Rectangle::new(1, 2, 3, 4);
    r.set_view_port(vp);
    vp.set_size(100, 100);
    assert_eq!(r.view_port(), Rectangle::new(1, 2, 3, 4));
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn test_present_copies_color_buffer() {
    let cfg = RendererConfig { scale: 2, ..config(3, 2) };
    let mut r = SoftwareRenderer::new(HeadlessSurface::new(), &cfg).unwrap();
    r.init().unwrap();
    r.set_clear_color(0x336699);
    r.clear_pixels().unwrap();
    r.write_pixel(2, 1, 0, 0xFFFFFF).unwrap();
    r.present().unwrap();

    let surface = r.surface();
    assert_eq!(surface.present_count(), 1);
    assert_eq!(surface.last_dimensions(), (3, 2));
    assert_eq!(surface.last_scale(), 2);
    assert_eq!(surface.last_frame(), &[0x336699, 0x336699, 0x336699, 0x336699, 0x336699, 0xFFFFFF]);
}

#[test]
fn test_present_after_resize_uses_new_size() {
    let mut r = renderer(2, 2);
    r.init().unwrap();
    r.set_window_size(3, 1).unwrap();
    r.clear_pixels().unwrap();
    r.present().unwrap();
    assert_eq!(r.surface().last_dimensions(), (3, 1));
    assert_eq!(r.surface().last_frame().len(), 3);
}

// ============================================================================
// Close signal
// ============================================================================

#[test]
fn test_close_requested_once_per_gesture() {
    let r = renderer(1, 1);
    assert!(!r.poll_close_requested());

    r.close_signal().request();
    assert!(r.poll_close_requested());
    assert!(!r.poll_close_requested());
    assert!(!r.poll_close_requested());

    // Two gestures before a poll collapse into one
    r.close_signal().request();
    r.close_signal().request();
    assert!(r.poll_close_requested());
    assert!(!r.poll_close_requested());
}

#[test]
fn test_close_requested_from_event_thread() {
    let r = renderer(1, 1);
    let signal = r.close_signal();
    thread::spawn(move || signal.request()).join().unwrap();
    assert!(r.poll_close_requested());
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn test_texture_rebinding_and_sparse_units() {
    let mut r = renderer(1, 1);
    let first = Arc::new(SoftwareTexture::checkerboard(1, 1, 1, 1, 1));
    let second = Arc::new(SoftwareTexture::checkerboard(1, 1, 1, 2, 2));

    r.bind_texture(7, first);
    r.bind_texture(7, second.clone());
    assert!(Arc::ptr_eq(r.texture(7).unwrap(), &second));

    r.bind_texture(u32::MAX, second);
    assert!(r.texture(u32::MAX).is_some());
    assert!(r.texture(8).is_none());

    r.unbind_texture(7);
    assert!(r.texture(7).is_none());
}

#[test]
fn test_program_slot_last_writer_wins() {
    let mut r = renderer(1, 1);
    let a = noop_program();
    let b = noop_program();
    r.set_program(Some(a));
    r.set_program(Some(b.clone()));
    assert!(Arc::ptr_eq(r.program().unwrap(), &b));
    r.set_program(None);
    assert!(r.program().is_none());
}

#[test]
fn test_capabilities_are_independent() {
    let mut r = renderer(1, 1);
    for cap in Capability::ALL {
        assert!(!r.is_enabled(cap));
    }
    r.set_capability_enabled(Capability::Blend, true);
    r.set_capability_enabled(Capability::DepthClamp, true);
    r.set_capability_enabled(Capability::Blend, false);

    assert!(!r.is_enabled(Capability::Blend));
    assert!(r.is_enabled(Capability::DepthClamp));
    assert!(!r.is_enabled(Capability::DepthTest));
    assert!(!r.is_enabled(Capability::CullFace));
}
