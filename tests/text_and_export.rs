use std::cell::RefCell;
use std::rc::Rc;

use egui::{Color32, Pos2, pos2};
use raster_sketch::{Canvas, CanvasError, Modifiers, PromptReply, ToolMode, TransitionError};

fn painted_pixels(canvas: &Canvas) -> usize {
    canvas
        .surface()
        .pixels()
        .pixels()
        .filter(|p| p.0 != [255, 255, 255, 255])
        .count()
}

fn text_canvas() -> Canvas {
    let mut canvas = Canvas::new(300, 200);
    canvas.set_mode(ToolMode::Text);
    canvas
}

#[test]
fn test_synchronous_prompt_stamps_immediately() {
    let asked = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&asked);

    let mut canvas = text_canvas();
    canvas.set_text_prompt(move |at: Pos2| {
        log.borrow_mut().push(at);
        PromptReply::Text("Hello".to_owned())
    });
    canvas.on_pointer_down(pos2(20.0, 30.0), Modifiers::NONE);

    assert_eq!(*asked.borrow(), vec![pos2(20.0, 30.0)]);
    assert!(canvas.state().is_idle());
    assert_eq!(canvas.history().len(), 2);
    assert!(painted_pixels(&canvas) > 0);

    // Text is a stamp, not a gesture; up and moves have nothing to commit.
    canvas.on_pointer_move(pos2(200.0, 150.0), Modifiers::NONE);
    canvas.on_pointer_up();
    assert_eq!(canvas.history().len(), 2);
}

#[test]
fn test_cancelled_or_empty_prompt_records_nothing() {
    let mut canvas = text_canvas();
    canvas.set_text_prompt(|_: Pos2| PromptReply::Cancelled);
    canvas.on_pointer_down(pos2(20.0, 30.0), Modifiers::NONE);
    assert_eq!(canvas.history().len(), 1);
    assert!(canvas.state().is_idle());

    canvas.set_text_prompt(|_: Pos2| PromptReply::Text(String::new()));
    canvas.on_pointer_down(pos2(20.0, 30.0), Modifiers::NONE);
    assert_eq!(canvas.history().len(), 1);
    assert_eq!(painted_pixels(&canvas), 0);
}

#[test]
fn test_deferred_text_is_resolved_later() {
    let mut canvas = text_canvas();
    canvas.on_pointer_down(pos2(40.0, 50.0), Modifiers::NONE);

    assert!(canvas.state().is_awaiting_text());
    assert_eq!(canvas.pending_text(), Some(pos2(40.0, 50.0)));
    assert_eq!(painted_pixels(&canvas), 0);

    let status = canvas.resolve_text(Some("Notes".to_owned())).unwrap();
    assert!(status.can_undo);
    assert!(canvas.state().is_idle());
    assert!(painted_pixels(&canvas) > 0);

    // Glyphs land below and right of the click.
    let (x0, y0) = canvas
        .surface()
        .pixels()
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 != [255, 255, 255, 255])
        .fold((u32::MAX, u32::MAX), |(mx, my), (x, y, _)| (mx.min(x), my.min(y)));
    assert!(x0 >= 40 && y0 >= 50);
}

#[test]
fn test_deferred_text_cancelled() {
    let mut canvas = text_canvas();
    canvas.on_pointer_down(pos2(40.0, 50.0), Modifiers::NONE);

    let status = canvas.resolve_text(None).unwrap();
    assert!(!status.can_undo);
    assert!(canvas.state().is_idle());

    canvas.on_pointer_down(pos2(40.0, 50.0), Modifiers::NONE);
    canvas.resolve_text(Some(String::new())).unwrap();
    assert_eq!(canvas.history().len(), 1);
    assert_eq!(painted_pixels(&canvas), 0);
}

#[test]
fn test_resolve_without_request_is_an_error() {
    let mut canvas = text_canvas();
    assert_eq!(
        canvas.resolve_text(Some("late".to_owned())),
        Err(TransitionError::NotAwaitingText { state: "Idle" })
    );
}

#[test]
fn test_pointer_ignored_while_awaiting_text() {
    let mut canvas = text_canvas();
    canvas.on_pointer_down(pos2(40.0, 50.0), Modifiers::NONE);
    canvas.set_mode(ToolMode::Pen);

    canvas.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE);
    canvas.on_pointer_move(pos2(200.0, 10.0), Modifiers::NONE);
    canvas.on_pointer_up();
    canvas.on_pointer_leave();

    assert!(canvas.state().is_awaiting_text());
    assert_eq!(painted_pixels(&canvas), 0);
    assert_eq!(canvas.history().len(), 1);
    assert!(matches!(canvas.undo(), Err(TransitionError::Busy { .. })));

    // The stamp uses the color current at resolution time.
    canvas.set_color(Color32::BLUE);
    canvas.set_width(20.0);
    canvas.resolve_text(Some("x".to_owned())).unwrap();
    assert!(
        canvas
            .surface()
            .pixels()
            .pixels()
            .any(|p| p.0[2] == 255 && p.0[0] < 64)
    );
}

#[test]
fn test_initialize_drops_pending_text() {
    let mut canvas = text_canvas();
    canvas.on_pointer_down(pos2(40.0, 50.0), Modifiers::NONE);
    canvas.initialize(320, 240);

    assert!(canvas.pending_text().is_none());
    assert!(canvas.resolve_text(Some("gone".to_owned())).is_err());
}

#[test]
fn test_invalid_font_is_rejected() {
    let mut canvas = text_canvas();
    let result = canvas.set_font(b"not a font".to_vec());
    assert!(matches!(result, Err(CanvasError::Font(_))));

    // The bundled font is still in place.
    canvas.set_text_prompt(|_: Pos2| PromptReply::Text("ok".to_owned()));
    canvas.on_pointer_down(pos2(10.0, 10.0), Modifiers::NONE);
    assert!(painted_pixels(&canvas) > 0);
}

#[test]
fn test_export_png_round_trips_pixels() {
    let mut canvas = Canvas::new(160, 120);
    canvas.set_color(Color32::from_rgb(200, 30, 40));
    canvas.on_pointer_down(pos2(10.0, 60.0), Modifiers::NONE);
    canvas.on_pointer_move(pos2(150.0, 60.0), Modifiers::NONE);
    canvas.on_pointer_up();

    let bytes = canvas.export_png().unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (160, 120));
    assert_eq!(&decoded, canvas.surface().pixels());
}

#[test]
fn test_save_png_writes_file() {
    let canvas = Canvas::new(120, 100);
    let path = std::env::temp_dir().join(format!("raster_sketch_{}.png", std::process::id()));

    canvas.save_png(&path).unwrap();
    let written = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, canvas.export_png().unwrap());
}

#[test]
fn test_save_png_reports_io_errors() {
    let canvas = Canvas::new(120, 100);
    let path = std::env::temp_dir()
        .join("raster_sketch_missing_dir")
        .join("nested")
        .join("out.png");
    assert!(matches!(canvas.save_png(&path), Err(CanvasError::Io(_))));
}
