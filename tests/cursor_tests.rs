use approx::assert_relative_eq;
use plotnav::api::{ChannelId, ChannelKind, CursorConfig, NavigatorConfig, PlotChannel, PlotWidget};
use plotnav::core::{AxisId, CanvasSize, Interval, PixelPoint, PlotSurface};
use plotnav::extensions::{CursorPairController, CursorSlot, HandleEvent, SampleSeries};
use plotnav::interaction::PointerButton;
use plotnav::render::NullRepainter;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn surface() -> PlotSurface {
    let mut surface =
        PlotSurface::new(CanvasSize::new(1000, 500), Box::new(NullRepainter::default()))
            .expect("surface");
    surface
        .add_axis(AxisId::x_bottom(), Interval::new(0.0, 10.0))
        .expect("x");
    surface
}

fn widget(cursors: CursorConfig) -> PlotWidget {
    let mut widget = PlotWidget::new(
        CanvasSize::new(1000, 500),
        Interval::new(0.0, 0.01),
        Interval::new(-2.0, 2.0),
        Box::new(NullRepainter::default()),
        NavigatorConfig::default(),
        cursors,
    )
    .expect("widget");
    let samples = SampleSeries::uniform(0.0, 0.001, (0..=10).map(f64::from).collect())
        .expect("samples");
    widget
        .add_channel(
            PlotChannel::new(
                ChannelId(1),
                "ch1",
                ChannelKind::Time,
                AxisId::x_bottom(),
                AxisId::y_left(),
            )
            .with_samples(samples),
        )
        .expect("channel");
    widget
}

#[test]
fn partner_moves_silently_while_locked() {
    let mut surface = surface();
    let mut pair =
        CursorPairController::new(AxisId::x_bottom(), 4.0, 1.0, &mut surface).expect("pair");
    let moves = Rc::new(RefCell::new(Vec::new()));
    for slot in [CursorSlot::First, CursorSlot::Second] {
        let sink = Rc::clone(&moves);
        pair.cursor_mut(slot)
            .handle_mut()
            .subscribe(move |HandleEvent::PositionChanged(value)| {
                sink.borrow_mut().push((slot, *value));
            });
    }

    pair.set_lock(true);
    pair.set_handle_pos(CursorSlot::First, 7.0);
    assert_eq!(pair.positions(), (7.0, 4.0));
    assert_eq!(*moves.borrow(), vec![(CursorSlot::First, 7.0)]);
}

#[test]
fn cursors_follow_zoom_without_changing_value() {
    let mut widget = widget(CursorConfig::default().with_visible(true));
    let before = widget.cursors().horizontal().positions();
    let pixel_before = widget
        .cursors()
        .horizontal()
        .cursor(CursorSlot::First)
        .pixel();

    widget
        .force_magnify(AxisId::x_bottom(), 0.5, PixelPoint::new(0.0, 0.0))
        .expect("zoomed");
    widget.resize(CanvasSize::new(500, 500)).expect("resize");

    assert_eq!(widget.cursors().horizontal().positions(), before);
    let pixel_after = widget
        .cursors()
        .horizontal()
        .cursor(CursorSlot::First)
        .pixel();
    assert_relative_eq!(pixel_after, pixel_before, epsilon = 1e-9);
}

#[test]
fn tracking_markers_sample_selected_trace() {
    let mut widget = widget(CursorConfig::default().with_visible(true).with_tracking(true));
    // Horizontal cursors start at 2.5 ms and 7.5 ms.
    let [first, second] = widget.tracking_points();
    let first = first.expect("first marker");
    let second = second.expect("second marker");
    assert_relative_eq!(first.y, 2.5, epsilon = 1e-9);
    assert_relative_eq!(second.y, 7.5, epsilon = 1e-9);
    assert!(!widget.cursors().is_vertical_visible());

    assert!(widget.mouse_press(PixelPoint::new(250.0, 10.0), PointerButton::Left));
    widget.mouse_move(PixelPoint::new(500.0, 10.0));
    widget.mouse_release(PixelPoint::new(500.0, 10.0), PointerButton::Left);
    let [first, _] = widget.tracking_points();
    assert_relative_eq!(first.expect("marker").y, 5.0, epsilon = 1e-9);
}

#[test]
fn readouts_use_channel_units() {
    let widget = widget(CursorConfig::default().with_visible(true));
    let horizontal = widget.cursors().horizontal_readout().expect("horizontal");
    assert_eq!(horizontal.first, "2.500 ms");
    assert_eq!(horizontal.second, "7.500 ms");
    assert_eq!(horizontal.delta, "5.000 ms");
    assert_eq!(horizontal.reciprocal.as_deref(), Some("200.000 Hz"));

    let vertical = widget.cursors().vertical_readout().expect("vertical");
    assert_eq!(vertical.first, "-1.000 V");
    assert_eq!(vertical.delta, "2.000 V");
    assert!(vertical.reciprocal.is_none());
}

#[test]
fn selecting_a_channel_retargets_units() {
    let mut widget = widget(CursorConfig::default().with_visible(true));
    widget
        .set_axis_units(AxisId::y_left(), "A")
        .expect("units");
    widget
        .add_channel(PlotChannel::new(
            ChannelId(2),
            "spectrum",
            ChannelKind::Fft,
            AxisId::x_bottom(),
            AxisId::y_left(),
        ))
        .expect("channel");
    widget.select_channel(ChannelId(2)).expect("selected");

    let readouts = widget.cursors().readouts();
    assert_eq!(readouts.horizontal_formatter().units(), "Hz");
    assert_eq!(readouts.vertical_formatter().units(), "A");
    assert!(!readouts.shows_reciprocal());
    assert!(widget.select_channel(ChannelId(9)).is_err());
}

proptest! {
    #[test]
    fn lock_gap_is_preserved(
        p1 in -50.0f64..50.0,
        p2 in -50.0f64..50.0,
        moves in proptest::collection::vec((any::<bool>(), -100.0f64..100.0), 1..20),
    ) {
        let mut surface = surface();
        let mut pair = CursorPairController::new(AxisId::x_bottom(), p1, p2, &mut surface)
            .expect("pair");
        pair.set_can_leave_axis(true);
        pair.set_lock(true);
        let gap = p1 - p2;

        for (first, target) in moves {
            let slot = if first { CursorSlot::First } else { CursorSlot::Second };
            let (a, b) = pair.set_handle_pos(slot, target);
            prop_assert!(((a - b) - gap).abs() <= 1e-9);
        }
    }
}
