use approx::assert_relative_eq;
use plotnav::api::{ChannelId, ChannelKind, CursorConfig, NavigatorConfig, PlotChannel, PlotWidget};
use plotnav::core::{AxisId, CanvasSize, DataRect, Interval, PixelPoint};
use plotnav::interaction::{KeyModifiers, Modifier, WheelInput};
use plotnav::render::NullRepainter;

fn widget(config: NavigatorConfig) -> PlotWidget {
    let mut widget = PlotWidget::new(
        CanvasSize::new(1000, 500),
        Interval::new(0.0, 100.0),
        Interval::new(-1.0, 1.0),
        Box::new(NullRepainter::default()),
        config,
        CursorConfig::default(),
    )
    .expect("widget");
    widget
        .add_channel(PlotChannel::new(
            ChannelId(1),
            "ch1",
            ChannelKind::Time,
            AxisId::x_bottom(),
            AxisId::y_left(),
        ))
        .expect("channel");
    widget
}

#[test]
fn repeated_zoom_in_narrows_towards_cursor_inside_base() {
    let mut widget = widget(NavigatorConfig::default());
    let center = PixelPoint::new(500.0, 250.0);
    let mut previous = Interval::new(0.0, 100.0);

    for _ in 0..3 {
        widget
            .force_magnify(AxisId::x_bottom(), 0.9, center)
            .expect("magnified");
        let current = widget.interval(AxisId::x_bottom()).expect("x");
        assert!(current.span() < previous.span());
        assert!(current.is_within(Interval::new(0.0, 100.0), 1e-9));
        assert_relative_eq!(current.center(), 50.0, epsilon = 1e-9);
        previous = current;
    }

    assert_relative_eq!(previous.start, 13.55, epsilon = 1e-9);
    assert_relative_eq!(previous.end, 86.45, epsilon = 1e-9);
}

#[test]
fn bounded_zoom_out_never_leaves_base() {
    let mut widget = widget(NavigatorConfig::default());
    widget
        .force_magnify(AxisId::x_bottom(), 0.5, PixelPoint::new(100.0, 0.0))
        .expect("zoom in");
    widget.force_magnify(AxisId::x_bottom(), 3.0, PixelPoint::new(900.0, 0.0));
    let x = widget.interval(AxisId::x_bottom()).expect("x");
    assert!(x.is_within(Interval::new(0.0, 100.0), 1e-9));
}

#[test]
fn wheel_zoom_keeps_value_under_pointer() {
    let mut widget = widget(NavigatorConfig::default());
    let pointer = PixelPoint::new(250.0, 100.0);
    let before = widget
        .surface()
        .pixel_to_value(AxisId::x_bottom(), pointer.x)
        .expect("value");

    assert!(widget.wheel(WheelInput::vertical(120.0, pointer, KeyModifiers::none())));

    let x = widget.interval(AxisId::x_bottom()).expect("x");
    assert_relative_eq!(x.span(), 95.0, epsilon = 1e-9);
    let after = widget
        .surface()
        .pixel_to_value(AxisId::x_bottom(), pointer.x)
        .expect("value");
    assert_relative_eq!(after, before, epsilon = 1e-9);
}

#[test]
fn shift_wheel_pans_and_keeps_span() {
    let mut widget = widget(NavigatorConfig::default().with_bounded(false));
    assert!(widget.wheel(WheelInput::vertical(
        120.0,
        PixelPoint::new(10.0, 10.0),
        KeyModifiers::shift()
    )));
    let x = widget.interval(AxisId::x_bottom()).expect("x");
    assert_relative_eq!(x.span(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(x.start, 2.5, epsilon = 1e-9);
    assert_eq!(widget.interval(AxisId::y_left()), Some(Interval::new(-1.0, 1.0)));
}

#[test]
fn pan_never_moves_vertical_axes() {
    let mut widget = widget(NavigatorConfig::default());
    widget
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(20.0, 40.0)))
        .expect("zoom x");
    widget
        .force_zoom(AxisId::y_left(), DataRect::from_y(Interval::new(-0.5, 0.5)))
        .expect("zoom y");

    assert!(widget.wheel(WheelInput::vertical(
        -120.0,
        PixelPoint::new(500.0, 250.0),
        KeyModifiers::shift()
    )));
    let x = widget.interval(AxisId::x_bottom()).expect("x");
    assert!(x.start < 20.0);
    assert_relative_eq!(x.span(), 20.0, epsilon = 1e-9);
    assert_eq!(widget.interval(AxisId::y_left()), Some(Interval::new(-0.5, 0.5)));

    assert!(widget.force_pan(AxisId::y_left(), 0.5).is_none());
    assert_eq!(widget.interval(AxisId::y_left()), Some(Interval::new(-0.5, 0.5)));
}

#[test]
fn unbound_wheel_modifier_is_ignored() {
    let mut widget = widget(NavigatorConfig::default());
    widget
        .navigator_mut()
        .set_magnifier_zoom_modifier(Some(Modifier::Control));
    assert!(!widget.wheel(WheelInput::vertical(
        120.0,
        PixelPoint::new(10.0, 10.0),
        KeyModifiers::none()
    )));
    assert_eq!(
        widget.interval(AxisId::x_bottom()),
        Some(Interval::new(0.0, 100.0))
    );
}

#[test]
fn disabled_x_axes_leave_x_untouched() {
    let mut widget = widget(NavigatorConfig::default());
    widget.navigator_mut().set_x_axes_en(false);
    widget.wheel(WheelInput::vertical(
        120.0,
        PixelPoint::new(500.0, 250.0),
        KeyModifiers::none(),
    ));
    assert_eq!(
        widget.interval(AxisId::x_bottom()),
        Some(Interval::new(0.0, 100.0))
    );
    let y = widget.interval(AxisId::y_left()).expect("y");
    assert!(y.span() < 2.0);
}

#[test]
fn unit_and_invalid_factors_are_no_ops() {
    let mut widget = widget(NavigatorConfig::default());
    let center = PixelPoint::new(500.0, 250.0);
    assert!(widget.force_magnify(AxisId::x_bottom(), 1.0, center).is_none());
    assert!(widget.force_magnify(AxisId::x_bottom(), 0.0, center).is_none());
    assert!(widget.force_magnify(AxisId::x_bottom(), f64::NAN, center).is_none());
    assert!(widget.force_pan(AxisId::x_bottom(), 1.0).is_none());
    assert_eq!(
        widget.interval(AxisId::x_bottom()),
        Some(Interval::new(0.0, 100.0))
    );
}
