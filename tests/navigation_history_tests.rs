use std::cell::RefCell;
use std::rc::Rc;

use plotnav::api::{
    ChannelId, ChannelKind, CursorConfig, EventOrigin, NavigationKind, NavigatorConfig,
    NavigatorEvent, PlotChannel, PlotWidget,
};
use plotnav::core::{AxisId, CanvasSize, DataRect, Interval, PixelPoint};
use plotnav::interaction::PointerButton;
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

fn x(widget: &PlotWidget) -> Interval {
    widget.interval(AxisId::x_bottom()).expect("x axis")
}

fn zoom_x(widget: &mut PlotWidget, start: f64, end: f64) {
    widget
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(start, end)))
        .expect("zoomed");
}

#[test]
fn pans_coalesce_into_one_entry_between_zooms() {
    let mut widget = widget(NavigatorConfig::default().with_bounded(false));
    for _ in 0..3 {
        widget.force_pan(AxisId::x_bottom(), 0.9).expect("pan");
    }
    zoom_x(&mut widget, 10.0, 20.0);
    widget.force_pan(AxisId::x_bottom(), 0.9).expect("pan");

    let domain = widget
        .navigator()
        .domain(AxisId::x_bottom())
        .expect("domain");
    assert_eq!(domain.history().len(), 3);
    assert_eq!(domain.last_operation(), NavigationKind::Pan);
}

#[test]
fn undo_restores_previous_zoom() {
    let mut widget = widget(NavigatorConfig::default());
    zoom_x(&mut widget, 10.0, 90.0);
    zoom_x(&mut widget, 20.0, 30.0);
    assert!(widget.undo());
    assert_eq!(x(&widget), Interval::new(10.0, 90.0));
}

#[test]
fn undo_after_magnify_burst_returns_to_zoom() {
    let mut widget = widget(NavigatorConfig::default());
    zoom_x(&mut widget, 10.0, 90.0);
    for _ in 0..4 {
        widget
            .force_magnify(AxisId::x_bottom(), 0.9, PixelPoint::new(300.0, 0.0))
            .expect("magnified");
    }
    assert!(widget.undo());
    assert_eq!(x(&widget), Interval::new(10.0, 90.0));
}

#[test]
fn undo_with_single_entry_degrades_to_reset() {
    let mut widget = widget(NavigatorConfig::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    widget
        .navigator_mut()
        .subscribe(move |event| sink.borrow_mut().push(*event));

    zoom_x(&mut widget, 10.0, 20.0);
    assert!(widget.undo());
    assert_eq!(x(&widget), Interval::new(0.0, 100.0));
    assert_eq!(
        events.borrow().last(),
        Some(&NavigatorEvent::Reset {
            origin: EventOrigin::Local
        })
    );
}

#[test]
fn reset_is_idempotent() {
    let mut widget = widget(NavigatorConfig::default());
    zoom_x(&mut widget, 30.0, 40.0);
    widget.reset();
    let first = x(&widget);
    widget.reset();
    assert_eq!(first, Interval::new(0.0, 100.0));
    assert_eq!(x(&widget), first);
    assert!(!widget.is_zoomed());
}

#[test]
fn history_limit_drops_oldest_steps() {
    let config = NavigatorConfig {
        history_limit: 3,
        ..NavigatorConfig::default()
    };
    let mut widget = widget(config);
    for step in 0..5 {
        let start = f64::from(step) * 10.0;
        zoom_x(&mut widget, start, start + 50.0);
    }
    let domain = widget
        .navigator()
        .domain(AxisId::x_bottom())
        .expect("domain");
    assert_eq!(domain.history().len(), 3);

    assert!(widget.undo());
    assert!(widget.undo());
    assert_eq!(x(&widget), Interval::new(20.0, 70.0));
}

#[test]
fn right_click_undoes_with_history_and_resets_without() {
    let mut widget = widget(NavigatorConfig::default());
    zoom_x(&mut widget, 10.0, 90.0);
    zoom_x(&mut widget, 20.0, 30.0);
    assert!(widget.mouse_release(PixelPoint::new(5.0, 5.0), PointerButton::Right));
    assert_eq!(x(&widget), Interval::new(10.0, 90.0));

    let mut widget = self::widget(NavigatorConfig::default().with_history(false));
    zoom_x(&mut widget, 10.0, 90.0);
    zoom_x(&mut widget, 20.0, 30.0);
    assert!(widget.mouse_release(PixelPoint::new(5.0, 5.0), PointerButton::Right));
    assert_eq!(x(&widget), Interval::new(0.0, 100.0));
}

#[test]
fn new_data_recaptures_base_and_resets() {
    let mut widget = widget(NavigatorConfig::default());
    zoom_x(&mut widget, 10.0, 20.0);
    assert!(widget.update_axis_scale(AxisId::x_bottom(), 0.0, 50.0));

    assert_eq!(x(&widget), Interval::new(0.0, 50.0));
    let base = widget
        .navigator()
        .domain(AxisId::x_bottom())
        .and_then(|domain| domain.base_rect())
        .expect("base");
    assert_eq!(base.x, Some(Interval::new(0.0, 50.0)));
    assert!(!widget.update_axis_scale(AxisId::x_bottom(), 7.0, 7.0));
}

#[test]
fn new_data_without_auto_base_keeps_old_base() {
    let mut widget = widget(NavigatorConfig::default().with_auto_base(false, false));
    assert!(widget.update_axis_scale(AxisId::x_bottom(), 0.0, 50.0));
    widget.reset();
    assert_eq!(x(&widget), Interval::new(0.0, 100.0));
}
