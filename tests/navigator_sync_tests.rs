use std::cell::RefCell;
use std::rc::Rc;

use plotnav::api::{
    ChannelId, ChannelKind, CursorConfig, EventOrigin, NavigatorConfig, NavigatorEvent,
    PlotChannel, PlotWidget, SharedPlot, sync_plot_navigators, unsync_plot_navigators,
};
use plotnav::core::{AxisId, AxisPosition, CanvasSize, DataRect, Interval, PixelPoint};
use plotnav::render::NullRepainter;

fn plot() -> SharedPlot {
    let mut widget = PlotWidget::new(
        CanvasSize::new(1000, 500),
        Interval::new(0.0, 100.0),
        Interval::new(-1.0, 1.0),
        Box::new(NullRepainter::default()),
        NavigatorConfig::default(),
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
    widget.into_shared()
}

fn record(plot: &SharedPlot) -> Rc<RefCell<Vec<NavigatorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    plot.borrow_mut()
        .navigator_mut()
        .subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

fn rect_changes(events: &[NavigatorEvent], wanted: EventOrigin) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(event, NavigatorEvent::RectChanged { origin, .. } if *origin == wanted)
        })
        .count()
}

fn x(plot: &SharedPlot) -> Interval {
    plot.borrow().interval(AxisId::x_bottom()).expect("x")
}

#[test]
fn zoom_on_one_plot_is_mirrored_exactly_once() {
    let a = plot();
    let b = plot();
    let sync = sync_plot_navigators(&a, &b, Some(&[AxisId::x_bottom()])).expect("sync");
    assert_eq!(sync.synced_axes(), vec![AxisId::x_bottom()]);
    let a_events = record(&a);
    let b_events = record(&b);

    a.borrow_mut()
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(20.0, 40.0)))
        .expect("zoomed");

    assert_eq!(x(&b), x(&a));
    assert_eq!(x(&b), Interval::new(20.0, 40.0));
    assert_eq!(rect_changes(&a_events.borrow(), EventOrigin::Local), 1);
    assert_eq!(rect_changes(&a_events.borrow(), EventOrigin::Synced), 0);
    assert_eq!(rect_changes(&b_events.borrow(), EventOrigin::Synced), 1);
    assert_eq!(rect_changes(&b_events.borrow(), EventOrigin::Local), 0);
}

#[test]
fn unlisted_axes_are_not_mirrored() {
    let a = plot();
    let b = plot();
    let _sync = sync_plot_navigators(&a, &b, Some(&[AxisId::x_bottom()])).expect("sync");

    a.borrow_mut()
        .force_magnify(AxisId::y_left(), 0.5, PixelPoint::new(0.0, 250.0))
        .expect("magnified");
    assert_eq!(
        b.borrow().interval(AxisId::y_left()),
        Some(Interval::new(-1.0, 1.0))
    );
}

#[test]
fn undo_and_reset_propagate_both_ways() {
    let a = plot();
    let b = plot();
    let _sync = sync_plot_navigators(&a, &b, None).expect("sync");

    a.borrow_mut()
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(10.0, 90.0)));
    b.borrow_mut()
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(30.0, 60.0)));
    assert_eq!(x(&a), Interval::new(30.0, 60.0));

    assert!(a.borrow_mut().undo());
    assert_eq!(x(&a), Interval::new(10.0, 90.0));
    assert_eq!(x(&b), Interval::new(10.0, 90.0));

    b.borrow_mut().reset();
    assert_eq!(x(&a), Interval::new(0.0, 100.0));
    assert_eq!(x(&b), Interval::new(0.0, 100.0));
}

#[test]
fn axes_added_later_are_wired_once_both_plots_know_them() {
    let a = plot();
    let b = plot();
    let sync = sync_plot_navigators(&a, &b, None).expect("sync");
    let extra = AxisId::new(AxisPosition::Right, 0);

    for plot in [&b, &a] {
        let mut plot = plot.borrow_mut();
        plot.add_axis(extra, Interval::new(0.0, 1.0)).expect("axis");
        plot.add_channel(PlotChannel::new(
            ChannelId(2),
            "ch2",
            ChannelKind::Time,
            AxisId::x_bottom(),
            extra,
        ))
        .expect("channel");
    }
    assert!(sync.synced_axes().contains(&extra));

    a.borrow_mut()
        .force_zoom(extra, DataRect::from_y(Interval::new(0.25, 0.5)))
        .expect("zoomed");
    assert_eq!(
        b.borrow().interval(extra),
        Some(Interval::new(0.25, 0.5))
    );
}

#[test]
fn unsync_stops_mirroring() {
    let a = plot();
    let b = plot();
    let sync = sync_plot_navigators(&a, &b, None).expect("sync");
    assert!(sync.is_active());
    assert!(unsync_plot_navigators(sync));

    a.borrow_mut()
        .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(20.0, 40.0)));
    assert_eq!(x(&b), Interval::new(0.0, 100.0));
}

#[test]
fn dropped_partner_is_tolerated() {
    let a = plot();
    let sync = {
        let b = plot();
        sync_plot_navigators(&a, &b, None).expect("sync")
    };
    assert!(!sync.is_active());
    assert!(
        a.borrow_mut()
            .force_zoom(AxisId::x_bottom(), DataRect::from_x(Interval::new(20.0, 40.0)))
            .is_some()
    );
}

#[test]
fn plot_cannot_sync_with_itself() {
    let a = plot();
    assert!(sync_plot_navigators(&a, &a, None).is_err());
}
