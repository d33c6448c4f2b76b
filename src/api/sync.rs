use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use indexmap::IndexSet;
use tracing::{debug, trace, warn};

use crate::core::{AxisId, SubscriptionId};
use crate::error::{NavError, NavResult};

use super::{EventOrigin, NavigationKind, NavigatorEvent, PlotWidget};

pub type SharedPlot = Rc<RefCell<PlotWidget>>;

/// State shared by both forwarding directions of one link.
#[derive(Debug)]
struct SyncLink {
    /// Set while a change is being mirrored onto the partner.
    busy: Cell<bool>,
    wired: RefCell<IndexSet<AxisId>>,
    explicit: Option<IndexSet<AxisId>>,
}

impl SyncLink {
    fn admits(&self, axis: AxisId) -> bool {
        self.explicit
            .as_ref()
            .is_none_or(|explicit| explicit.contains(&axis))
    }
}

/// Mediator keeping two plots' navigation in lock-step.
///
/// It only holds weak references to the plots; each plot's navigator holds
/// a forwarding callback pointing at the other plot, never at itself.
/// Dropping the handle leaves the link active; call
/// [`unsync_plot_navigators`] to tear it down.
#[derive(Debug)]
pub struct Synchronizer {
    first: Weak<RefCell<PlotWidget>>,
    second: Weak<RefCell<PlotWidget>>,
    first_subscription: SubscriptionId,
    second_subscription: SubscriptionId,
    link: Rc<SyncLink>,
}

impl Synchronizer {
    /// Axes currently mirrored between the two plots.
    #[must_use]
    pub fn synced_axes(&self) -> Vec<AxisId> {
        self.link.wired.borrow().iter().copied().collect()
    }

    /// `true` while both plots are still alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.first.strong_count() > 0 && self.second.strong_count() > 0
    }
}

/// Links the navigators of two plots.
///
/// With `axes` given, only those axes are mirrored; otherwise every axis both
/// navigators have a domain for. Axes added later are wired as soon as both
/// plots know them.
pub fn sync_plot_navigators(
    first: &SharedPlot,
    second: &SharedPlot,
    axes: Option<&[AxisId]>,
) -> NavResult<Synchronizer> {
    if Rc::ptr_eq(first, second) {
        return Err(NavError::InvalidData(
            "cannot synchronize a plot with itself".to_owned(),
        ));
    }
    let mut first_plot = first
        .try_borrow_mut()
        .map_err(|_| NavError::InvalidData("first plot is busy".to_owned()))?;
    let mut second_plot = second
        .try_borrow_mut()
        .map_err(|_| NavError::InvalidData("second plot is busy".to_owned()))?;

    let link = Rc::new(SyncLink {
        busy: Cell::new(false),
        wired: RefCell::new(IndexSet::new()),
        explicit: axes.map(|axes| axes.iter().copied().collect()),
    });
    {
        let mut wired = link.wired.borrow_mut();
        for axis in first_plot.navigator().axes() {
            if second_plot.navigator().has_domain(axis) && link.admits(axis) {
                wired.insert(axis);
            }
        }
    }

    let first_subscription = {
        let link = Rc::clone(&link);
        let partner = Rc::downgrade(second);
        first_plot
            .navigator_mut()
            .subscribe(move |event| forward(&link, &partner, event))
    };
    let second_subscription = {
        let link = Rc::clone(&link);
        let partner = Rc::downgrade(first);
        second_plot
            .navigator_mut()
            .subscribe(move |event| forward(&link, &partner, event))
    };

    debug!(axes = link.wired.borrow().len(), "plot navigators synchronized");
    Ok(Synchronizer {
        first: Rc::downgrade(first),
        second: Rc::downgrade(second),
        first_subscription,
        second_subscription,
        link,
    })
}

/// Tears a link down. Returns `false` when a plot was busy and kept its
/// forwarding callback; plots that are already gone count as unlinked.
pub fn unsync_plot_navigators(sync: Synchronizer) -> bool {
    let mut clean = true;
    for (plot, subscription) in [
        (&sync.first, sync.first_subscription),
        (&sync.second, sync.second_subscription),
    ] {
        let Some(plot) = plot.upgrade() else {
            continue;
        };
        match plot.try_borrow_mut() {
            Ok(mut plot) => {
                plot.navigator_mut().unsubscribe(subscription);
            }
            Err(_) => {
                warn!("plot busy while unsynchronizing; link left in place");
                clean = false;
            }
        }
    }
    sync.link.wired.borrow_mut().clear();
    clean
}

fn forward(link: &SyncLink, partner: &Weak<RefCell<PlotWidget>>, event: &NavigatorEvent) {
    match *event {
        NavigatorEvent::AxisAdded { axis } => {
            if !link.admits(axis) {
                return;
            }
            let Some(partner) = partner.upgrade() else {
                return;
            };
            let known = partner
                .try_borrow()
                .is_ok_and(|plot| plot.navigator().has_domain(axis));
            if known {
                trace!(axis = %axis, "wiring newly added axis");
                link.wired.borrow_mut().insert(axis);
            }
        }
        NavigatorEvent::AxisRemoved { axis } => {
            link.wired.borrow_mut().shift_remove(&axis);
        }
        NavigatorEvent::RectChanged {
            axis,
            rect,
            kind,
            origin: EventOrigin::Local,
        } if kind != NavigationKind::None => {
            if !link.wired.borrow().contains(&axis) {
                return;
            }
            hop(link, partner, |plot| {
                plot.apply_synced(axis, rect, kind);
            });
        }
        NavigatorEvent::Undo {
            origin: EventOrigin::Local,
        } => {
            let scope = link.wired.borrow().clone();
            hop(link, partner, |plot| {
                plot.undo_synced(&scope);
            });
        }
        NavigatorEvent::Reset {
            origin: EventOrigin::Local,
        } => {
            let scope = link.wired.borrow().clone();
            hop(link, partner, |plot| plot.reset_synced(&scope));
        }
        _ => {}
    }
}

/// Applies one mirrored change to the partner, at most one hop deep.
fn hop(link: &SyncLink, partner: &Weak<RefCell<PlotWidget>>, apply: impl FnOnce(&mut PlotWidget)) {
    if link.busy.get() {
        trace!("sync hop suppressed while mirroring");
        return;
    }
    let Some(partner) = partner.upgrade() else {
        warn!("synchronized plot is gone; change not mirrored");
        return;
    };
    let Ok(mut plot) = partner.try_borrow_mut() else {
        warn!("synchronized plot is busy; change not mirrored");
        return;
    };
    link.busy.set(true);
    apply(&mut plot);
    link.busy.set(false);
}
