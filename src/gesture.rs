//! Turns pointer, touch and wheel events into [`ViewState`] updates.
//!
//! One active pointer pans. Two active pointers pinch (zoom by the distance
//! ratio), drag (by the midpoint movement) and twist (by the change of the
//! angle between them). All composition is incremental: after every frame the
//! baselines are replaced by the current values.

use crate::viewport::{normalize_angle, Point, ViewState, ZoomLimits};
use std::collections::BTreeMap;

/// Distances below this are treated as overlapping fingers.
pub const MIN_PINCH_DISTANCE: f32 = 1e-3;

pub type PointerId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { id: PointerId, pos: Point },
    PointerMove { id: PointerId, pos: Point },
    /// Release or cancellation.
    PointerUp { id: PointerId },
    /// Negative values zoom in.
    Wheel { delta_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Panning {
        pointer: PointerId,
        last: Point,
    },
    PinchTwisting {
        distance: f32,
        midpoint: Point,
        angle: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    pub zoom_in: f32,
    pub zoom_out: f32,
    pub limits: ZoomLimits,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            zoom_in: 1.1,
            zoom_out: 1.0 / 1.1,
            limits: ZoomLimits::UNBOUNDED,
        }
    }
}

impl GestureConfig {
    pub fn from_settings(settings: &crate::settings::Settings) -> Self {
        Self {
            zoom_in: settings.zoom.in_factor(),
            zoom_out: settings.zoom.out_factor(),
            limits: settings.zoom.limits(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    config: GestureConfig,
    pointers: BTreeMap<PointerId, Point>,
    state: GestureState,
}

impl GestureRouter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            pointers: BTreeMap::new(),
            state: GestureState::Idle,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Applies one event and returns the resulting view.
    pub fn handle(&mut self, view: ViewState, event: &InputEvent) -> ViewState {
        let mut view = view;
        match *event {
            InputEvent::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    view.zoom_by(self.config.zoom_in, &self.config.limits);
                } else if delta_y > 0.0 {
                    view.zoom_by(self.config.zoom_out, &self.config.limits);
                }
            }
            InputEvent::PointerDown { id, pos } => {
                self.pointers.insert(id, pos);
                self.rebase();
            }
            InputEvent::PointerUp { id } => {
                if self.pointers.remove(&id).is_some() {
                    self.rebase();
                }
            }
            InputEvent::PointerMove { id, pos } => {
                let Some(slot) = self.pointers.get_mut(&id) else {
                    return view;
                };
                *slot = pos;
                self.track(&mut view, id, pos);
            }
        }
        view
    }

    /// Drops every pointer, e.g. when the window loses focus.
    pub fn cancel(&mut self) {
        self.pointers.clear();
        self.state = GestureState::Idle;
    }

    /// Re-derives the gesture from the active pointer set. Called on every
    /// pointer-count transition, so no baseline outlives its gesture.
    fn rebase(&mut self) {
        self.state = match self.pair() {
            Some((p0, p1)) => GestureState::PinchTwisting {
                distance: p0.distance(p1),
                midpoint: p0.midpoint(p1),
                angle: p0.angle_to(p1),
            },
            None => match self.pointers.iter().next() {
                Some((&pointer, &last)) => GestureState::Panning { pointer, last },
                None => GestureState::Idle,
            },
        };
        log::trace!("gesture rebased to {:?}", self.state);
    }

    fn track(&mut self, view: &mut ViewState, id: PointerId, pos: Point) {
        match self.state {
            GestureState::Idle => {}
            GestureState::Panning { pointer, last } => {
                if pointer == id {
                    view.pan_by(pos.x - last.x, pos.y - last.y);
                    self.state = GestureState::Panning { pointer, last: pos };
                }
            }
            GestureState::PinchTwisting { distance, midpoint, angle } => {
                let Some((p0, p1)) = self.pair() else {
                    return;
                };
                let new_distance = p0.distance(p1);
                let new_midpoint = p0.midpoint(p1);
                let new_angle = p0.angle_to(p1);

                if distance > MIN_PINCH_DISTANCE && new_distance > MIN_PINCH_DISTANCE {
                    view.zoom_by(new_distance / distance, &self.config.limits);
                }
                view.pan_by(new_midpoint.x - midpoint.x, new_midpoint.y - midpoint.y);
                if new_distance > MIN_PINCH_DISTANCE && distance > MIN_PINCH_DISTANCE {
                    view.rotate_by(normalize_angle(new_angle - angle));
                }

                self.state = GestureState::PinchTwisting {
                    distance: new_distance,
                    midpoint: new_midpoint,
                    angle: new_angle,
                };
            }
        }
    }

    /// The two lowest-id pointers, if at least two are down.
    fn pair(&self) -> Option<(Point, Point)> {
        let mut iter = self.pointers.values();
        match (iter.next(), iter.next()) {
            (Some(&p0), Some(&p1)) => Some((p0, p1)),
            _ => None,
        }
    }
}
