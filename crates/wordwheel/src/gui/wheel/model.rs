use super::{
    DRAG_SENSITIVITY, FRICTION, MIN_RADIUS, RADIUS_RATIO, SELECT_PROMINENCE, SNAP_EPSILON,
    SNAP_GAIN, VELOCITY_FLOOR, VELOCITY_SENSITIVITY,
};
use std::f64::consts::{PI, TAU};

/// One ranked entry on the wheel. The list is replaced wholesale on every
/// query, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub label: String,
    pub score: f64,
}

impl Item {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Dragging,
    Coasting,
    Snapping,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    last_x: f64,
}

/// On-canvas placement of one item for the current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub prominence: f64,
    pub selected: bool,
}

/// What a tick did: whether the canvas needs a redraw and whether the
/// sequence wants further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    pub redraw: bool,
    pub running: bool,
}

/// The wheel's complete interaction state. `angle` is unbounded; every
/// consumer folds it, so winding accumulated by long drags never leaks.
#[derive(Debug, Default)]
pub struct WheelState {
    items: Vec<Item>,
    angle: f64,
    velocity: f64,
    selected: usize,
    mode: Mode,
    drag: Option<DragSession>,
}

impl WheelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed list. Resets rotation and cancels whatever
    /// interaction or animation was in flight.
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.angle = 0.0;
        self.velocity = 0.0;
        self.selected = 0;
        self.mode = Mode::Idle;
        self.drag = None;
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.selected)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Pointer down. Always wins over a running coast/snap sequence; the
    /// caller must also drop its scheduled tick.
    pub fn press(&mut self, x: f64) {
        self.mode = Mode::Dragging;
        self.velocity = 0.0;
        self.drag = Some(DragSession { last_x: x });
    }

    /// Pointer moved while dragging. Returns whether the canvas should be
    /// redrawn immediately (dragging never waits for the tick loop).
    pub fn drag_to(&mut self, x: f64) -> bool {
        let Some(drag) = &mut self.drag else {
            return false;
        };
        let dx = x - drag.last_x;
        drag.last_x = x;
        self.angle += dx / DRAG_SENSITIVITY;
        self.velocity = dx / VELOCITY_SENSITIVITY;
        true
    }

    /// Pointer up. Returns whether a tick sequence should be scheduled.
    pub fn release(&mut self) -> bool {
        self.drag = None;
        if self.mode != Mode::Dragging {
            return false;
        }
        if self.items.is_empty() {
            self.mode = Mode::Idle;
            return false;
        }
        self.mode = if self.velocity.abs() > VELOCITY_FLOOR {
            Mode::Coasting
        } else {
            Mode::Snapping
        };
        true
    }

    /// One animation step. A tick delivered after cancellation (mode already
    /// left Coasting/Snapping) must not touch any state.
    pub fn tick(&mut self) -> Step {
        if self.items.is_empty() {
            if matches!(self.mode, Mode::Coasting | Mode::Snapping) {
                self.mode = Mode::Idle;
            }
            return Step::default();
        }
        match self.mode {
            Mode::Coasting => {
                self.angle += self.velocity;
                self.velocity *= FRICTION;
                if self.velocity.abs() <= VELOCITY_FLOOR {
                    self.mode = Mode::Snapping;
                }
                Step {
                    redraw: true,
                    running: true,
                }
            }
            Mode::Snapping => {
                let target = self.snap_target();
                let diff = target - self.angle;
                if diff.abs() > SNAP_EPSILON {
                    self.angle += diff * SNAP_GAIN;
                    Step {
                        redraw: true,
                        running: true,
                    }
                } else {
                    // land exactly on the slot so no residual drift survives
                    self.angle = target;
                    self.mode = Mode::Idle;
                    Step {
                        redraw: true,
                        running: false,
                    }
                }
            }
            Mode::Idle | Mode::Dragging => Step::default(),
        }
    }

    /// Nearest multiple of the per-item angular spacing.
    fn snap_target(&self) -> f64 {
        let spacing = TAU / self.items.len() as f64;
        (self.angle / spacing).round() * spacing
    }

    /// Lay the items out for the current rotation and re-derive the selected
    /// index from the result. The index always tracks the item closest to the
    /// top slot; it is never written directly anywhere else.
    pub fn placements(&mut self, width: f64, height: f64) -> Vec<Placement> {
        let placements = layout(&self.items, self.angle, width, height);
        if let Some(best) = argmax_prominence(&placements) {
            self.selected = best;
        }
        placements
    }
}

/// Pure circular layout: identical inputs give identical output. Returns
/// nothing while the canvas has no usable extent, so a not-yet-sized widget
/// simply draws nothing and retries on the next resize.
pub fn layout(items: &[Item], angle: f64, width: f64, height: f64) -> Vec<Placement> {
    if items.is_empty() || width <= 1.0 || height <= 1.0 {
        return Vec::new();
    }
    let n = items.len() as f64;
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = MIN_RADIUS.max(width.min(height) * RADIUS_RATIO);

    let mut placements: Vec<Placement> = (0..items.len())
        .map(|i| {
            let theta = angle + TAU * i as f64 / n;
            let prominence = (1.0 - distance_from_top(theta) / PI).max(0.5);
            Placement {
                x: cx + radius * theta.sin(),
                y: cy - radius * theta.cos(),
                prominence,
                selected: false,
            }
        })
        .collect();

    // only the single closest item gets the highlight, and only when it is
    // actually near the top slot
    if let Some(best) = argmax_prominence(&placements)
        && placements[best].prominence > SELECT_PROMINENCE
    {
        placements[best].selected = true;
    }
    placements
}

/// First index with the maximal prominence (ties keep the earliest item).
fn argmax_prominence(placements: &[Placement]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, p) in placements.iter().enumerate() {
        match best {
            Some(b) if placements[b].prominence >= p.prominence => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Angular distance from `theta` to the top reference angle 0, folded into
/// [0, PI] regardless of winding.
fn distance_from_top(theta: f64) -> f64 {
    ((theta + PI).rem_euclid(TAU) - PI).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked_items() -> Vec<Item> {
        vec![
            Item::new("queen", 98.2),
            Item::new("princess", 95.1),
            Item::new("monarchy", 91.0),
        ]
    }

    fn wheel_with_items() -> WheelState {
        let mut state = WheelState::new();
        state.set_items(ranked_items());
        state
    }

    fn nearest_slot_index(angle: f64, n: usize) -> usize {
        let spacing = TAU / n as f64;
        let k = (angle / spacing).round() as i64;
        (-k).rem_euclid(n as i64) as usize
    }

    #[test]
    fn layout_returns_one_placement_per_item_with_bounded_prominence() {
        for &angle in &[-10.0, -1.5, 0.0, 0.7, 5.0, 123.456] {
            for n in 1..=8 {
                let items: Vec<Item> = (0..n).map(|i| Item::new(format!("w{i}"), 1.0)).collect();
                let placements = layout(&items, angle, 400.0, 300.0);
                assert_eq!(placements.len(), n);
                for p in &placements {
                    assert!((0.0..=1.0).contains(&p.prominence));
                    assert!(p.x.is_finite() && p.y.is_finite());
                }
            }
        }
    }

    #[test]
    fn layout_flags_exactly_one_item_when_prominent() {
        // with 12 items three placements clear the threshold, the flag must
        // still land on only the closest one
        let items: Vec<Item> = (0..12).map(|i| Item::new(format!("w{i}"), 1.0)).collect();
        let placements = layout(&items, 0.0, 400.0, 300.0);
        assert!(
            placements
                .iter()
                .filter(|p| p.prominence > SELECT_PROMINENCE)
                .count()
                > 1
        );
        let flagged: Vec<usize> = placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.selected.then_some(i))
            .collect();
        assert_eq!(flagged, vec![0]);
    }

    #[test]
    fn layout_flags_nothing_when_no_item_is_prominent() {
        let items: Vec<Item> = (0..2).map(|i| Item::new(format!("w{i}"), 1.0)).collect();
        // both items sit a quarter turn from the top
        let placements = layout(&items, PI / 2.0, 400.0, 300.0);
        assert!(placements.iter().all(|p| !p.selected));
        assert!(placements.iter().all(|p| (p.prominence - 0.5).abs() < 1e-9));
    }

    #[test]
    fn layout_is_idempotent() {
        let items = ranked_items();
        let first = layout(&items, 1.234, 417.0, 289.0);
        let second = layout(&items, 1.234, 417.0, 289.0);
        assert_eq!(first, second);
    }

    #[test]
    fn layout_defers_on_degenerate_canvas() {
        let items = ranked_items();
        assert!(layout(&items, 0.0, 0.0, 300.0).is_empty());
        assert!(layout(&items, 0.0, 400.0, 1.0).is_empty());
        assert!(layout(&items, 0.0, -5.0, -5.0).is_empty());
    }

    #[test]
    fn fresh_items_select_the_first_entry() {
        let mut state = wheel_with_items();
        let placements = state.placements(400.0, 300.0);
        assert_eq!(state.selected_item().map(|i| i.label.as_str()), Some("queen"));
        assert!(placements[0].prominence > SELECT_PROMINENCE);
        assert!(placements[0].selected);
    }

    #[test]
    fn empty_wheel_has_no_selection() {
        let mut state = WheelState::new();
        assert!(state.selected_item().is_none());
        assert!(state.placements(400.0, 300.0).is_empty());
    }

    #[test]
    fn dragging_converts_pixels_to_angle_and_velocity() {
        let mut state = wheel_with_items();
        state.press(0.0);
        assert!(state.drag_to(150.0));
        assert!((state.angle() - 1.5).abs() < 1e-12);
        assert!((state.velocity() - 15.0).abs() < 1e-12);

        // a second move is measured from the last recorded position
        assert!(state.drag_to(160.0));
        assert!((state.angle() - 1.6).abs() < 1e-12);
        assert!((state.velocity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn slow_release_goes_straight_to_snapping() {
        let mut state = wheel_with_items();
        state.press(0.0);
        state.drag_to(0.5);
        assert!(state.release());
        assert_eq!(state.mode(), Mode::Snapping);
    }

    #[test]
    fn momentum_decays_to_snapping_within_bounded_ticks() {
        let mut state = wheel_with_items();
        state.press(0.0);
        state.drag_to(150.0);
        assert!(state.release());
        assert_eq!(state.mode(), Mode::Coasting);

        let mut ticks = 0;
        while state.mode() == Mode::Coasting {
            let before = state.velocity().abs();
            let step = state.tick();
            assert!(step.redraw && step.running);
            assert!(state.velocity().abs() < before);
            ticks += 1;
            assert!(ticks <= 200, "coasting did not settle within 200 ticks");
        }
        assert_eq!(state.mode(), Mode::Snapping);
    }

    #[test]
    fn snapping_converges_to_the_nearest_slot() {
        for &start in &[-7.3, -0.4, 0.0, 0.51, 2.0, 40.0] {
            let mut state = wheel_with_items();
            state.angle = start;
            state.mode = Mode::Snapping;

            let mut ticks = 0;
            loop {
                let step = state.tick();
                ticks += 1;
                assert!(ticks <= 200, "snapping did not settle within 200 ticks");
                if !step.running {
                    break;
                }
            }
            assert_eq!(state.mode(), Mode::Idle);
            let spacing = TAU / 3.0;
            let slots = state.angle() / spacing;
            assert!((slots - slots.round()).abs() < 1e-9);

            state.placements(400.0, 300.0);
            assert_eq!(
                state.selected,
                nearest_slot_index(state.angle(), 3),
                "selection disagrees with terminal angle {start}"
            );
        }
    }

    #[test]
    fn drag_release_coast_snap_end_to_end() {
        let mut state = wheel_with_items();
        state.placements(400.0, 300.0);
        assert_eq!(state.selected_item().map(|i| i.label.as_str()), Some("queen"));

        state.press(10.0);
        state.drag_to(160.0);
        assert!((state.velocity() - 15.0).abs() < 1e-12);
        assert!(state.release());
        assert_eq!(state.mode(), Mode::Coasting);

        let mut ticks = 0;
        while state.tick().running {
            ticks += 1;
            assert!(ticks <= 400);
        }
        assert_eq!(state.mode(), Mode::Idle);

        let spacing = TAU / 3.0;
        let slots = state.angle() / spacing;
        assert!((slots - slots.round()).abs() < 1e-9);

        let placements = state.placements(400.0, 300.0);
        assert_eq!(state.selected, nearest_slot_index(state.angle(), 3));
        assert!(placements[state.selected].prominence > SELECT_PROMINENCE);
    }

    #[test]
    fn pointer_down_cancels_a_running_sequence() {
        let mut state = wheel_with_items();
        state.press(0.0);
        state.drag_to(150.0);
        state.release();
        state.tick();
        assert_eq!(state.mode(), Mode::Coasting);

        // re-interaction pre-empts the coast; a stale tick must be a no-op
        state.press(42.0);
        assert_eq!(state.mode(), Mode::Dragging);
        let angle = state.angle();
        let step = state.tick();
        assert_eq!(step, Step::default());
        assert_eq!(state.angle(), angle);
        assert_eq!(state.mode(), Mode::Dragging);
    }

    #[test]
    fn replacing_items_resets_rotation_and_cancels_ticks() {
        let mut state = wheel_with_items();
        state.press(0.0);
        state.drag_to(150.0);
        state.release();
        state.tick();

        state.set_items(vec![Item::new("alpha", 50.0), Item::new("beta", 40.0)]);
        assert_eq!(state.angle(), 0.0);
        assert_eq!(state.mode(), Mode::Idle);
        assert_eq!(state.selected_item().map(|i| i.label.as_str()), Some("alpha"));
        assert_eq!(state.tick(), Step::default());
    }

    #[test]
    fn release_without_drag_does_nothing() {
        let mut state = wheel_with_items();
        assert!(!state.release());
        assert_eq!(state.mode(), Mode::Idle);
        assert!(!state.drag_to(50.0));
    }
}
