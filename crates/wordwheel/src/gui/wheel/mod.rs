use std::time::Duration;

pub mod model;
pub mod view;

pub use model::{Item, Mode, Placement, Step, WheelState, layout};
pub use view::draw;

pub const RADIUS_RATIO: f64 = 0.3; // wheel radius as a fraction of the smaller canvas side
pub const MIN_RADIUS: f64 = 50.0;
pub const DRAG_SENSITIVITY: f64 = 100.0; // horizontal pixels per radian while dragging
pub const VELOCITY_SENSITIVITY: f64 = 10.0; // pixels per radian/tick of release velocity
pub const VELOCITY_FLOOR: f64 = 0.1; // below this, coasting hands over to snapping
pub const FRICTION: f64 = 0.95;
pub const SNAP_EPSILON: f64 = 0.01;
pub const SNAP_GAIN: f64 = 0.2;
pub const SELECT_PROMINENCE: f64 = 0.8; // highlight threshold for the top item
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

pub const MIN_FONT_SIZE: f64 = 10.0;
pub const FONT_SCALE_DIVISOR: f64 = 20.0; // base font = smaller canvas side / this
pub const MIN_SCORE_FONT_SIZE: f64 = 8.0;
pub const SCORE_FONT_DROP: f64 = 4.0;
