//! Time-scheduled signal coordinator.

use super::types::{Measurement, Signal};

/// Maps simulated time to the (P, Q) ancillary-service signal.
///
/// Each breakpoint overwrites the levels set by the previous one, so a time
/// exactly on a breakpoint stays in the lower bracket.
///
/// The measurement is accepted but not read.
///
/// # Examples
///
/// ```
/// use ancillary_sim::sim::coordinator::coordinate;
/// use ancillary_sim::sim::types::{Measurement, Signal};
///
/// assert_eq!(coordinate(6.0, Measurement(1.0)), Signal::new(2.0, 2.0));
/// assert_eq!(coordinate(6.5, Measurement(1.0)), Signal::new(3.0, 3.0));
/// ```
pub fn coordinate(time: f64, _measurement: Measurement) -> Signal {
    let (mut p, mut q) = (1.0, 1.0);
    if 1.0 < time {
        p = 2.0;
        q = 2.0;
    }
    if 6.0 < time {
        p = 3.0;
        q = 3.0;
    }
    if 11.0 < time {
        p = 4.0;
        q = 4.0;
    }
    if 16.0 < time {
        p = 5.0;
        q = 5.0;
    }
    Signal::new(p, q)
}
