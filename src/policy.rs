//! Access policy: which detection, if any, may open the door.
//!
//! Scan order is the order the vision service reported; there is no
//! ranking by confidence.  One authorised detection per frame is enough,
//! so at most one door cycle can come out of a single tick.

use crate::app::ports::Detection;
use crate::config::AccessList;

/// First detection whose class is on the access list.
pub fn decide<'a>(detections: &'a [Detection], access_list: &AccessList) -> Option<&'a Detection> {
    detections
        .iter()
        .find(|d| access_list.contains(&d.class_name))
}
