//! Hand-drawn signature capture

mod pad;

pub use pad::{Point, PointerEvent, Segment, SignaturePad, TouchPhase};
