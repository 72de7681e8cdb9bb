//! Signature pad
//!
//! Strokes are rasterized onto an RGB surface as they are drawn. When a
//! stroke ends the surface is encoded as a PNG data URL, which becomes the
//! signature field value.

use base64::Engine;
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
/// Pixels painted on each side of the stroke centre line
const PEN_RADIUS: i64 = 1;

/// Position on the drawing surface, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A straight piece of a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Pointer gesture phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    /// Pointer left the drawing surface
    Leave,
}

/// Touch gesture phases; only the first touch point is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// Drawing surface plus gesture state
#[derive(Debug, Clone)]
pub struct SignaturePad {
    surface: RgbImage,
    segments: Vec<Segment>,
    drawing: bool,
    anchor: Option<Point>,
}

impl SignaturePad {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND),
            segments: Vec::new(),
            drawing: false,
            anchor: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    #[allow(dead_code)]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// No ink on the surface yet
    pub fn is_blank(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every segment drawn so far, in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Feed one pointer event.
    ///
    /// Returns the freshly encoded signature when the event ends a stroke on
    /// a surface that has ink on it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<String> {
        match event {
            PointerEvent::Down(point) => {
                self.drawing = true;
                self.anchor = Some(point);
                None
            }
            PointerEvent::Move(point) => {
                if !self.drawing {
                    return None;
                }
                if let Some(from) = self.anchor {
                    self.draw_segment(Segment { from, to: point });
                }
                self.anchor = Some(point);
                None
            }
            PointerEvent::Up | PointerEvent::Leave => {
                if !self.drawing {
                    return None;
                }
                self.drawing = false;
                self.anchor = None;
                if self.is_blank() {
                    return None;
                }
                self.encode()
            }
        }
    }

    /// Map a touch event onto the pointer gesture.
    ///
    /// Returns `(handled, encoded)`; when `handled` is true the host should
    /// suppress its default scrolling for this touch.
    pub fn handle_touch(&mut self, phase: TouchPhase, touches: &[Point]) -> (bool, Option<String>) {
        let first = touches.first().copied();
        let event = match (phase, first) {
            (TouchPhase::Start, Some(point)) => PointerEvent::Down(point),
            (TouchPhase::Move, Some(point)) => PointerEvent::Move(point),
            (TouchPhase::End, _) => PointerEvent::Up,
            (TouchPhase::Cancel, _) => PointerEvent::Leave,
            (TouchPhase::Start | TouchPhase::Move, None) => return (false, None),
        };
        (true, self.handle_pointer(event))
    }

    /// Repaint the background and forget every stroke
    pub fn clear(&mut self) {
        for pixel in self.surface.pixels_mut() {
            *pixel = BACKGROUND;
        }
        self.segments.clear();
        self.drawing = false;
        self.anchor = None;
    }

    /// Map a terminal cell inside a `cols` x `rows` area onto the surface,
    /// using the centre of the cell.
    pub fn map_cell(&self, col: u16, row: u16, cols: u16, rows: u16) -> Point {
        let cols = f64::from(cols.max(1));
        let rows = f64::from(rows.max(1));
        Point::new(
            (f64::from(col) + 0.5) * f64::from(self.width()) / cols,
            (f64::from(row) + 0.5) * f64::from(self.height()) / rows,
        )
    }

    /// Whether the pixel under `point` carries ink
    #[allow(dead_code)]
    pub fn is_inked(&self, point: Point) -> bool {
        let (x, y) = (point.x.round() as i64, point.y.round() as i64);
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return false;
        }
        *self.surface.get_pixel(x as u32, y as u32) == INK
    }

    fn draw_segment(&mut self, segment: Segment) {
        let Some(segment) = self.clip(segment) else {
            return;
        };
        self.segments.push(segment);

        // Bresenham between the rounded end points
        let (mut x0, mut y0) = (segment.from.x.round() as i64, segment.from.y.round() as i64);
        let (x1, y1) = (segment.to.x.round() as i64, segment.to.y.round() as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Clip a segment to the surface grown by the pen radius
    /// (Liang-Barsky). `None` when nothing of it can leave ink.
    fn clip(&self, segment: Segment) -> Option<Segment> {
        let Segment { from, to } = segment;
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return None;
        }
        let margin = PEN_RADIUS as f64;
        let (min_x, min_y) = (-margin, -margin);
        let max_x = f64::from(self.width()) + margin;
        let max_y = f64::from(self.height()) + margin;

        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [
            (-dx, from.x - min_x),
            (dx, max_x - from.x),
            (-dy, from.y - min_y),
            (dy, max_y - from.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| Point::new(from.x + t * dx, from.y + t * dy);
        Some(Segment {
            from: if t0 > 0.0 { at(t0) } else { from },
            to: if t1 < 1.0 { at(t1) } else { to },
        })
    }

    fn stamp(&mut self, cx: i64, cy: i64) {
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        for y in (cy - PEN_RADIUS)..=(cy + PEN_RADIUS) {
            for x in (cx - PEN_RADIUS)..=(cx + PEN_RADIUS) {
                if x >= 0 && y >= 0 && x < w && y < h {
                    self.surface.put_pixel(x as u32, y as u32, INK);
                }
            }
        }
    }

    /// Encode the surface as `data:image/png;base64,...`
    fn encode(&self) -> Option<String> {
        let mut buf = Vec::new();
        let encoder = PngEncoder::new(&mut buf);
        if let Err(e) = encoder.write_image(
            &self.surface,
            self.surface.width(),
            self.surface.height(),
            ColorType::Rgb8,
        ) {
            tracing::error!("Failed to encode signature: {e}");
            return None;
        }
        let b64 = base64::engine::general_purpose::STANDARD.encode(buf);
        Some(format!("data:image/png;base64,{b64}"))
    }
}
