use serde::{Deserialize, Serialize};

/// Raw gaze sample delivered by the tracker: pixels and milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f32,
    pub y: f32,
    pub timestamp: f64,
}

impl Sample {
    pub fn new(x: f32, y: f32, timestamp: f64) -> Self {
        Self { x, y, timestamp }
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    #[inline]
    pub fn center(&self) -> [f32; 2] {
        [self.left + 0.5 * self.width, self.top + 0.5 * self.height]
    }

    /// Horizontal distance from `x` to the rectangle; zero inside.
    #[inline]
    pub fn horizontal_distance(&self, x: f32) -> f32 {
        if x < self.left {
            self.left - x
        } else if x > self.right() {
            x - self.right()
        } else {
            0.0
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Word box as supplied by the text layout collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub text: String,
}

impl WordBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_distance_is_zero_inside() {
        let r = Rect::new(10.0, 0.0, 20.0, 5.0);
        assert_eq!(r.horizontal_distance(15.0), 0.0);
        assert_eq!(r.horizontal_distance(4.0), 6.0);
        assert_eq!(r.horizontal_distance(35.0), 5.0);
    }

    #[test]
    fn union_covers_both_rectangles() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 20.0, 30.0, 5.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 35.0, 25.0));
    }
}
