#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Grows the rect by `margin` above and below. Negative margins shrink it,
    /// never past zero height.
    pub fn expand_y(&self, margin: f32) -> Rect {
        let y = self.y - margin;
        let h = (self.h + margin * 2.0).max(0.0);
        Rect { x: self.x, y, w: self.w, h }
    }

    /// Length of the overlap between the two rects on the vertical axis.
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0)
    }
}
