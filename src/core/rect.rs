/// Integer rectangle used for the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle at the origin
    pub fn sized(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Exclusive right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        saturate(edge(self.x, self.width))
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`
    pub fn bottom(&self) -> i32 {
        saturate(edge(self.y, self.height))
    }

    /// Overlap with another rectangle, `None` when they do not overlap
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = edge(self.x, self.width).min(edge(other.x, other.width));
        let bottom = edge(self.y, self.height).min(edge(other.y, other.height));
        if right <= i64::from(x) || bottom <= i64::from(y) {
            return None;
        }
        // Both spans are at most u32::MAX: an i32 start plus a u32 extent
        let width = (right - i64::from(x)) as u32;
        let height = (bottom - i64::from(y)) as u32;
        Some(Rectangle::new(x, y, width, height))
    }
}

// Edges are computed in i64 so no origin/extent pair can overflow
fn edge(origin: i32, extent: u32) -> i64 {
    i64::from(origin) + i64::from(extent)
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let rect = Rectangle::new(2, 3, 10, 5);
        assert_eq!(rect.right(), 12);
        assert_eq!(rect.bottom(), 8);
    }

    #[test]
    fn test_intersection_overlap() {
        let a = Rectangle::sized(10, 10);
        let b = Rectangle::new(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rectangle::new(5, 0, 5, 5)));
    }

    #[test]
    fn test_intersection_disjoint_or_touching() {
        let a = Rectangle::sized(4, 4);
        assert_eq!(a.intersection(&Rectangle::new(4, 0, 4, 4)), None);
        assert_eq!(a.intersection(&Rectangle::new(10, 10, 1, 1)), None);
        assert_eq!(a.intersection(&Rectangle::sized(0, 0)), None);
    }

    #[test]
    fn test_edges_saturate() {
        let rect = Rectangle::new(i32::MAX - 1, 0, 4, u32::MAX);
        assert_eq!(rect.right(), i32::MAX);
        assert_eq!(rect.bottom(), i32::MAX);
    }

    #[test]
    fn test_intersection_near_i32_max() {
        let buffer = Rectangle::sized(8, 8);
        assert_eq!(buffer.intersection(&Rectangle::new(i32::MAX - 1, 0, 4, 4)), None);
        let far = Rectangle::new(i32::MAX - 4, i32::MAX - 4, 10, 10);
        assert_eq!(far.intersection(&far), Some(Rectangle::new(i32::MAX - 4, i32::MAX - 4, 10, 10)));
    }

    #[test]
    fn test_intersection_with_huge_extent() {
        let buffer = Rectangle::sized(8, 8);
        let huge = Rectangle::new(0, 0, 1 << 31, u32::MAX);
        assert_eq!(buffer.intersection(&huge), Some(buffer));

        let widest = Rectangle::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX);
        assert_eq!(widest.intersection(&widest), Some(widest));
    }

    #[test]
    fn test_set_size_keeps_origin() {
        let mut rect = Rectangle::new(1, 1, 2, 2);
        rect.set_size(8, 6);
        assert_eq!(rect, Rectangle::new(1, 1, 8, 6));
    }
}
