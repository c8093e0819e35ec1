use ratatui::style::Color;

use crate::board::Surface;
use crate::error::GameError;

/// All targets share one radius, in board pixels.
pub const RADIUS: f64 = 25.0;

/// Circle outline color.
pub const OUTLINE: Color = Color::Rgb(0x00, 0x33, 0x00);

/// A clickable labeled circle. Hit testing is only valid once the target has
/// been drawn at least once; labels may be hidden but the circle stays
/// hit-testable either way.
#[derive(Debug, Clone)]
pub struct Target {
    pub x: i32,
    pub y: i32,
    pub label: String,
    pub color: Color,
    drawn: bool,
}

impl Target {
    pub fn new(x: i32, y: i32, label: String, color: Color) -> Self {
        Self {
            x,
            y,
            label,
            color,
            drawn: false,
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, hide_label: bool) {
        surface.fill_circle(self.x, self.y, RADIUS, self.color);
        surface.stroke_circle(self.x, self.y, RADIUS, OUTLINE);
        if !hide_label {
            surface.label(self.x, self.y, &self.label);
        }
        self.drawn = true;
    }

    /// Exact circular hit test against the drawn shape.
    pub fn contains_point(&self, x: i32, y: i32) -> Result<bool, GameError> {
        if !self.drawn {
            return Err(GameError::HitTestBeforeDraw {
                label: self.label.clone(),
            });
        }
        let dx = f64::from(x - self.x);
        let dy = f64::from(y - self.y);
        Ok(dx * dx + dy * dy <= RADIUS * RADIUS)
    }
}

/// Ordered set of active targets. Insertion order is spawn order is required
/// click order: only the front element is a correct tap, and the order is
/// never permuted.
#[derive(Debug, Default)]
pub struct TargetQueue {
    targets: Vec<Target>,
}

impl TargetQueue {
    pub fn add(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// Removes and reports true iff `label` is the queue front. A tap on any
    /// other member leaves the queue unchanged; it counts as a miss upstream.
    pub fn tap_target(&mut self, label: &str) -> bool {
        let is_front = self
            .targets
            .first()
            .is_some_and(|front| front.label == label);
        if is_front {
            self.targets.remove(0);
        }
        is_front
    }

    pub fn all_cleared(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Resolves a raw pointer position to the first matching target in queue
    /// order.
    pub fn find_hit(&self, x: i32, y: i32) -> Result<Option<&Target>, GameError> {
        for target in &self.targets {
            if target.contains_point(x, y)? {
                return Ok(Some(target));
            }
        }
        Ok(None)
    }

    /// Box test, not circle-circle distance: true iff any member's center
    /// lies within `margin` of `(cx, cy)` on both axes. Deliberately
    /// conservative for placement.
    pub fn any_collision(&self, cx: i32, cy: i32, margin: f64) -> bool {
        self.targets.iter().any(|target| {
            f64::from((cx - target.x).abs()) <= margin
                && f64::from((cy - target.y).abs()) <= margin
        })
    }

    /// Redraw every member in insertion order. Circles never overlap by
    /// construction, so stacking order has no visual effect.
    pub fn draw_all(&mut self, surface: &mut dyn Surface, hide_labels: bool) {
        for target in &mut self.targets {
            target.draw(surface, hide_labels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DisplayList;
    use assert_matches::assert_matches;

    fn target(x: i32, y: i32, label: &str) -> Target {
        Target::new(x, y, label.to_string(), Color::Red)
    }

    fn drawn_target(x: i32, y: i32, label: &str) -> Target {
        let mut t = target(x, y, label);
        t.draw(&mut DisplayList::default(), false);
        t
    }

    #[test]
    fn hit_test_before_draw_is_an_error() {
        let t = target(50, 50, "1");
        assert_matches!(
            t.contains_point(50, 50),
            Err(GameError::HitTestBeforeDraw { .. })
        );
    }

    #[test]
    fn hit_test_is_circular() {
        let t = drawn_target(100, 100, "1");
        assert!(t.contains_point(100, 100).unwrap());
        assert!(t.contains_point(100 + 25, 100).unwrap());
        // Corner of the bounding box lies outside the circle.
        assert!(!t.contains_point(100 + 20, 100 + 20).unwrap());
        assert!(!t.contains_point(100 + 26, 100).unwrap());
    }

    #[test]
    fn hit_test_ignores_label_visibility() {
        let mut t = target(100, 100, "1");
        t.draw(&mut DisplayList::default(), true);
        assert!(t.contains_point(100, 100).unwrap());
    }

    #[test]
    fn tapping_front_to_back_clears_the_queue() {
        let mut queue = TargetQueue::default();
        for (i, label) in ["1", "2", "3"].iter().enumerate() {
            queue.add(target(i as i32 * 100, 0, label));
        }

        for label in ["1", "2", "3"] {
            assert!(queue.tap_target(label));
        }
        assert!(queue.all_cleared());
    }

    #[test]
    fn tapping_a_non_front_target_changes_nothing() {
        let mut queue = TargetQueue::default();
        queue.add(target(0, 0, "1"));
        queue.add(target(100, 0, "2"));

        assert!(!queue.tap_target("2"));
        assert_eq!(queue.len(), 2);
        assert!(queue.tap_target("1"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn find_hit_scans_in_queue_order() {
        let mut queue = TargetQueue::default();
        queue.add(drawn_target(100, 100, "1"));
        queue.add(drawn_target(300, 100, "2"));

        let hit = queue.find_hit(300, 100).unwrap();
        assert_eq!(hit.map(|t| t.label.as_str()), Some("2"));
        assert!(queue.find_hit(500, 500).unwrap().is_none());
    }

    #[test]
    fn collision_is_a_box_test_on_centers() {
        let mut queue = TargetQueue::default();
        queue.add(target(100, 100, "1"));

        assert!(queue.any_collision(100, 100, 55.0));
        assert!(queue.any_collision(150, 100, 55.0));
        // Within the box diagonally even though circles would not touch.
        assert!(queue.any_collision(150, 150, 55.0));
        assert!(!queue.any_collision(160, 100, 55.0));
    }

    #[test]
    fn draw_all_marks_every_member_hit_testable() {
        let mut queue = TargetQueue::default();
        queue.add(target(100, 100, "1"));
        queue.add(target(300, 300, "2"));

        queue.draw_all(&mut DisplayList::default(), true);

        assert!(queue.find_hit(100, 100).unwrap().is_some());
        assert!(queue.find_hit(300, 300).unwrap().is_some());
    }
}
