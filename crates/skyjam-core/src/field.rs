//! Collision field: static arena geometry the integrator resolves against.
//!
//! The field caches two flat lists derived from an [`ArenaLayout`]: axis
//! aligned [`CollisionBox`]es (walls, obstacles, low platforms) and [`Pit`]
//! regions. The cache is built lazily on first query and must be invalidated
//! explicitly when the layout changes (level reload, editor edit).
//!
//! Boxes may carry a `max_y`: entities at or above that altitude pass over
//! them, which is how launched enemies clear low cover.

use std::cell::OnceCell;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned obstacle bounds in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    /// Minimum X extent.
    pub min_x: f32,
    /// Maximum X extent.
    pub max_x: f32,
    /// Minimum Z extent.
    pub min_z: f32,
    /// Maximum Z extent.
    pub max_z: f32,
    /// Entities whose altitude is at or above this pass over the box.
    /// `None` means the box is full-height (a wall).
    pub max_y: Option<f32>,
}

impl CollisionBox {
    /// Creates a full-height box from XZ extents.
    #[must_use]
    pub const fn wall(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            max_y: None,
        }
    }

    /// Creates a box entities can fly over once at or above `max_y`.
    #[must_use]
    pub const fn low(min_x: f32, max_x: f32, min_z: f32, max_z: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            max_y: Some(max_y),
        }
    }

    /// Returns `true` if an entity at altitude `y` clears this box entirely.
    #[must_use]
    pub fn cleared_at(&self, y: f32) -> bool {
        self.max_y.map_or(false, |top| y >= top)
    }
}

/// Rectangular pit region. A grounded entity inside dies instantly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    /// Minimum X extent.
    pub min_x: f32,
    /// Maximum X extent.
    pub max_x: f32,
    /// Minimum Z extent.
    pub min_z: f32,
    /// Maximum Z extent.
    pub max_z: f32,
}

impl Pit {
    /// Creates a pit from XZ extents.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Returns `true` if the XZ point lies inside the pit.
    #[must_use]
    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }
}

/// Playable-area bounds. The cache derives four perimeter walls from these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Minimum X of the playable area.
    pub min_x: f32,
    /// Maximum X of the playable area.
    pub max_x: f32,
    /// Minimum Z of the playable area.
    pub min_z: f32,
    /// Maximum Z of the playable area.
    pub max_z: f32,
    /// Thickness of the derived perimeter walls.
    pub wall_thickness: f32,
}

impl ArenaBounds {
    /// Creates bounds with a default 1-unit wall thickness.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
            wall_thickness: 1.0,
        }
    }
}

/// External arena configuration the field builds its cache from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaLayout {
    /// Playable-area bounds; `None` means an unbounded arena.
    pub bounds: Option<ArenaBounds>,
    /// Free-standing obstacle boxes.
    pub obstacles: Vec<CollisionBox>,
    /// Pit regions.
    pub pits: Vec<Pit>,
}

/// Result of resolving a circle against the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleContact {
    /// Total XZ push-out to separate the circle from everything it overlaps.
    pub push: Vec2,
    /// Normalized average contact normal (points away from the surfaces).
    pub normal: Vec2,
}

#[derive(Debug, Clone, Default)]
struct FieldCache {
    boxes: Vec<CollisionBox>,
    pits: Vec<Pit>,
}

/// Lazily cached collision geometry for one arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionField {
    layout: ArenaLayout,
    #[serde(skip)]
    cache: OnceCell<FieldCache>,
}

impl CollisionField {
    /// Creates a field over the given layout. The cache builds on first query.
    #[must_use]
    pub fn new(layout: ArenaLayout) -> Self {
        Self {
            layout,
            cache: OnceCell::new(),
        }
    }

    /// Replaces the layout and invalidates the cache.
    pub fn set_layout(&mut self, layout: ArenaLayout) {
        self.layout = layout;
        self.invalidate();
    }

    /// Drops the cached geometry; the next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.cache = OnceCell::new();
    }

    fn cache(&self) -> &FieldCache {
        self.cache.get_or_init(|| {
            let mut boxes = self.layout.obstacles.clone();
            if let Some(b) = self.layout.bounds {
                let t = b.wall_thickness.max(0.01);
                boxes.push(CollisionBox::wall(b.min_x - t, b.min_x, b.min_z - t, b.max_z + t));
                boxes.push(CollisionBox::wall(b.max_x, b.max_x + t, b.min_z - t, b.max_z + t));
                boxes.push(CollisionBox::wall(b.min_x - t, b.max_x + t, b.min_z - t, b.min_z));
                boxes.push(CollisionBox::wall(b.min_x - t, b.max_x + t, b.max_z, b.max_z + t));
            }
            FieldCache {
                boxes,
                pits: self.layout.pits.clone(),
            }
        })
    }

    /// Returns `true` if the XZ point lies inside any pit.
    #[must_use]
    pub fn point_in_pit(&self, x: f32, z: f32) -> bool {
        self.cache().pits.iter().any(|pit| pit.contains(x, z))
    }

    /// Resolves a circle at altitude `y` against every box it does not clear.
    ///
    /// Returns the accumulated push-out and the normalized average contact
    /// normal, or `None` if nothing overlaps.
    #[must_use]
    pub fn resolve_circle(&self, x: f32, z: f32, y: f32, radius: f32) -> Option<CircleContact> {
        let mut push = Vec2::ZERO;
        let mut normal_sum = Vec2::ZERO;
        let mut contacted = false;

        for bbox in &self.cache().boxes {
            if bbox.cleared_at(y) {
                continue;
            }
            if let Some(out) = circle_vs_box(x + push.x, z + push.y, radius, bbox) {
                push += out;
                normal_sum += out.normalize_or_zero();
                contacted = true;
            }
        }

        contacted.then(|| CircleContact {
            push,
            normal: normal_sum.normalize_or_zero(),
        })
    }

    /// Number of cached collision boxes (perimeter walls included).
    #[must_use]
    pub fn box_count(&self) -> usize {
        self.cache().boxes.len()
    }
}

/// Closest-point test of a circle against one box.
///
/// Returns the push-out vector separating the circle from the box, or `None`
/// if they do not overlap. When the circle center lies exactly on the box
/// boundary or inside the box, the closest-point delta degenerates to zero;
/// the push-out then follows the axis of minimum overlap.
#[must_use]
pub fn circle_vs_box(cx: f32, cz: f32, radius: f32, bbox: &CollisionBox) -> Option<Vec2> {
    let closest_x = cx.clamp(bbox.min_x, bbox.max_x);
    let closest_z = cz.clamp(bbox.min_z, bbox.max_z);
    let delta = Vec2::new(cx - closest_x, cz - closest_z);
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    if dist_sq > 1e-12 {
        let dist = dist_sq.sqrt();
        return Some(delta * ((radius - dist) / dist));
    }

    // Degenerate: center on the boundary or inside. Push out along the axis
    // of minimum overlap.
    let left = cx - bbox.min_x + radius;
    let right = bbox.max_x - cx + radius;
    let near = cz - bbox.min_z + radius;
    let far = bbox.max_z - cz + radius;

    let min = left.min(right).min(near).min(far);
    let out = if min == left {
        Vec2::new(-left, 0.0)
    } else if min == right {
        Vec2::new(right, 0.0)
    } else if min == near {
        Vec2::new(0.0, -near)
    } else {
        Vec2::new(0.0, far)
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CollisionBox {
        CollisionBox::wall(-1.0, 1.0, -1.0, 1.0)
    }

    mod circle_vs_box_tests {
        use super::*;

        #[test]
        fn no_overlap_returns_none() {
            assert!(circle_vs_box(5.0, 0.0, 0.5, &unit_box()).is_none());
        }

        #[test]
        fn side_overlap_pushes_along_axis() {
            // Circle center 0.3 outside the +X face, radius 0.5 -> 0.2 deep.
            let push = circle_vs_box(1.3, 0.0, 0.5, &unit_box()).unwrap();
            assert!((push.x - 0.2).abs() < 1e-5);
            assert!(push.y.abs() < 1e-6);
        }

        #[test]
        fn corner_overlap_pushes_diagonally() {
            let push = circle_vs_box(1.2, 1.2, 0.5, &unit_box()).unwrap();
            assert!(push.x > 0.0 && push.y > 0.0);
            // Push restores exactly radius distance from the corner.
            let corner = Vec2::new(1.0, 1.0);
            let resolved = Vec2::new(1.2 + push.x, 1.2 + push.y);
            assert!((resolved.distance(corner) - 0.5).abs() < 1e-5);
        }

        #[test]
        fn center_on_edge_uses_minimum_overlap_axis() {
            // Center exactly on the +X face: closest-point delta is zero.
            let push = circle_vs_box(1.0, 0.0, 0.5, &unit_box()).unwrap();
            assert!((push.x - 0.5).abs() < 1e-5, "push={push:?}");
            assert_eq!(push.y, 0.0);
        }

        #[test]
        fn center_inside_box_pushes_out_nearest_face() {
            let push = circle_vs_box(0.8, 0.1, 0.25, &unit_box()).unwrap();
            // Nearest face is +X: overlap 0.2 + radius.
            assert!((push.x - 0.45).abs() < 1e-5, "push={push:?}");
            assert_eq!(push.y, 0.0);
        }
    }

    mod field_tests {
        use super::*;

        fn layout_with_bounds() -> ArenaLayout {
            ArenaLayout {
                bounds: Some(ArenaBounds::new(-10.0, 10.0, -10.0, 10.0)),
                obstacles: vec![CollisionBox::low(2.0, 4.0, 2.0, 4.0, 1.5)],
                pits: vec![Pit::new(-8.0, -6.0, -8.0, -6.0)],
            }
        }

        #[test]
        fn bounds_produce_perimeter_walls() {
            let field = CollisionField::new(layout_with_bounds());
            // 1 obstacle + 4 perimeter walls.
            assert_eq!(field.box_count(), 5);
        }

        #[test]
        fn resolve_against_perimeter() {
            let field = CollisionField::new(layout_with_bounds());
            let contact = field.resolve_circle(10.2, 0.0, 0.0, 0.5).unwrap();
            assert!(contact.push.x < 0.0, "pushed back inside: {contact:?}");
            assert!((contact.normal.x + 1.0).abs() < 1e-5);
        }

        #[test]
        fn low_obstacle_cleared_at_altitude() {
            let field = CollisionField::new(layout_with_bounds());
            // At ground level the low box blocks.
            assert!(field.resolve_circle(3.0, 3.0, 0.0, 0.5).is_some());
            // Above its max_y it is cleared.
            assert!(field.resolve_circle(3.0, 3.0, 2.0, 0.5).is_none());
        }

        #[test]
        fn point_in_pit() {
            let field = CollisionField::new(layout_with_bounds());
            assert!(field.point_in_pit(-7.0, -7.0));
            assert!(!field.point_in_pit(0.0, 0.0));
        }

        #[test]
        fn set_layout_invalidates_cache() {
            let mut field = CollisionField::new(layout_with_bounds());
            assert_eq!(field.box_count(), 5);
            field.set_layout(ArenaLayout::default());
            assert_eq!(field.box_count(), 0);
            assert!(!field.point_in_pit(-7.0, -7.0));
        }

        #[test]
        fn empty_layout_never_contacts() {
            let field = CollisionField::new(ArenaLayout::default());
            assert!(field.resolve_circle(0.0, 0.0, 0.0, 10.0).is_none());
        }
    }
}
