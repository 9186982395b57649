#![forbid(unsafe_code)]

//! Hit testing against transformed entity regions.

use crate::entity::{Entity, EntityId};

/// What a point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitTarget {
    #[default]
    Background,
    Entity(EntityId),
}

impl HitTarget {
    #[inline]
    #[must_use]
    pub const fn entity(self) -> Option<EntityId> {
        match self {
            Self::Background => None,
            Self::Entity(id) => Some(id),
        }
    }
}

/// First entity in `candidates` (topmost first) whose region contains the
/// point. Region edges count as inside.
pub fn hit_test<'a, I>(x: i32, y: i32, candidates: I) -> HitTarget
where
    I: IntoIterator<Item = &'a Entity>,
{
    candidates
        .into_iter()
        .find(|e| e.point_in_roi(x, y))
        .map_or(HitTarget::Background, |e| HitTarget::Entity(e.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AffineState;
    use crate::geometry::Rect;

    #[test]
    fn topmost_overlapping_entity_wins() {
        let back = Entity::new(EntityId(0), Rect::new(0, 0, 100, 100));
        let front = Entity::new(EntityId(1), Rect::new(50, 50, 100, 100));
        let order = [&front, &back];
        assert_eq!(hit_test(75, 75, order), HitTarget::Entity(EntityId(1)));
        assert_eq!(hit_test(10, 10, order), HitTarget::Entity(EntityId(0)));
        assert_eq!(hit_test(500, 500, order), HitTarget::Background);
    }

    #[test]
    fn edges_are_inside() {
        let e = Entity::new(EntityId(3), Rect::new(0, 0, 10, 10));
        assert_eq!(hit_test(10, 10, [&e]), HitTarget::Entity(EntityId(3)));
        assert_eq!(hit_test(11, 10, [&e]), HitTarget::Background);
    }

    #[test]
    fn follows_rotation() {
        let state = AffineState {
            angle: 45.0,
            ..AffineState::default()
        };
        let e = Entity::with_state(EntityId(0), Rect::new(0, 0, 100, 100), state, 0.5).unwrap();
        // Original corner is outside the diamond; a point past the old edge is inside.
        assert_eq!(hit_test(2, 2, [&e]), HitTarget::Background);
        assert_eq!(hit_test(50, -15, [&e]), HitTarget::Entity(EntityId(0)));
    }

    #[test]
    fn empty_candidates_hit_background() {
        assert_eq!(hit_test(0, 0, std::iter::empty()), HitTarget::Background);
    }
}
