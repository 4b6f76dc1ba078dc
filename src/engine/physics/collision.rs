use rapier2d::prelude::*;

/// Collision layers used for filtering contacts and ground probes
///
/// Layer bits are what configuration files store in `ground.ground_mask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    /// Props and anything untagged - interacts with everything
    Default = 0b0000_0001,

    /// Walkable surfaces: floors, platforms, slopes
    Ground = 0b0000_0010,

    /// Players and enemies
    Character = 0b0000_0100,

    /// Trigger zones - detect but never block
    Sensor = 0b0000_1000,
}

impl CollisionLayer {
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self.bits());

        let filter = match self {
            // Characters stand on ground and bump props, but walk through each other
            CollisionLayer::Character => Group::from_bits_truncate(
                CollisionLayer::Default.bits()
                    | CollisionLayer::Ground.bits()
                    | CollisionLayer::Sensor.bits(),
            ),

            CollisionLayer::Ground => Group::from_bits_truncate(
                CollisionLayer::Default.bits() | CollisionLayer::Character.bits(),
            ),

            CollisionLayer::Sensor => Group::from_bits_truncate(CollisionLayer::Character.bits()),

            CollisionLayer::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }

    /// Groups for a query that only accepts colliders on the layers in `mask`
    pub fn query_mask(mask: u32) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYERS: [CollisionLayer; 4] = [
        CollisionLayer::Default,
        CollisionLayer::Ground,
        CollisionLayer::Character,
        CollisionLayer::Sensor,
    ];

    #[test]
    fn test_layer_bits_are_unique() {
        for (i, a) in LAYERS.iter().enumerate() {
            for b in LAYERS.iter().skip(i + 1) {
                assert_eq!(a.bits() & b.bits(), 0, "{a:?} and {b:?} share a bit");
            }
        }
    }

    #[test]
    fn test_characters_pass_through_each_other() {
        let groups = CollisionLayer::Character.to_interaction_groups();
        assert!(!groups.test(groups));
    }

    #[test]
    fn test_characters_collide_with_ground() {
        let character = CollisionLayer::Character.to_interaction_groups();
        let ground = CollisionLayer::Ground.to_interaction_groups();
        assert!(character.test(ground));
    }

    #[test]
    fn test_query_mask_selects_layers() {
        let query = CollisionLayer::query_mask(CollisionLayer::Ground.bits());
        assert!(query.test(CollisionLayer::Ground.to_interaction_groups()));
        assert!(!query.test(CollisionLayer::Character.to_interaction_groups()));
    }
}
