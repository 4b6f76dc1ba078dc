// Character management

use glam::Vec2;
use log::info;

use crate::engine::input::PlayerInput;
use crate::engine::physics::PhysicsWorld;

use super::character::{Character, CharacterBuilder, CharacterId};

/// Owns every character in the scene and drives both update phases.
///
/// AI characters track the first player-controlled character spawned.
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    next_id: CharacterId,
    player: Option<CharacterId>,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, builder: CharacterBuilder, physics: &mut PhysicsWorld) -> CharacterId {
        let id = self.next_id;
        self.next_id += 1;

        let character = builder.build(id, physics);
        if character.is_player() && self.player.is_none() {
            self.player = Some(id);
        }
        self.characters.push(character);
        id
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id() == id)
    }

    pub fn player_id(&self) -> Option<CharacterId> {
        self.player
    }

    pub fn player(&self) -> Option<&Character> {
        self.player.and_then(|id| self.get(id))
    }

    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Position of the tracked player as of the last physics step
    fn player_position(&self) -> Option<Vec2> {
        self.player().map(Character::position)
    }

    /// Per-frame phase for every character
    pub fn update(&mut self, dt: f32, input: &mut PlayerInput) {
        let target = self.player_position();
        let player = self.player;

        for character in &mut self.characters {
            if Some(character.id()) == player {
                character.update(dt, Some(&mut *input), None);
            } else {
                character.update(dt, None, target);
            }
        }
    }

    /// Physics phase for every character. Call before stepping the world.
    pub fn fixed_update(&mut self, dt: f32, physics: &mut PhysicsWorld) {
        let player = self.player;
        let target = player.and_then(|id| {
            self.get(id)
                .and_then(|character| physics.body_position(character.body()))
        });

        for character in &mut self.characters {
            let target = if Some(character.id()) == player {
                None
            } else {
                target
            };
            character.fixed_update(dt, physics, target);
        }
    }

    /// Despawn a character and its body
    pub fn remove(&mut self, id: CharacterId, physics: &mut PhysicsWorld) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id() == id)?;
        let character = self.characters.remove(pos);
        physics.remove_rigid_body(character.body());
        if self.player == Some(id) {
            self.player = None;
        }
        info!("removed {} #{}", character.name(), id);
        Some(character)
    }

    pub fn count(&self) -> usize {
        self.characters.len()
    }

    pub fn alive_count(&self) -> usize {
        self.characters.iter().filter(|c| c.stats().is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::presets;
    use crate::game::characters::ai::Brain;
    use crate::game::characters::config::CharacterConfig;
    use crate::game::characters::controller::Controller;

    const DT: f32 = 1.0 / 60.0;

    fn scene() -> (CharacterManager, PhysicsWorld) {
        let mut world = PhysicsWorld::new();
        let ground = world.add_rigid_body(presets::ground_body(0.0, -0.5));
        world.add_collider(presets::ground_collider(100.0, 1.0), ground);
        world.step();
        (CharacterManager::new(), world)
    }

    #[test]
    fn test_spawn_assigns_ids_and_player() {
        let (mut manager, mut world) = scene();
        let enemy = manager.spawn(
            CharacterBuilder::new(CharacterConfig::enemy().into_shared()),
            &mut world,
        );
        let player = manager.spawn(
            CharacterBuilder::new(CharacterConfig::default().into_shared()),
            &mut world,
        );

        assert_eq!(enemy, 0);
        assert_eq!(player, 1);
        assert_eq!(manager.player_id(), Some(player));
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.alive_count(), 2);
    }

    #[test]
    fn test_enemy_chases_player() {
        let (mut manager, mut world) = scene();
        manager.spawn(
            CharacterBuilder::new(CharacterConfig::default().into_shared())
                .spawn_at(Vec2::new(0.0, 1.0)),
            &mut world,
        );
        let enemy = manager.spawn(
            CharacterBuilder::new(CharacterConfig::enemy().into_shared())
                .spawn_at(Vec2::new(6.0, 1.0)),
            &mut world,
        );
        let mut input = PlayerInput::new();

        for _ in 0..5 {
            manager.update(DT, &mut input);
            manager.fixed_update(DT, &mut world);
            world.step();
            input.end_frame(DT);
        }

        let enemy = manager.get(enemy).unwrap();
        assert_eq!(enemy.velocity().x, -6.5);
        match enemy.controller() {
            Controller::Ai(ai) => assert_eq!(ai.brain.brain(), Brain::Chase),
            Controller::Player(_) => panic!("expected AI controller"),
        }
    }

    #[test]
    fn test_remove_clears_player() {
        let (mut manager, mut world) = scene();
        let player = manager.spawn(
            CharacterBuilder::new(CharacterConfig::default().into_shared()),
            &mut world,
        );
        let removed = manager.remove(player, &mut world).unwrap();
        assert!(world.get_rigid_body(removed.body()).is_none());
        assert_eq!(manager.player_id(), None);
        assert!(manager.remove(player, &mut world).is_none());
    }
}
