use std::collections::BTreeMap;

use super::Actor;
use crate::types::ActorId;

/// Actor storage keyed by id. Iteration order is id order, so every tick
/// visits actors deterministically.
#[derive(Debug, Default)]
pub struct Actors {
    actors: BTreeMap<ActorId, Actor>,
}

impl Actors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `actor`, returning the actor previously stored under its id.
    pub fn insert(&mut self, actor: Actor) -> Option<Actor> {
        self.actors.insert(actor.id(), actor)
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.values_mut()
    }
}
