pub mod assets;
pub mod behaviour;
pub mod boss;
pub mod brain;
pub mod character;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod match_phase;
pub mod motion;
pub mod player;
pub mod projectile;
pub mod random;
pub mod world;
