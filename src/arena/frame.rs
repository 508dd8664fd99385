//! Arena domain: conversion between arena coordinates and world space.
//!
//! Encounter data (patrol points, platform layouts, package drops, knockback) is authored in arena
//! coordinates: origin at the top-left corner, y growing downward. The world is centred on the
//! camera with y growing upward.

use bevy::prelude::*;

pub const ARENA_SIZE: Vec2 = Vec2::new(800.0, 600.0);
/// Arena y of the floor surface.
pub const FLOOR_Y: f32 = 580.0;

pub fn to_world(point: Vec2) -> Vec2 {
    Vec2::new(point.x - ARENA_SIZE.x / 2.0, ARENA_SIZE.y / 2.0 - point.y)
}

pub fn to_arena(point: Vec2) -> Vec2 {
    Vec2::new(point.x + ARENA_SIZE.x / 2.0, ARENA_SIZE.y / 2.0 - point.y)
}

/// Directions and velocities only need their vertical axis flipped.
pub fn flip_y(vector: Vec2) -> Vec2 {
    Vec2::new(vector.x, -vector.y)
}
