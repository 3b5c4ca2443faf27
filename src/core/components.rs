use bevy::prelude::*;

/// Marker component identifying a launched basketball (holds physics body & collider).
#[derive(Component, Debug)]
pub struct Ball;

/// Root of the placed hoop assembly; board, rim and sensors are its children.
#[derive(Component, Debug)]
pub struct Hoop;

/// Root of anything the restart sweep removes (children go with it).
/// Plane visuals are owned by the AR session instead.
#[derive(Component, Debug)]
pub struct SceneNode;

/// The camera whose pose stands in for the device pose.
#[derive(Component, Debug)]
pub struct ArCamera;
