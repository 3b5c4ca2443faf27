// This file is part of Hoop Shot.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use super::report::ConfigReportPlugin;
use crate::ar::ArPlugin;
use crate::core::system::SystemOrderPlugin;
#[cfg(feature = "debug")]
use crate::debug::DebugPlugin;
use crate::gameplay::GameplayPlugin;
use crate::interaction::session::AutoClosePlugin;
use crate::interaction::InteractionPlugin;
use crate::physics::{ContactBridgePlugin, PhysicsSetupPlugin};
use crate::rendering::RenderingPlugin;

/// Everything the game adds on top of `DefaultPlugins`. Expects `GameConfig` (and optionally a
/// loaded `HoopTemplate`) to be inserted before it is added.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            SystemOrderPlugin,
            ConfigReportPlugin,
            PhysicsSetupPlugin,
            ContactBridgePlugin,
            ArPlugin,
            GameplayPlugin,
            InteractionPlugin,
            RenderingPlugin,
            AutoClosePlugin,
            #[cfg(feature = "debug")]
            DebugPlugin,
        ));
    }
}
