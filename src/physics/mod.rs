pub mod categories;
pub mod contacts;
pub mod rapier;

pub use categories::{BodyCategory, BodyMasks, CategoryMask};
pub use contacts::{BodyContact, ContactBody, ContactBridgePlugin, ContactPhase};
pub use rapier::PhysicsSetupPlugin;
