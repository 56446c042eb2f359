pub mod common;
pub mod health;
pub mod mainland;
pub mod route;
pub mod systems;

pub use health::health;
pub use mainland::get_mainland;
pub use route::get_route;
pub use systems::get_systems;
