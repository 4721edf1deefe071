pub mod game;
pub mod sensor;
