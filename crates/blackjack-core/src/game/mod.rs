pub mod autoplay;
pub mod betting;
pub mod decision;
pub mod round;
pub mod session;
