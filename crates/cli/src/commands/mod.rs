pub mod dump;
pub mod inspect;
pub mod prove;
pub mod verify;
