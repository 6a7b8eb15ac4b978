//! Infrastructure layer: concrete implementations of the domain trait seams
//! and the wire-format DTOs.

pub mod dto;
pub mod pusher;
pub mod repository;
