#![allow(dead_code)]

pub mod players;
pub mod websocket;
pub mod websocket_client;
