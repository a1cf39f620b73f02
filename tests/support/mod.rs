#![allow(dead_code)]

pub mod frame;
pub mod model;
