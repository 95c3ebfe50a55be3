//! Virtual pen tracking: turns camera frames into pointer samples for the maze.
//!
//! A frame is mirrored, scaled and blurred, thresholded against an HSV colour range,
//! cleaned with erosion and dilation, and the centroid of the largest remaining blob
//! becomes the pen position.

pub use capture::*;
pub use error::*;
pub use hsv::*;
pub use slot::*;
pub use trail::*;
pub use tracker::*;

pub mod blob;
mod capture;
mod error;
mod hsv;
pub mod mask;
mod slot;
mod tracker;
mod trail;
