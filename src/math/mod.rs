//! Vector and matrix math used by the geometry pipeline.

pub mod mat4;
pub mod vec3;
