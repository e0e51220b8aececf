// grid/ - Cell grid shared by the simulator and the renderers
//
// Geometry is a pure function of the surface size. The buffer is rebuilt by
// the simulator every frame and only read by renderers.

mod buffer;
mod geometry;

pub use buffer::*;
pub use geometry::*;
