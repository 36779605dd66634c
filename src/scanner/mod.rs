/*! Scan-time primitives.

The runtime dispatcher reads pattern-sized chunks out of the input buffer,
routinely starting within the last few bytes of the buffer or of a
streaming window. Everything here is pure, allocation-free, and safe to
call concurrently as long as the backing buffer is not mutated under a
running load.
*/

mod window;

pub use window::LoadValue;
pub use window::Window;
