/*! Matching core for a high-throughput, multi-pattern regex engine.

This crate holds the pieces of a pattern-matching engine where a one-byte
error becomes a segfault or a false match in production traffic: saturating
bound arithmetic, the analyses that summarize repetition structure and
trigger scheduling at compile time, and the boundary-safe loads the scanner
uses to read near buffer edges at run time.

The surrounding engine is an external collaborator: the syntax parser hands
regions of the pattern graph to [`compiler::pure_repeat`] and the trigger
utilities in [`compiler::trigger`] during compilation, bakes their outputs
into the generated automaton, and at scan time routes every read that may
touch the first or last bytes of a buffer through a cautious
[`scanner::Window`] load.

# Example

```rust
use multire::scanner::Window;

// A scan that would read a full 8-byte word over the end of the buffer.
let buf = b"abc";
let w = Window::whole(buf);
let v: u64 = w.load_cautious_fwd(0);

// The bytes past the buffer read as zero instead of faulting.
assert_eq!(v.to_ne_bytes()[..3], *b"abc");
assert_eq!(v.to_ne_bytes()[3..], [0, 0, 0, 0, 0]);
```
*/

#![deny(missing_docs)]

pub use bound::Bound;
pub use bound::BoundRange;

pub mod bound;
pub mod compiler;
pub mod scanner;
