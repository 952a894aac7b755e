//! Stack growth for the recursive parts of the toolchain.
//!
//! The parser descends once per nested expression and block, and the
//! evaluator descends once per nested statement, expression and method
//! invocation. Scripts that recurse through methods (or generated code with
//! very deep `IF` nesting) can exhaust the native stack long before the
//! script itself is wrong, so every recursive entry point goes through
//! [`ensure_sufficient_stack`].
//!
//! On wasm targets the call is a plain passthrough.

/// Grow when less than this much stack is left.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first switching to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shape of the evaluator's recursion: each level owns a small frame
    /// and returns a `Result`.
    fn nested_blocks(depth: u32) -> Result<u32, String> {
        ensure_sufficient_stack(|| {
            let frame = [0u8; 256];
            if depth == 0 {
                return Ok(u32::from(frame[0]));
            }
            nested_blocks(depth - 1).map(|inner| inner + 1)
        })
    }

    #[test]
    fn shallow_nesting_returns_value() {
        assert_eq!(nested_blocks(16), Ok(16));
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        assert_eq!(nested_blocks(200_000), Ok(200_000));
    }

    #[test]
    fn error_propagates_through_growth() {
        fn fails_at(depth: u32, at: u32) -> Result<(), String> {
            ensure_sufficient_stack(|| {
                if depth == at {
                    return Err(format!("failed at {depth}"));
                }
                fails_at(depth + 1, at)
            })
        }

        assert_eq!(fails_at(0, 50_000), Err("failed at 50000".to_string()));
    }
}
