//! Circular dependency detection infrastructure.

use std::cell::RefCell;
use std::marker::PhantomData;

use crate::error::{DiError, DiResult};

// Thread-local stack of entries currently being activated on this thread
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    identity: usize,
    name: &'static str,
}

/// Marks one entry as "under activation" on the current thread.
///
/// Entering an entry that is already on the stack is a cycle; the error
/// carries the path from the first occurrence back to it.
pub(crate) struct ResolutionGuard {
    _not_send: PhantomData<*const ()>,
}

impl ResolutionGuard {
    pub(crate) fn enter(
        identity: usize,
        name: &'static str,
        max_depth: usize,
    ) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            // Circular detection BEFORE pushing the new frame
            if let Some(start) = stack.iter().position(|f| f.identity == identity) {
                let mut path: Vec<&'static str> = stack[start..].iter().map(|f| f.name).collect();
                path.push(name);
                return Err(DiError::Circular(path));
            }

            if stack.len() >= max_depth {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push(Frame { identity, name });
            Ok(Self {
                _not_send: PhantomData,
            })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
