//! Value builder: the container-frame stack and hook plumbing.
//!
//! The builder accumulates the result tree while the format decoder walks
//! the stream. Array and map headers push frames; each completed child
//! attaches to the top frame, and a frame that becomes full is popped,
//! passed through its hook, and attached to the frame below (cascading).
use alloc::vec::Vec;

use crate::{
    error::DecodeError,
    options::{ArrayHook, MapHook, PairsHook},
    value::{Map, Value},
};

/// Upper bound on speculative element pre-allocation from a wire-declared
/// count; the collection still grows on demand past this.
const PREALLOC_LIMIT: usize = 1024;

/// Container-completion callbacks, populated from the decoder options.
pub(crate) struct Hooks {
    on_array_built: Option<ArrayHook>,
    on_map_built: Option<MapHook>,
    on_pairs_built: Option<PairsHook>,
}

impl Hooks {
    pub(crate) fn new(
        object_hook: Option<MapHook>,
        object_pairs_hook: Option<PairsHook>,
        list_hook: Option<ArrayHook>,
    ) -> Result<Self, DecodeError> {
        if object_hook.is_some() && object_pairs_hook.is_some() {
            return Err(DecodeError::Config(
                "object_hook and object_pairs_hook are mutually exclusive",
            ));
        }
        Ok(Self {
            on_array_built: list_hook,
            on_map_built: object_hook,
            on_pairs_built: object_pairs_hook,
        })
    }

    fn finish_array(&mut self, items: Vec<Value>) -> Result<Value, DecodeError> {
        match &mut self.on_array_built {
            Some(hook) => hook(items).map_err(DecodeError::Hook),
            None => Ok(Value::Array(items)),
        }
    }

    fn finish_map(&mut self, pairs: Vec<(Value, Value)>) -> Result<Value, DecodeError> {
        if let Some(hook) = &mut self.on_pairs_built {
            return hook(pairs).map_err(DecodeError::Hook);
        }
        let map = Map::from_pairs(pairs);
        match &mut self.on_map_built {
            Some(hook) => hook(map).map_err(DecodeError::Hook),
            None => Ok(Value::Map(map)),
        }
    }
}

/// One open container.
#[derive(Debug)]
enum Frame {
    Array {
        expect: usize,
        items: Vec<Value>,
    },
    Map {
        expect: usize,
        pairs: Vec<(Value, Value)>,
        /// Key decoded but still waiting for its value.
        pending_key: Option<Value>,
    },
}

#[derive(Debug, Default)]
pub(crate) struct ValueBuilder {
    frames: Vec<Frame>,
}

impl ValueBuilder {
    pub(crate) fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Returns `true` when no value is under construction.
    #[cfg(any(test, feature = "fuzzing"))]
    pub(crate) fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens an array of `expect` elements. An empty array completes at the
    /// header, firing its hook immediately.
    pub(crate) fn open_array(
        &mut self,
        expect: usize,
        hooks: &mut Hooks,
    ) -> Result<Option<Value>, DecodeError> {
        if expect == 0 {
            let value = hooks.finish_array(Vec::new())?;
            return self.attach(value, hooks);
        }
        let mut items = Vec::new();
        items
            .try_reserve(expect.min(PREALLOC_LIMIT))
            .map_err(|_| DecodeError::AllocationFailed)?;
        self.frames.push(Frame::Array { expect, items });
        Ok(None)
    }

    /// Opens a map of `expect` pairs. An empty map completes at the header.
    pub(crate) fn open_map(
        &mut self,
        expect: usize,
        hooks: &mut Hooks,
    ) -> Result<Option<Value>, DecodeError> {
        if expect == 0 {
            let value = hooks.finish_map(Vec::new())?;
            return self.attach(value, hooks);
        }
        let mut pairs = Vec::new();
        pairs
            .try_reserve(expect.min(PREALLOC_LIMIT))
            .map_err(|_| DecodeError::AllocationFailed)?;
        self.frames.push(Frame::Map {
            expect,
            pairs,
            pending_key: None,
        });
        Ok(None)
    }

    /// Attaches one completed child, cascading through frames that fill up.
    /// Returns the root value once the stack empties.
    pub(crate) fn attach(
        &mut self,
        value: Value,
        hooks: &mut Hooks,
    ) -> Result<Option<Value>, DecodeError> {
        let mut value = value;
        loop {
            let Some(top) = self.frames.last_mut() else {
                return Ok(Some(value));
            };
            match top {
                Frame::Array { expect, items } => {
                    items.push(value);
                    if items.len() < *expect {
                        return Ok(None);
                    }
                }
                Frame::Map {
                    expect,
                    pairs,
                    pending_key,
                } => match pending_key.take() {
                    None => {
                        *pending_key = Some(value);
                        return Ok(None);
                    }
                    Some(key) => {
                        pairs.push((key, value));
                        if pairs.len() < *expect {
                            return Ok(None);
                        }
                    }
                },
            }
            // Top frame is full: pop it, run its hook, and treat the result
            // as the next child of the frame below.
            let Some(frame) = self.frames.pop() else {
                unreachable!("frame stack emptied while a frame was borrowed");
            };
            value = match frame {
                Frame::Array { items, .. } => hooks.finish_array(items)?,
                Frame::Map { pairs, .. } => hooks.finish_map(pairs)?,
            };
        }
    }
}
