// Epoch-scoped LZW dictionary.
//
// One generic table serves both directions:
//   - `SymbolToCode`: the encoder's view (byte sequence -> code)
//   - `CodeToSymbol`: the decoder's view (code -> byte sequence)
//
// Both sides assign codes through `register()`, so the epoch boundary is
// computed by the same code on either end of the stream.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use log::debug;

use super::{CODE_LIMIT, Code, FIRST_FREE_CODE, Symbol};
use crate::error::{CodecError, Result};

/// Number of single-byte bindings present in every epoch.
pub const SINGLETONS: usize = FIRST_FREE_CODE as usize;

/// Upper bound on non-singleton bindings within one epoch.
pub const MAX_LIVE_BINDINGS: usize = CODE_LIMIT as usize - SINGLETONS;

// ---------------------------------------------------------------------------
// Orientation
// ---------------------------------------------------------------------------

/// Which side of the code/symbol association is the lookup key.
pub trait Orientation {
    type Key: Eq + Hash;
    type Value;

    /// Arrange a `(code, symbol)` binding as a `(key, value)` pair.
    fn binding(code: Code, symbol: Symbol) -> (Self::Key, Self::Value);
}

/// Encoder orientation: look up a code by its symbol.
#[derive(Debug)]
pub enum SymbolToCode {}

impl Orientation for SymbolToCode {
    type Key = Symbol;
    type Value = Code;

    #[inline]
    fn binding(code: Code, symbol: Symbol) -> (Symbol, Code) {
        (symbol, code)
    }
}

/// Decoder orientation: look up a symbol by its code.
#[derive(Debug)]
pub enum CodeToSymbol {}

impl Orientation for CodeToSymbol {
    type Key = Code;
    type Value = Symbol;

    #[inline]
    fn binding(code: Code, symbol: Symbol) -> (Code, Symbol) {
        (code, symbol)
    }
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Associative store between symbols and codes for one epoch at a time.
///
/// Owns the next-code counter. When the counter reaches [`CODE_LIMIT`]
/// right after an assignment, every non-singleton binding is discarded and
/// assignment restarts at [`FIRST_FREE_CODE`].
#[derive(Debug)]
pub struct Dictionary<O: Orientation> {
    entries: HashMap<O::Key, O::Value>,
    next_code: Code,
    epoch: u64,
    _orientation: PhantomData<O>,
}

/// Encoder-side dictionary.
pub type SymbolTable = Dictionary<SymbolToCode>;

/// Decoder-side dictionary.
pub type CodeTable = Dictionary<CodeToSymbol>;

impl<O: Orientation> Dictionary<O> {
    /// Create a dictionary holding only the 256 singleton bindings.
    pub fn new() -> Self {
        let mut dict = Self {
            entries: HashMap::with_capacity(CODE_LIMIT as usize),
            next_code: FIRST_FREE_CODE,
            epoch: 0,
            _orientation: PhantomData,
        };
        dict.seed();
        dict
    }

    /// Drop all non-singleton bindings and restart code assignment at 256.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.seed();
        self.next_code = FIRST_FREE_CODE;
        self.epoch += 1;
    }

    fn seed(&mut self) {
        for byte in 0..=u8::MAX {
            let (key, value) = O::binding(Code::from(byte), vec![byte]);
            self.entries.insert(key, value);
        }
    }

    /// Look up a binding. `None` means the key is not bound in this epoch.
    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<&O::Value>
    where
        O::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Whether `key` is bound in this epoch.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        O::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Bind `key` to `value`. The key must not already be bound.
    pub fn insert(&mut self, key: O::Key, value: O::Value) {
        let previous = self.entries.insert(key, value);
        debug_assert!(previous.is_none(), "key bound twice within one epoch");
    }

    /// Bind `symbol` to the next assignable code and return that code.
    ///
    /// Performs the epoch reset when the counter reaches `CODE_LIMIT`.
    pub fn register(&mut self, symbol: Symbol) -> Result<Code> {
        let code = self.next_code;
        if code >= CODE_LIMIT {
            return Err(CodecError::DictionaryOverflow {
                code: u32::from(code),
            });
        }

        let (key, value) = O::binding(code, symbol);
        self.insert(key, value);
        self.next_code += 1;

        if self.next_code == CODE_LIMIT {
            debug!(
                "lzw: code space exhausted after epoch {}, resetting dictionary",
                self.epoch
            );
            self.reset();
        }
        Ok(code)
    }

    /// Total bound entries, singletons included.
    #[inline]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Bound entries beyond the 256 singletons.
    #[inline]
    pub fn live_bindings(&self) -> usize {
        self.entries.len() - SINGLETONS
    }

    /// Code the next `register()` call will assign.
    #[inline]
    pub fn next_code(&self) -> Code {
        self.next_code
    }

    /// Number of epoch resets performed so far.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl<O: Orientation> Default for Dictionary<O> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
