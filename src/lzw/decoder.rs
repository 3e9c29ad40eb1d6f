// LZW decoder: 12-bit codes -> bytes.
//
// Mirrors the encoder one code behind: the entry the encoder learned while
// emitting code N is learned here while reading code N+1. The only code that
// may arrive unbound is the one about to be assigned (the `cScSc` case).

use log::trace;

use super::dictionary::CodeTable;
use super::{Code, FIRST_FREE_CODE, MAX_CODE, Symbol};
use crate::error::{Malformed, Result};

/// Incremental LZW decoder.
#[derive(Debug, Default)]
pub struct Decoder {
    dict: CodeTable,
    /// Symbol produced by the previous code. `None` before the first code.
    prior: Option<Symbol>,
    codes_in: u64,
    bytes_out: u64,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one code, appending its symbol to `out`.
    pub fn push(&mut self, code: Code, out: &mut Vec<u8>) -> Result<()> {
        if code > MAX_CODE {
            return Err(Malformed::CodeOutOfRange {
                code: u32::from(code),
            }
            .into());
        }

        let Some(prior) = self.prior.take() else {
            if code >= FIRST_FREE_CODE {
                return Err(Malformed::UnboundFirstCode { code }.into());
            }
            let symbol = vec![code as u8];
            self.emit(&symbol, out);
            self.prior = Some(symbol);
            return Ok(());
        };

        let codeword = match self.dict.lookup(&code) {
            Some(symbol) => symbol.clone(),
            None if code == self.dict.next_code() => {
                let mut symbol = prior.clone();
                symbol.push(prior[0]);
                symbol
            }
            None => {
                let next = self.dict.next_code();
                self.prior = Some(prior);
                return Err(Malformed::UnexpectedCode { code, next }.into());
            }
        };

        let mut learned = prior;
        learned.push(codeword[0]);
        self.dict.register(learned)?;

        self.emit(&codeword, out);
        self.prior = Some(codeword);
        Ok(())
    }

    /// Decode a slice of codes.
    pub fn decode_into(&mut self, codes: &[Code], out: &mut Vec<u8>) -> Result<()> {
        for &code in codes {
            self.push(code, out)?;
        }
        Ok(())
    }

    fn emit(&mut self, symbol: &[u8], out: &mut Vec<u8>) {
        out.extend_from_slice(symbol);
        self.codes_in += 1;
        self.bytes_out += symbol.len() as u64;
    }

    /// Codes consumed so far.
    pub fn codes_in(&self) -> u64 {
        self.codes_in
    }

    /// Bytes produced so far.
    pub fn bytes_out(&self) -> u64 {
        self.bytes_out
    }

    /// Code the dictionary will assign next.
    pub fn next_code(&self) -> Code {
        self.dict.next_code()
    }

    /// Epoch resets performed so far.
    pub fn epoch(&self) -> u64 {
        self.dict.epoch()
    }

    /// Non-singleton bindings in the current epoch.
    pub fn live_bindings(&self) -> usize {
        self.dict.live_bindings()
    }
}

/// Decode a sequence of 12-bit codes back into bytes.
///
/// The sequence must contain at least one code.
pub fn decode(codes: &[Code]) -> Result<Vec<u8>> {
    if codes.is_empty() {
        return Err(Malformed::EmptyStream.into());
    }
    let mut out = Vec::with_capacity(codes.len() * 2);
    let mut dec = Decoder::new();
    dec.decode_into(codes, &mut out)?;
    trace!(
        "lzw: decoded {} codes into {} bytes across {} epoch resets",
        dec.codes_in(),
        dec.bytes_out(),
        dec.epoch()
    );
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
