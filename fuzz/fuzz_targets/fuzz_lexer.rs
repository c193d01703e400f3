//! Fuzz target: tokenizer and dispatcher
//!
//! Feeds arbitrary bytes (as a console line or datagram payload would
//! arrive) through both lexer modes and the decoder, verifying:
//! - No panics under arbitrary input
//! - Every sequence ends in exactly one EOL and fits the token budget
//! - A faulted sequence is never decoded into a command
//!
//! cargo fuzz run fuzz_lexer

#![no_main]

use envnode::interpreter::lexer::MAX_TOKENS;
use envnode::interpreter::{Lexer, Token, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    for lexer in [Lexer::new(), Lexer::lenient()] {
        let seq = lexer.tokenize(data);
        let values = seq.as_slice();
        assert!(values.len() <= MAX_TOKENS + 1);
        assert_eq!(values.last().copied(), Some(Token::Eol.code()));

        let result = decode(&seq);
        if seq.fault().is_some() {
            assert!(result.is_err());
        }
    }
});
