//! Assembler errors.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("cannot open input ASM file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown register name ${name} in \"{line}\"")]
    UnknownRegister { name: String, line: String },

    #[error("invalid immediate \"{value}\" in \"{line}\"")]
    InvalidImmediate {
        value: String,
        line: String,
        #[source]
        source: ParseIntError,
    },
}
