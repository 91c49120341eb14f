//! Portable block compression functions.
//!
//! These back the software engine and the simulated peripheral. SHA-1 and
//! SHA-2 use the block functions exported by the `sha1` and `sha2` crates;
//! `md-5` keeps its block function private, so MD5 is implemented here.

mod md5;

use std::slice;

use sha2::digest::generic_array::GenericArray;

use crate::algorithm::{Algorithm, BLOCK_SIZE};
use crate::error::{EngineError, EngineResult};

/// Advances `state` by every block in `blocks`, in order.
///
/// # Errors
///
/// Returns [`EngineError::Misaligned`] when `blocks` is not a whole number
/// of blocks and [`EngineError::StateWidth`] when `state` does not match
/// the algorithm.
pub fn compress_blocks(algorithm: Algorithm, state: &mut [u32], blocks: &[u8]) -> EngineResult<()> {
    let (chunks, rest) = blocks.as_chunks::<BLOCK_SIZE>();
    if !rest.is_empty() {
        return Err(EngineError::Misaligned {
            len: blocks.len(),
            block_size: BLOCK_SIZE,
        });
    }
    let width = EngineError::StateWidth {
        expected: algorithm.state_words(),
        actual: state.len(),
    };

    match algorithm {
        Algorithm::Md5 => {
            let state = <&mut [u32; 4]>::try_from(state).map_err(|_| width)?;
            chunks.iter().for_each(|block| md5::compress(state, block));
        }
        Algorithm::Sha1 => {
            let state = <&mut [u32; 5]>::try_from(state).map_err(|_| width)?;
            for block in chunks {
                sha1::compress(state, slice::from_ref(GenericArray::from_slice(block)));
            }
        }
        Algorithm::Sha224 | Algorithm::Sha256 => {
            let state = <&mut [u32; 8]>::try_from(state).map_err(|_| width)?;
            for block in chunks {
                sha2::compress256(state, slice::from_ref(GenericArray::from_slice(block)));
            }
        }
    }
    Ok(())
}
