//! Buffer, number and collection helpers shared by the interactions and the
//! challenge construction.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

use crate::crypto::{hash, Address, Hash, PublicKey, ADDRESS_SIZE};
use crate::{Error, Result};

/// Byte-wise XOR of two buffers of equal length.
pub fn buffer_xor(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    if a.len() != b.len() {
        return Err(Error::Input(format!(
            "buffers must have the same length, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect())
}

/// Encode `number` big-endian into exactly `width` bytes.
pub fn number_to_buffer(number: u64, width: usize) -> Result<Vec<u8>> {
    let bytes = number.to_be_bytes();
    let significant = bytes.len() - (number.leading_zeros() as usize / 8);
    if significant > width {
        return Err(Error::Input(format!(
            "{} does not fit into {} bytes",
            number, width
        )));
    }

    let mut buffer = vec![0u8; width];
    buffer[width - significant..].copy_from_slice(&bytes[bytes.len() - significant..]);
    Ok(buffer)
}

/// Decode a big-endian buffer of any width, as long as the value fits a u64.
pub fn buffer_to_number(buffer: &[u8]) -> Result<u64> {
    if buffer.is_empty() {
        return Err(Error::Input(String::from(
            "expected a non-empty buffer",
        )));
    }
    let first_significant = buffer
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(buffer.len());
    let significant = &buffer[first_significant..];
    if significant.len() > 8 {
        return Err(Error::Input(format!(
            "a {} byte value does not fit into a u64",
            significant.len()
        )));
    }

    Ok(significant
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
}

/// Pick `subset_size` distinct items that satisfy `filter`, uniformly at
/// random.
///
/// Indices are drawn at random and rejected when they were already taken or
/// fail the filter. Asking for every item returns a random permutation.
pub fn random_subset<T, F>(items: &[T], subset_size: usize, filter: F) -> Result<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    if subset_size > items.len() {
        return Err(Error::Input(format!(
            "subset size {} must not be greater than set size {}",
            subset_size,
            items.len()
        )));
    }
    if subset_size == 0 {
        return Ok(vec![]);
    }

    let eligible = items.iter().filter(|item| filter(item)).count();
    if eligible < subset_size {
        return Err(Error::Input(format!(
            "only {} items satisfy the filter, cannot pick {}",
            eligible, subset_size
        )));
    }

    if subset_size == items.len() {
        return Ok(random_permutation(items));
    }

    let mut rng = rand::thread_rng();
    let mut taken = HashSet::with_capacity(subset_size);
    let mut subset = Vec::with_capacity(subset_size);
    while subset.len() < subset_size {
        let index = rng.gen_range(0..items.len());
        if !taken.contains(&index) && filter(&items[index]) {
            taken.insert(index);
            subset.push(items[index].clone());
        }
    }

    Ok(subset)
}

pub fn random_permutation<T: Clone>(items: &[T]) -> Vec<T> {
    let mut permutation = items.to_vec();
    permutation.shuffle(&mut rand::thread_rng());
    permutation
}

/// The 20 byte party address of a public key: the tail of the SHA-256 digest
/// of the uncompressed key. Not keccak, so it does not match an Ethereum
/// account address.
pub fn pub_key_to_address(public_key: &PublicKey) -> Address {
    let digest = hash(&public_key.serialize_uncompressed()[1..]);
    let mut address = [0u8; ADDRESS_SIZE];
    address.copy_from_slice(&digest[digest.len() - ADDRESS_SIZE..]);
    address
}

/// Party A is the party with the lower address.
pub fn is_party_a(sender: &Address, other_party: &Address) -> bool {
    sender < other_party
}

/// The id both parties of a channel compute, independent of who asks.
pub fn channel_id(sender: &Address, other_party: &Address) -> Hash {
    let (party_a, party_b) = if is_party_a(sender, other_party) {
        (sender, other_party)
    } else {
        (other_party, sender)
    };

    let id = hash(&[&party_a[..], &party_b[..]].concat());
    debug!(
        "channel id {} for {} and {}",
        hex::encode(id),
        hex::encode(party_a),
        hex::encode(party_b)
    );
    id
}
