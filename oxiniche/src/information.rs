//! Bit-string genomes and the information-theoretic
//! measures used by selection: Hamming weight,
//! binary Shannon entropy and Hamming distance.
use crate::errors::{check_sizes, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut, Not};

/// A fixed-length byte buffer interpreted as a bit string.
///
/// Bit `i` lives in byte `i / 8`, at position `i % 8`
/// counting from the least significant bit. The buffer
/// exposes no way of changing its length once built.
///
/// Supports Serde; it serializes as its raw bytes.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitVector {
    bytes: Vec<u8>,
}

impl BitVector {
    /// Returns a buffer of `len` bytes, each set to `fill`.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::information::BitVector;
    ///
    /// let v = BitVector::new(3, 0xF0);
    /// assert_eq!(v.as_bytes(), &[0xF0, 0xF0, 0xF0]);
    /// assert_eq!(v.bit_len(), 24);
    /// ```
    pub fn new(len: usize, fill: u8) -> BitVector {
        BitVector {
            bytes: vec![fill; len],
        }
    }

    /// Wraps raw byte data.
    pub fn from_bytes(bytes: Vec<u8>) -> BitVector {
        BitVector { bytes }
    }

    /// Returns the length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the length of the buffer in bits.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the value of the `index`th bit.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.bit_len()`.
    pub fn get_bit(&self, index: usize) -> bool {
        (self.bytes[index / 8] >> (index % 8)) & 0x01 == 1
    }

    /// Flips the `index`th bit.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.bit_len()`.
    ///
    /// # Examples
    /// ```
    /// use oxiniche::information::BitVector;
    ///
    /// let mut v = BitVector::new(2, 0x00);
    /// v.flip_bit(9);
    /// assert_eq!(v.as_bytes(), &[0x00, 0x02]);
    /// assert!(v.get_bit(9));
    /// ```
    pub fn flip_bit(&mut self, index: usize) {
        self.bytes[index / 8] ^= 1 << (index % 8);
    }

    /// Returns the byte-wise exclusive-or of two buffers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the buffers
    /// have different lengths.
    ///
    /// [`Error::SizeMismatch`]: crate::Error::SizeMismatch
    ///
    /// # Examples
    /// ```
    /// use oxiniche::information::BitVector;
    ///
    /// let a = BitVector::new(1, 0xFF);
    /// let b = BitVector::new(1, 0x01);
    /// assert_eq!(a.xor(&b).unwrap(), BitVector::new(1, 0xFE));
    ///
    /// assert!(a.xor(&BitVector::new(2, 0x00)).is_err());
    /// ```
    pub fn xor(&self, other: &BitVector) -> Result<BitVector> {
        let mut result = self.clone();
        result.xor_assign(other)?;
        Ok(result)
    }

    /// In-place variant of [`xor`](BitVector::xor).
    pub fn xor_assign(&mut self, other: &BitVector) -> Result<()> {
        check_sizes(self.len(), other.len())?;
        for (byte, other) in self.bytes.iter_mut().zip(&other.bytes) {
            *byte ^= other;
        }
        Ok(())
    }

    /// Returns the byte-wise bitwise-not of the buffer.
    pub fn complement(&self) -> BitVector {
        BitVector {
            bytes: self.bytes.iter().map(|b| !b).collect(),
        }
    }
}

impl Not for &BitVector {
    type Output = BitVector;

    fn not(self) -> BitVector {
        self.complement()
    }
}

impl Not for BitVector {
    type Output = BitVector;

    fn not(mut self) -> BitVector {
        self.bytes.iter_mut().for_each(|b| *b = !*b);
        self
    }
}

impl Index<usize> for BitVector {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.bytes[index]
    }
}

impl IndexMut<usize> for BitVector {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.bytes[index]
    }
}

impl AsRef<[u8]> for BitVector {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for BitVector {
    fn from(bytes: Vec<u8>) -> Self {
        BitVector::from_bytes(bytes)
    }
}

impl From<&[u8]> for BitVector {
    fn from(bytes: &[u8]) -> Self {
        BitVector::from_bytes(bytes.to_vec())
    }
}

/// Uses the string's UTF-8 bytes, which is
/// convenient for hand-written fixtures.
impl From<&str> for BitVector {
    fn from(s: &str) -> Self {
        BitVector::from_bytes(s.as_bytes().to_vec())
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Number of set bits in each nibble value.
const NIBBLE_ONES: [u8; 16] = [0, 1, 1, 2, 1, 2, 2, 3, 1, 2, 2, 3, 2, 3, 3, 4];

fn count_ones(byte: u8) -> usize {
    (NIBBLE_ONES[(byte & 0x0F) as usize] + NIBBLE_ONES[(byte >> 4) as usize]) as usize
}

/// Returns the number of set bits in the buffer.
///
/// # Examples
/// ```
/// use oxiniche::information::{hamming_weight, BitVector};
///
/// let v = BitVector::from_bytes(vec![0x03, 0x01, 0xF3]);
/// assert_eq!(hamming_weight(&v), 2 + 1 + 6);
/// ```
pub fn hamming_weight(v: &BitVector) -> usize {
    v.bytes.iter().copied().map(count_ones).sum()
}

/// Returns the binary Shannon entropy of the buffer's
/// bits, in bits: 0 when all bits agree, 1 when exactly
/// half are set.
///
/// An empty buffer has entropy 0.
///
/// # Examples
/// ```
/// use oxiniche::information::{shannon_entropy, BitVector};
///
/// assert_eq!(shannon_entropy(&BitVector::new(4, 0x00)), 0.0);
/// assert_eq!(shannon_entropy(&BitVector::new(4, 0xFF)), 0.0);
/// assert_eq!(shannon_entropy(&BitVector::new(4, 0x0F)), 1.0);
/// ```
pub fn shannon_entropy(v: &BitVector) -> f64 {
    let bits = v.bit_len();
    if bits == 0 {
        return 0.0;
    }
    let ones = hamming_weight(v);
    let p1 = ones as f64 / bits as f64;
    let p0 = (bits - ones) as f64 / bits as f64;
    -(entropy_term(p0) + entropy_term(p1))
}

/// `p * log2(p)`, taken as 0 at the endpoints.
fn entropy_term(p: f64) -> f64 {
    if p == 0.0 || p == 1.0 {
        0.0
    } else {
        p * p.log2()
    }
}

/// Returns the Hamming distance between two buffers,
/// i.e. the Hamming weight of their exclusive-or.
///
/// # Errors
///
/// Returns [`Error::SizeMismatch`] if the buffers
/// have different lengths.
///
/// [`Error::SizeMismatch`]: crate::Error::SizeMismatch
///
/// # Examples
/// ```
/// use oxiniche::information::{distance, BitVector};
///
/// let a = BitVector::from("test");
/// assert_eq!(distance(&a, &a).unwrap(), 0);
/// assert_eq!(distance(&BitVector::new(2, 0x00), &BitVector::new(2, 0xFF)).unwrap(), 16);
/// ```
pub fn distance(a: &BitVector, b: &BitVector) -> Result<usize> {
    check_sizes(a.len(), b.len())?;
    Ok(a
        .bytes
        .iter()
        .zip(&b.bytes)
        .map(|(x, y)| count_ones(x ^ y))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn complement_and_xor() {
        let a = BitVector::new(1, 0x00);
        let b = BitVector::new(1, 0xFF);
        assert_eq!(a, !&b);

        let c = BitVector::new(1, 0x01);
        let d = b.xor(&c).unwrap();
        assert_eq!(d, BitVector::new(1, 0xFE));
        assert_eq!(d.xor(&c).unwrap(), b);
        assert_eq!(b.xor(&b).unwrap(), a);
    }

    #[test]
    fn xor_with_self_is_zero() {
        let a = BitVector::from("niche partitioning");
        let zero = a.xor(&a).unwrap();
        assert_eq!(zero, BitVector::new(a.len(), 0x00));
    }

    #[test]
    fn double_complement_is_identity() {
        let a = BitVector::from_bytes(vec![0x00, 0x5A, 0xFF, 0x81]);
        assert_eq!(!!a.clone(), a);
        assert_eq!(a.complement().complement(), a);
    }

    #[test]
    fn xor_size_mismatch() {
        let a = BitVector::new(3, 0x00);
        let b = BitVector::new(4, 0x00);
        assert_eq!(a.xor(&b), Err(Error::SizeMismatch { left: 3, right: 4 }));
        let mut c = a.clone();
        assert!(c.xor_assign(&b).is_err());
        assert_eq!(c, a);
    }

    #[test]
    fn hamming_single_byte() {
        for (byte, ones) in [
            (0x00, 0),
            (0x01, 1),
            (0x02, 1),
            (0x03, 2),
            (0x10, 1),
            (0xFF, 8),
        ] {
            assert_eq!(hamming_weight(&BitVector::new(1, byte)), ones);
        }
    }

    #[test]
    fn hamming_matches_count_ones_for_every_byte() {
        for byte in 0..=u8::MAX {
            assert_eq!(count_ones(byte), byte.count_ones() as usize);
        }
    }

    #[test]
    fn hamming_uniform_buffers() {
        for len in [0, 1, 7, 128] {
            assert_eq!(hamming_weight(&BitVector::new(len, 0x00)), 0);
            assert_eq!(hamming_weight(&BitVector::new(len, 0xFF)), 8 * len);
        }
    }

    #[test]
    fn entropy_uniform_and_balanced() {
        assert_eq!(shannon_entropy(&BitVector::new(4, 0x00)), 0.0);
        assert_eq!(shannon_entropy(&BitVector::new(4, 0xFF)), 0.0);

        let mut half = BitVector::new(4, 0x00);
        half[0] = 0xFF;
        half[2] = 0xFF;
        assert_eq!(shannon_entropy(&half), 1.0);
        assert_eq!(shannon_entropy(&BitVector::default()), 0.0);
    }

    #[test]
    fn entropy_is_symmetric_in_bit_value() {
        let a = BitVector::from_bytes(vec![0x01, 0x00, 0x00, 0x00]);
        let h = shannon_entropy(&a);
        assert!(h > 0.0 && h < 1.0);
        assert!((h - shannon_entropy(&a.complement())).abs() < 1e-12);
    }

    #[test]
    fn distance_is_a_metric() {
        let a = BitVector::from("test");
        let b = BitVector::from("bar ");
        let c = BitVector::from("star");

        assert_eq!(distance(&a, &a).unwrap(), 0);
        assert_ne!(distance(&a, &b).unwrap(), 0);
        assert_eq!(distance(&a, &b).unwrap(), distance(&b, &a).unwrap());

        let ab = distance(&a, &b).unwrap();
        let bc = distance(&b, &c).unwrap();
        let ac = distance(&a, &c).unwrap();
        assert!(ac <= ab + bc);
    }

    #[test]
    fn distance_size_mismatch() {
        assert_eq!(
            distance(&BitVector::from("abc"), &BitVector::from("abcd")),
            Err(Error::SizeMismatch { left: 3, right: 4 })
        );
    }

    #[test]
    fn bit_flips_walk_away_one_at_a_time() {
        let a = BitVector::new(20, 0x00);
        let mut b = a.clone();
        for k in 0..a.bit_len() {
            b.flip_bit(k);
            assert_eq!(distance(&a, &b).unwrap(), 1 + k);
        }
        assert_eq!(b, BitVector::new(20, 0xFF));
    }

    #[test]
    fn double_flip_restores() {
        let original = BitVector::from("genome");
        let mut v = original.clone();
        for k in [0, 5, 13, 47] {
            v.flip_bit(k);
            assert_eq!(distance(&original, &v).unwrap(), 1);
            v.flip_bit(k);
            assert_eq!(v, original);
        }
    }

    #[test]
    fn get_bit_is_lsb_first() {
        let v = BitVector::from_bytes(vec![0b0000_0101, 0b1000_0000]);
        let bits: Vec<bool> = (0..v.bit_len()).map(|i| v.get_bit(i)).collect();
        let set: Vec<usize> = bits
            .iter()
            .enumerate()
            .filter_map(|(i, b)| if *b { Some(i) } else { None })
            .collect();
        assert_eq!(set, vec![0, 2, 15]);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(
            BitVector::from_bytes(vec![0x00, 0xAB, 0x0F]).to_string(),
            "00ab0f"
        );
    }
}
