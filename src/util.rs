use std::collections::HashSet;
use std::fs::File;
use std::hash::Hash;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::StrainError;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_HASH_BLOCK_SIZE: usize = 65536;

/// Groups items into sets of `size` distinct elements.
///
/// Duplicates inside one batch collapse; the same value may still show up
/// again in a later batch. The last batch holds whatever is left over.
pub struct Batches<I: Iterator> {
    items: I,
    size: usize,
}

impl<I> Iterator for Batches<I>
where
    I: Iterator,
    I::Item: Eq + Hash,
{
    type Item = HashSet<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = HashSet::with_capacity(self.size);
        while batch.len() < self.size {
            match self.items.next() {
                Some(item) => {
                    batch.insert(item);
                }
                None => break,
            }
        }
        if batch.is_empty() { None } else { Some(batch) }
    }
}

pub fn batch_sequence<T>(items: T, size: usize) -> Result<Batches<T::IntoIter>, StrainError>
where
    T: IntoIterator,
    T::Item: Eq + Hash,
{
    if size == 0 {
        return Err(StrainError::InvalidBatchSize);
    }
    Ok(Batches {
        items: items.into_iter(),
        size,
    })
}

/// Batches the values of a map (or any iterator of pairs), keys are dropped.
pub fn batch_values<M, K, V>(
    map: M,
    size: usize,
) -> Result<Batches<impl Iterator<Item = V>>, StrainError>
where
    M: IntoIterator<Item = (K, V)>,
    V: Eq + Hash,
{
    batch_sequence(map.into_iter().map(|(_, value)| value), size)
}

/// Numeric values that can be averaged.
pub trait AsF64: Copy {
    fn as_f64(self) -> f64;
}

macro_rules! impl_as_f64 {
    ($($ty:ty),*) => {
        $(
            impl AsF64 for $ty {
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_as_f64!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl<T: AsF64> AsF64 for &T {
    fn as_f64(self) -> f64 {
        (*self).as_f64()
    }
}

pub fn mean<T, I>(values: I) -> Result<f64, StrainError>
where
    I: IntoIterator<Item = T>,
    T: AsF64,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0usize), |(sum, count), value| {
            (sum + value.as_f64(), count + 1)
        });
    if count == 0 {
        return Err(StrainError::EmptyInput);
    }
    Ok(sum / count as f64)
}

/// SHA-256 of everything `reader` yields, read `block_size` bytes at a time.
pub fn hash_reader<R: Read>(reader: R, block_size: usize) -> Result<String, StrainError> {
    hash_reader_with::<Sha256, R>(reader, block_size)
}

/// Same as [`hash_reader`] with the digest algorithm picked by the caller.
pub fn hash_reader_with<D: Digest, R: Read>(
    mut reader: R,
    block_size: usize,
) -> Result<String, StrainError> {
    if block_size == 0 {
        return Err(StrainError::InvalidBlockSize);
    }
    let mut hasher = D::new();
    let mut buffer = vec![0u8; block_size];
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn hash_path(path: &Path, block_size: usize) -> Result<String, StrainError> {
    let file = File::open(path)?;
    hash_reader(file, block_size)
}
