use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use assert_matches::assert_matches;

use sha2::{Sha256, Sha512};

use strainbank::domain::Strain;
use strainbank::error::StrainError;
use strainbank::util::{
    DEFAULT_BATCH_SIZE, DEFAULT_HASH_BLOCK_SIZE, batch_sequence, batch_values, hash_path,
    hash_reader, hash_reader_with, mean,
};

const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
const ABC_SHA512: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                          2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

#[test]
fn sequence_batches_cover_every_element_once() {
    let batches = batch_sequence(1..=45, DEFAULT_BATCH_SIZE)
        .unwrap()
        .collect::<Vec<_>>();
    let sizes = batches.iter().map(HashSet::len).collect::<Vec<_>>();
    assert_eq!(sizes, vec![20, 20, 5]);

    let mut seen = batches.into_iter().flatten().collect::<Vec<_>>();
    seen.sort();
    assert_eq!(seen, (1..=45).collect::<Vec<_>>());
}

#[test]
fn map_values_are_batched_in_iteration_order() {
    let map = (0..7)
        .map(|i| (format!("Gi{i:04}"), i * 10))
        .collect::<BTreeMap<_, _>>();
    let batches = batch_values(&map, 3).unwrap().collect::<Vec<_>>();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0], HashSet::from([&0, &10, &20]));
    assert_eq!(batches[2], HashSet::from([&60]));
}

#[test]
fn repeated_values_may_appear_in_different_batches() {
    let batches = batch_sequence(["a", "b", "a", "c", "a"], 2)
        .unwrap()
        .collect::<Vec<_>>();
    assert_eq!(batches[0], HashSet::from(["a", "b"]));
    assert_eq!(batches[1], HashSet::from(["a", "c"]));
    assert_eq!(batches[2], HashSet::from(["a"]));
}

#[test]
fn mean_of_integers() {
    assert_eq!(mean([2, 4, 6]).unwrap(), 4.0);
    assert_matches!(mean(Vec::<f64>::new()), Err(StrainError::EmptyInput));
}

#[test]
fn hash_does_not_depend_on_block_size() {
    for block_size in [1, 2, 3, 64, DEFAULT_HASH_BLOCK_SIZE] {
        assert_eq!(hash_reader(&b"abc"[..], block_size).unwrap(), ABC_SHA256);
    }
    assert_eq!(hash_reader(&b""[..], 16).unwrap(), EMPTY_SHA256);
}

#[test]
fn hash_large_file_in_blocks() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let chunk = vec![b'A'; 10_000];
    for _ in 0..20 {
        file.write_all(&chunk).unwrap();
    }
    file.flush().unwrap();

    let from_path = hash_path(file.path(), 4096).unwrap();
    let in_memory = hash_reader(&vec![b'A'; 200_000][..], DEFAULT_HASH_BLOCK_SIZE).unwrap();
    assert_eq!(from_path, in_memory);
    assert_eq!(from_path.len(), 64);
    assert!(from_path.chars().all(|ch| ch.is_ascii_hexdigit() && !ch.is_ascii_uppercase()));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.fna");
    assert_matches!(
        hash_path(&missing, DEFAULT_HASH_BLOCK_SIZE),
        Err(StrainError::Io(_))
    );
}

#[test]
fn mean_genome_length_of_strains() {
    let strains = [("Gi0001", Some(4_000_000)), ("Gi0002", None), ("Gi0003", Some(5_000_000))]
        .into_iter()
        .map(|(id, ldna)| {
            let mut strain = Strain::new(id);
            strain.ldna = ldna;
            strain
        })
        .collect::<Vec<_>>();

    let lengths = strains.iter().filter_map(|strain| strain.ldna);
    assert_eq!(mean(lengths).unwrap(), 4_500_000.0);
    assert_eq!(mean(&[1u64, 2, 3, 4]).unwrap(), 2.5);
}

#[test]
fn digest_algorithm_can_be_chosen() {
    for block_size in [1, 7, DEFAULT_HASH_BLOCK_SIZE] {
        assert_eq!(
            hash_reader_with::<Sha512, _>(&b"abc"[..], block_size).unwrap(),
            ABC_SHA512
        );
    }
    assert_eq!(
        hash_reader_with::<Sha256, _>(&b"abc"[..], 2).unwrap(),
        hash_reader(&b"abc"[..], 2).unwrap()
    );
}
