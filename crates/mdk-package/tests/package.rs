//! Full packaging round-trip: seal a variable, then play recipient and
//! unwrap everything back to the original working files.

use std::collections::BTreeMap;
use std::io::Read;

use mdk_model::VariableId;
use mdk_package::{
    PUBLIC_KEY_FILENAME, PackageError, SealedPayload, open, package_variable,
};
use rand::rngs::OsRng;
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

struct Fixture {
    _workdir: TempDir,
    key_dir: TempDir,
    output_dir: TempDir,
    private: RsaPrivateKey,
    data_file: std::path::PathBuf,
    metadata_file: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let workdir = TempDir::new().unwrap();
    let key_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let private = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
    let pem = private
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .unwrap();
    std::fs::write(key_dir.path().join(PUBLIC_KEY_FILENAME), pem).unwrap();

    let var_dir = workdir.path().join("AGE");
    std::fs::create_dir_all(&var_dir).unwrap();
    let data_file = var_dir.join("AGE.csv");
    let metadata_file = var_dir.join("AGE.json");
    std::fs::write(&data_file, "p1;42\np2;39\n").unwrap();
    std::fs::write(&metadata_file, r#"{"name":"age","dataType":"numeric"}"#).unwrap();

    Fixture {
        _workdir: workdir,
        key_dir,
        output_dir,
        private,
        data_file,
        metadata_file,
    }
}

fn read_entries(bytes: &[u8]) -> BTreeMap<String, Vec<u8>> {
    let mut archive = tar::Archive::new(bytes);
    let mut entries = BTreeMap::new();
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().into_owned();
        let mut body = Vec::new();
        entry.read_to_end(&mut body).unwrap();
        entries.insert(name, body);
    }
    entries
}

#[test]
fn packaged_archive_round_trips_to_the_working_files() {
    let fx = fixture();
    let id = VariableId::new("age").unwrap();

    let unit = package_variable(
        &id,
        &fx.data_file,
        &fx.metadata_file,
        fx.key_dir.path(),
        fx.output_dir.path(),
    )
    .unwrap();

    assert_eq!(unit.archive_path, fx.output_dir.path().join("AGE.tar"));
    let outer_bytes = std::fs::read(&unit.archive_path).unwrap();
    assert_eq!(unit.size, outer_bytes.len() as u64);
    assert_eq!(unit.sha256, hex::encode(Sha256::digest(&outer_bytes)));

    // recipient side: unpack the outer tar, unwrap the key, open the payload
    let outer = read_entries(&outer_bytes);
    let sealed = SealedPayload {
        ciphertext: outer["AGE.tar.encr"].clone(),
        encrypted_key: outer["AGE.symkey.encr"].clone(),
    };
    let inner_bytes = open(&fx.private, &sealed).unwrap();

    let inner = read_entries(&inner_bytes);
    assert_eq!(inner["AGE.csv"], b"p1;42\np2;39\n");
    assert_eq!(
        inner["AGE.json"],
        br#"{"name":"age","dataType":"numeric"}"#
    );
}

#[test]
fn two_variables_never_share_a_symmetric_key() {
    let fx = fixture();
    let id = VariableId::new("age").unwrap();

    let first = package_variable(
        &id,
        &fx.data_file,
        &fx.metadata_file,
        fx.key_dir.path(),
        fx.output_dir.path(),
    )
    .unwrap();
    let first_entries = read_entries(&std::fs::read(&first.archive_path).unwrap());

    let second = package_variable(
        &id,
        &fx.data_file,
        &fx.metadata_file,
        fx.key_dir.path(),
        fx.output_dir.path(),
    )
    .unwrap();
    let second_entries = read_entries(&std::fs::read(&second.archive_path).unwrap());

    assert_ne!(
        first_entries["AGE.symkey.encr"],
        second_entries["AGE.symkey.encr"]
    );
    assert_ne!(
        first_entries["AGE.tar.encr"],
        second_entries["AGE.tar.encr"]
    );
}

#[test]
fn missing_recipient_key_fails_the_variable() {
    let fx = fixture();
    std::fs::remove_file(fx.key_dir.path().join(PUBLIC_KEY_FILENAME)).unwrap();
    let id = VariableId::new("age").unwrap();

    let err = package_variable(
        &id,
        &fx.data_file,
        &fx.metadata_file,
        fx.key_dir.path(),
        fx.output_dir.path(),
    );
    assert!(matches!(err, Err(PackageError::MissingKey { .. })));
    assert!(!fx.output_dir.path().join("AGE.tar").exists());
}
