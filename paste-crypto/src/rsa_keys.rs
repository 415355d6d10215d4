//! RSA key file parsing.
//!
//! Key files may be DER or PEM, and PKCS#1 or PKIX/PKCS#8 inside either. DER
//! is tried first; if neither structure matches, the bytes are PEM-decoded and
//! both structures are tried again on the payload.

use pkcs8::{EncryptedPrivateKeyInfo, PrivateKeyInfo, SubjectPublicKeyInfoRef};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, ALGORITHM_OID};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::KeyError;

/// Outcome of one decoding pass over a byte buffer.
enum Attempt<K> {
    Parsed(K),
    /// Well-formed key structure with a non-RSA algorithm.
    NotRsa,
    Unrecognized,
}

/// Parse an RSA public key (PKCS#1 or PKIX, DER or PEM).
pub fn parse_public_key(bytes: &[u8]) -> Result<RsaPublicKey, KeyError> {
    parse_with(bytes, |der| Ok(decode_public_der(der)))
}

/// Parse an RSA private key (PKCS#1 or PKCS#8, DER or PEM).
///
/// An encrypted PKCS#8 key is unlocked with `password`, which the caller has
/// already trimmed. Without a password such a key fails with
/// [`KeyError::PasswordRequired`].
pub fn parse_private_key(bytes: &[u8], password: Option<&str>) -> Result<RsaPrivateKey, KeyError> {
    parse_with(bytes, |der| decode_private_der(der, password))
}

fn parse_with<K>(
    bytes: &[u8],
    decode: impl Fn(&[u8]) -> Result<Attempt<K>, KeyError>,
) -> Result<K, KeyError> {
    let mut saw_other_algorithm = false;

    match decode(bytes)? {
        Attempt::Parsed(key) => return Ok(key),
        Attempt::NotRsa => saw_other_algorithm = true,
        Attempt::Unrecognized => {}
    }

    if let Ok(block) = pem::parse(bytes) {
        match decode(block.contents())? {
            Attempt::Parsed(key) => return Ok(key),
            Attempt::NotRsa => saw_other_algorithm = true,
            Attempt::Unrecognized => {}
        }
    }

    if saw_other_algorithm {
        Err(KeyError::NotAnRsaKey)
    } else {
        Err(KeyError::UnsupportedKeyFormat)
    }
}

fn decode_public_der(der: &[u8]) -> Attempt<RsaPublicKey> {
    if let Ok(key) = RsaPublicKey::from_pkcs1_der(der) {
        return Attempt::Parsed(key);
    }
    let Ok(spki) = SubjectPublicKeyInfoRef::try_from(der) else {
        return Attempt::Unrecognized;
    };
    if spki.algorithm.oid != ALGORITHM_OID {
        return Attempt::NotRsa;
    }
    match RsaPublicKey::try_from(spki) {
        Ok(key) => Attempt::Parsed(key),
        Err(_) => Attempt::Unrecognized,
    }
}

fn decode_private_der(
    der: &[u8],
    password: Option<&str>,
) -> Result<Attempt<RsaPrivateKey>, KeyError> {
    if let Ok(key) = RsaPrivateKey::from_pkcs1_der(der) {
        return Ok(Attempt::Parsed(key));
    }
    if let Ok(info) = PrivateKeyInfo::try_from(der) {
        return Ok(private_from_info(info));
    }
    if let Ok(encrypted) = EncryptedPrivateKeyInfo::try_from(der) {
        let password = password.ok_or(KeyError::PasswordRequired)?;
        let document = encrypted
            .decrypt(password)
            .map_err(|e| KeyError::UnlockFailed(e.to_string()))?;
        let info = PrivateKeyInfo::try_from(document.as_bytes())
            .map_err(|e| KeyError::UnlockFailed(e.to_string()))?;
        return Ok(private_from_info(info));
    }
    Ok(Attempt::Unrecognized)
}

fn private_from_info(info: PrivateKeyInfo<'_>) -> Attempt<RsaPrivateKey> {
    if info.algorithm.oid != ALGORITHM_OID {
        return Attempt::NotRsa;
    }
    match RsaPrivateKey::try_from(info) {
        Ok(key) => Attempt::Parsed(key),
        Err(_) => Attempt::Unrecognized,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey, LineEnding};
    use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};

    #[test]
    fn public_key_pkcs1_der() {
        let public = alice().to_public_key();
        let der = public.to_pkcs1_der().unwrap();
        assert_eq!(parse_public_key(der.as_bytes()).unwrap(), public);
    }

    #[test]
    fn public_key_pkix_der() {
        let public = alice().to_public_key();
        let der = public.to_public_key_der().unwrap();
        assert_eq!(parse_public_key(der.as_bytes()).unwrap(), public);
    }

    #[test]
    fn public_key_pkcs1_pem() {
        let public = alice().to_public_key();
        let pem = public.to_pkcs1_pem(LineEnding::LF).unwrap();
        assert_eq!(parse_public_key(pem.as_bytes()).unwrap(), public);
    }

    #[test]
    fn public_key_pkix_pem() {
        let public = alice().to_public_key();
        let pem = public.to_public_key_pem(LineEnding::LF).unwrap();
        assert_eq!(parse_public_key(pem.as_bytes()).unwrap(), public);
    }

    #[test]
    fn private_key_all_encodings() {
        let private = alice();

        let pkcs1_der = private.to_pkcs1_der().unwrap();
        let pkcs1_pem = private.to_pkcs1_pem(LineEnding::LF).unwrap();
        let pkcs8_der = private.to_pkcs8_der().unwrap();
        let pkcs8_pem = private.to_pkcs8_pem(LineEnding::LF).unwrap();

        for bytes in [
            pkcs1_der.as_bytes(),
            pkcs1_pem.as_bytes(),
            pkcs8_der.as_bytes(),
            pkcs8_pem.as_bytes(),
        ] {
            assert_eq!(&parse_private_key(bytes, None).unwrap(), private);
        }
    }

    #[test]
    fn encrypted_private_key_needs_password() {
        // PBKDF2 parameters keep this fast; the default scrypt cost is heavy
        // in debug builds.
        let der = alice().to_pkcs8_der().unwrap();
        let info = PrivateKeyInfo::try_from(der.as_bytes()).unwrap();
        let params = pkcs8::pkcs5::pbes2::Parameters::pbkdf2_sha256_aes256cbc(
            1_000,
            b"pastebox-fixture",
            &[7u8; 16],
        )
        .unwrap();
        let encrypted = info.encrypt_with_params(params, "hunter2").unwrap();
        let pem = pem::encode(&pem::Pem::new(
            "ENCRYPTED PRIVATE KEY",
            encrypted.as_bytes().to_vec(),
        ));

        assert!(matches!(
            parse_private_key(pem.as_bytes(), None),
            Err(KeyError::PasswordRequired)
        ));
        assert!(matches!(
            parse_private_key(pem.as_bytes(), Some("wrong")),
            Err(KeyError::UnlockFailed(_))
        ));
        assert_eq!(
            &parse_private_key(pem.as_bytes(), Some("hunter2")).unwrap(),
            alice()
        );
    }

    #[test]
    fn garbage_is_unsupported() {
        assert!(matches!(
            parse_public_key(b"definitely not a key"),
            Err(KeyError::UnsupportedKeyFormat)
        ));
        assert!(matches!(
            parse_private_key(b"", None),
            Err(KeyError::UnsupportedKeyFormat)
        ));
    }

    #[test]
    fn public_key_is_not_a_private_key() {
        let der = alice().to_public_key().to_public_key_der().unwrap();
        assert!(matches!(
            parse_private_key(der.as_bytes(), None),
            Err(KeyError::UnsupportedKeyFormat)
        ));
    }

    #[test]
    fn ed25519_keys_are_rejected_as_not_rsa() {
        assert!(matches!(
            parse_public_key(&ed25519_public_der()),
            Err(KeyError::NotAnRsaKey)
        ));
        assert!(matches!(
            parse_private_key(&ed25519_private_der(), None),
            Err(KeyError::NotAnRsaKey)
        ));
    }

    #[test]
    fn ed25519_pem_is_rejected_as_not_rsa() {
        let block = pem::Pem::new("PUBLIC KEY", ed25519_public_der());
        let text = pem::encode(&block);
        assert!(matches!(
            parse_public_key(text.as_bytes()),
            Err(KeyError::NotAnRsaKey)
        ));
    }
}
