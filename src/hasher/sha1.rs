//! 加盐 SHA1 实现
//!
//! 记录格式：`sha1$salt$hash(hex)`

use ::sha1::{Digest, Sha1};

use super::entropy::{SALT_ENTROPY, must_update_salt};
use super::{Algorithm, Hasher, HasherOption, PasswordInfo, record, swallow};
use crate::error::{OptionError, Result};
use crate::random::{constant_time_compare_str, hex_decode, hex_encode};

const ACCEPTED: [Algorithm; 1] = [Algorithm::Sha1];
const FIELDS: usize = 3;

/// SHA1 hasher，salt 必填
#[derive(Debug, Clone)]
pub struct Sha1Hasher {
    salt: String,
}

impl Sha1Hasher {
    /// 从选项构造，salt 为空时返回 `BlankSalt`
    pub fn new(option: &HasherOption) -> Result<Self> {
        if option.salt.is_empty() {
            return Err(OptionError::BlankSalt.into());
        }

        Ok(Self {
            salt: option.salt.clone(),
        })
    }

    fn encode_with(password: &str, salt: &str) -> String {
        let mut hasher = Sha1::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());

        record::join(&[
            Algorithm::Sha1.as_str(),
            salt,
            &hex_encode(&hasher.finalize()),
        ])
    }
}

impl Hasher for Sha1Hasher {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sha1
    }

    fn encode(&self, password: &str) -> Result<String> {
        Ok(Self::encode_with(password, &self.salt))
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        let (algorithm, fields) = record::split_checked(encoded, FIELDS, &ACCEPTED)?;
        hex_decode(fields[2])?;
        Ok(PasswordInfo::new(algorithm, fields[1], fields[2]))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        swallow(Algorithm::Sha1, "verify", self.decode(encoded)).is_some_and(|info| {
            constant_time_compare_str(&Self::encode_with(password, &info.salt), encoded)
        })
    }

    /// salt 熵不足，或者比当前配置的 salt 短，都需要更新
    fn must_update(&self, encoded: &str) -> bool {
        swallow(Algorithm::Sha1, "must_update", self.decode(encoded)).is_some_and(|info| {
            must_update_salt(&info.salt, SALT_ENTROPY) || info.salt.len() < self.salt.len()
        })
    }

    fn harden(&self, _password: &str, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn hasher(salt: &str) -> Sha1Hasher {
        Sha1Hasher::new(&HasherOption::new(Algorithm::Sha1).with_salt(salt)).unwrap()
    }

    #[test]
    fn test_sha1() {
        let hasher = hasher("sha1");
        let encoded = hasher.encode("1qasw23ed").unwrap();
        assert!(encoded.starts_with("sha1$sha1$"));
        assert!(hasher.verify("1qasw23ed", &encoded));
        assert!(!hasher.verify("1qasw23ee", &encoded));
    }

    #[test]
    fn test_known_digest() {
        // sha1("saltpassword")
        let encoded = hasher("salt").encode("password").unwrap();
        assert_eq!(
            encoded,
            "sha1$salt$59b3e8d637cf97edbe2384cf59cb7453dfe30789"
        );
    }

    #[test]
    fn test_blank_salt() {
        let err = Sha1Hasher::new(&HasherOption::new(Algorithm::Sha1)).unwrap_err();
        assert_eq!(err, Error::IllegalOption(OptionError::BlankSalt));
    }

    #[test]
    fn test_decode() {
        let hasher = hasher("salt");
        let encoded = hasher.encode("password").unwrap();
        assert!(hasher.decode(&format!("aa{}", encoded)).unwrap_err().is_unknown_algorithm());
        assert!(hasher.decode("sha1$salt$xyz").unwrap_err().is_malformed());
        assert!(!hasher.verify("password", "sha1$salt"));
    }

    #[test]
    fn test_must_update() {
        let weak = hasher("salt");
        let strong = hasher("saltsaltsaltsalt");
        let longer = hasher("saltsaltsaltsaltsalt");

        let weak_record = weak.encode("password").unwrap();
        let strong_record = strong.encode("password").unwrap();

        // 熵不足
        assert!(strong.must_update(&weak_record));
        // 熵足够，salt 长度与配置一致
        assert!(!strong.must_update(&strong_record));
        // 熵足够，但配置换成了更长的 salt
        assert!(longer.must_update(&strong_record));
    }
}
