//! MD5 / unsalted MD5 实现
//!
//! 记录格式：`md5$salt$hash(hex)`，salt 为空时为 `unsalted_md5$$hash(hex)`。
//! 仅用于兼容旧数据，新记录应使用 argon2id 或 pbkdf2。

use ::md5::{Digest, Md5};

use super::entropy::{SALT_ENTROPY, must_update_salt};
use super::{Algorithm, Hasher, HasherOption, PasswordInfo, record, swallow};
use crate::error::Result;
use crate::random::{constant_time_compare_str, hex_decode, hex_encode};

const ACCEPTED: [Algorithm; 2] = [Algorithm::Md5, Algorithm::UnsaltedMd5];
const FIELDS: usize = 3;

/// MD5 hasher
///
/// 算法标识由 salt 决定：有 salt 为 `md5`，否则为 `unsalted_md5`。
#[derive(Debug, Clone)]
pub struct Md5Hasher {
    salt: String,
}

impl Md5Hasher {
    /// 从选项构造，salt 可以为空
    pub fn new(option: &HasherOption) -> Self {
        Self {
            salt: option.salt.clone(),
        }
    }

    fn identifier(salt: &str) -> Algorithm {
        if salt.is_empty() {
            Algorithm::UnsaltedMd5
        } else {
            Algorithm::Md5
        }
    }

    fn encode_with(password: &str, salt: &str) -> String {
        let mut hasher = Md5::new();
        if !salt.is_empty() {
            hasher.update(salt.as_bytes());
        }
        hasher.update(password.as_bytes());

        record::join(&[
            Self::identifier(salt).as_str(),
            salt,
            &hex_encode(&hasher.finalize()),
        ])
    }
}

impl Hasher for Md5Hasher {
    fn algorithm(&self) -> Algorithm {
        Self::identifier(&self.salt)
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
        swallow(self.algorithm(), "verify", self.decode(encoded)).is_some_and(|info| {
            constant_time_compare_str(&Self::encode_with(password, &info.salt), encoded)
        })
    }

    /// salt 熵不足时需要更新
    fn must_update(&self, encoded: &str) -> bool {
        swallow(self.algorithm(), "must_update", self.decode(encoded))
            .is_some_and(|info| must_update_salt(&info.salt, SALT_ENTROPY))
    }

    fn harden(&self, _password: &str, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}
