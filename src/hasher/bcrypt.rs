//! bcrypt / bcrypt_sha256 实现
//!
//! 记录格式：`bcrypt$<bcrypt 字符串>`，cost 和 salt 都在 bcrypt 自己的字符串里。
//! `bcrypt_sha256` 先对密码做 SHA-256（hex 文本，64 字节），避开 bcrypt 只取前 72 字节的限制。

use ::bcrypt::HashParts;
use sha2::{Digest, Sha256};

use super::{Algorithm, Hasher, HasherOption, PasswordInfo, record, swallow};
use crate::error::{Error, Result};
use crate::random::hex_encode;

const ACCEPTED: [Algorithm; 2] = [Algorithm::Bcrypt, Algorithm::BcryptSha256];
const FIELDS: usize = 2;

/// bcrypt 允许的最小 cost
pub const MIN_COST: u32 = 4;
/// bcrypt 允许的最大 cost
pub const MAX_COST: u32 = 31;

/// bcrypt hasher
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    algorithm: Algorithm,
    cost: u32,
}

impl BcryptHasher {
    /// 从选项构造，`iterations` 即 cost
    ///
    /// 小于 4 的 cost 按 4 处理，大于 31 返回错误。
    pub fn new(algorithm: Algorithm, option: &HasherOption) -> Result<Self> {
        if !ACCEPTED.contains(&algorithm) {
            return Err(Error::unknown_algorithm(algorithm.as_str()));
        }

        let cost = option.iterations.max(MIN_COST);
        if cost > MAX_COST {
            return Err(Error::invalid_params(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }

        Ok(Self { algorithm, cost })
    }

    /// 当前配置的 cost
    pub fn cost(&self) -> u32 {
        self.cost
    }

    fn prepare(algorithm: Algorithm, password: &str) -> Vec<u8> {
        match algorithm {
            Algorithm::BcryptSha256 => hex_encode(&Sha256::digest(password.as_bytes())).into_bytes(),
            _ => password.as_bytes().to_vec(),
        }
    }

    fn verify_inner(&self, password: &str, encoded: &str) -> Result<bool> {
        let info = self.decode(encoded)?;
        let data = Self::prepare(info.algorithm, password);
        ::bcrypt::verify(data, &info.hash)
            .map_err(|e| Error::malformed(format!("bcrypt verify failed: {}", e)))
    }
}

impl Hasher for BcryptHasher {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn encode(&self, password: &str) -> Result<String> {
        let data = Self::prepare(self.algorithm, password);
        let hashed = ::bcrypt::hash(data, self.cost)
            .map_err(|e| Error::hash_failed(format!("bcrypt hash failed: {}", e)))?;

        Ok(record::join(&[self.algorithm.as_str(), &hashed]))
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        let (algorithm, fields) = record::split_checked(encoded, FIELDS, &ACCEPTED)?;

        let parts: HashParts = fields[1]
            .parse()
            .map_err(|e| Error::malformed(format!("invalid bcrypt hash: {}", e)))?;

        let cost = parts.get_cost();
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::malformed(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST, MAX_COST, cost
            )));
        }

        Ok(PasswordInfo::new(algorithm, "", fields[1]).with_iterations(cost))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        swallow(self.algorithm, "verify", self.verify_inner(password, encoded)).unwrap_or(false)
    }

    /// 记录的 cost 低于当前配置时需要更新
    fn must_update(&self, encoded: &str) -> bool {
        swallow(self.algorithm, "must_update", self.decode(encoded))
            .is_some_and(|info| info.iterations < self.cost)
    }

    /// bcrypt 无法在不知道原始参数的情况下提高 cost，原样返回
    fn harden(&self, _password: &str, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}
