//! PBKDF2-SHA1 / PBKDF2-SHA256 实现
//!
//! 记录格式：`pbkdf2_sha256$iterations$salt$hash(base64)`

use ::pbkdf2::pbkdf2_hmac;
use ::sha1::Sha1;
use sha2::Sha256;

use super::entropy::{SALT_ENTROPY, must_update_salt};
use super::record::{self, decode_base64, encode_base64, parse_number};
use super::{Algorithm, Hasher, HasherOption, PasswordInfo, swallow};
use crate::error::{Error, PasswordHashError, Result};
use crate::random::constant_time_compare_str;

const ACCEPTED: [Algorithm; 2] = [Algorithm::Pbkdf2Sha1, Algorithm::Pbkdf2Sha256];
const FIELDS: usize = 4;

/// 记录和配置允许的最大迭代次数
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// PBKDF2 使用的哈希函数，输出长度等于摘要长度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prf {
    Sha1,
    Sha256,
}

impl Prf {
    fn for_algorithm(algorithm: Algorithm) -> Result<Self> {
        match algorithm {
            Algorithm::Pbkdf2Sha1 => Ok(Prf::Sha1),
            Algorithm::Pbkdf2Sha256 => Ok(Prf::Sha256),
            other => Err(Error::unknown_algorithm(other.as_str())),
        }
    }

    fn derive(self, password: &[u8], salt: &[u8], iterations: u32) -> Vec<u8> {
        match self {
            Prf::Sha1 => {
                let mut key = [0u8; 20];
                pbkdf2_hmac::<Sha1>(password, salt, iterations, &mut key);
                key.to_vec()
            }
            Prf::Sha256 => {
                let mut key = [0u8; 32];
                pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
                key.to_vec()
            }
        }
    }
}

/// PBKDF2 hasher
///
/// 唯一支持 [`Hasher::harden`] 的算法族。
#[derive(Debug, Clone)]
pub struct Pbkdf2Hasher {
    algorithm: Algorithm,
    salt: String,
    iterations: u32,
}

impl Pbkdf2Hasher {
    /// 从选项构造；哈希函数由算法标识决定
    ///
    /// 迭代次数超过 [`MAX_ITERATIONS`] 时返回 `InvalidParams`。
    pub fn new(algorithm: Algorithm, option: &HasherOption) -> Result<Self> {
        Prf::for_algorithm(algorithm)?;

        if option.iterations > MAX_ITERATIONS {
            return Err(Error::invalid_params(format!(
                "pbkdf2 iterations {} exceeds {}",
                option.iterations, MAX_ITERATIONS
            )));
        }

        Ok(Self {
            algorithm,
            salt: option.salt.clone(),
            iterations: option.iterations,
        })
    }

    /// 当前配置的迭代次数
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn encode_with(algorithm: Algorithm, password: &str, salt: &str, iterations: u32) -> Result<String> {
        let key = Prf::for_algorithm(algorithm)?.derive(password.as_bytes(), salt.as_bytes(), iterations);

        Ok(record::join(&[
            algorithm.as_str(),
            &iterations.to_string(),
            salt,
            &encode_base64(&key),
        ]))
    }

    fn verify_inner(&self, password: &str, encoded: &str) -> Result<bool> {
        let info = self.decode(encoded)?;
        let recomputed = Self::encode_with(info.algorithm, password, &info.salt, info.iterations)?;
        Ok(constant_time_compare_str(&recomputed, encoded))
    }
}

impl Hasher for Pbkdf2Hasher {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn encode(&self, password: &str) -> Result<String> {
        Self::encode_with(self.algorithm, password, &self.salt, self.iterations)
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        let (algorithm, fields) = record::split_checked(encoded, FIELDS, &ACCEPTED)?;

        let iterations: u32 = parse_number(fields[1], "iterations")?;
        if iterations == 0 || iterations > MAX_ITERATIONS {
            return Err(Error::malformed(format!(
                "iterations must be between 1 and {}, got {}",
                MAX_ITERATIONS, iterations
            )));
        }
        decode_base64(fields[3], "hash")?;

        Ok(PasswordInfo::new(algorithm, fields[2], fields[3]).with_iterations(iterations))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        swallow(self.algorithm, "verify", self.verify_inner(password, encoded)).unwrap_or(false)
    }

    /// 迭代次数低于当前配置，或者 salt 熵不足，都需要更新
    fn must_update(&self, encoded: &str) -> bool {
        let Some(info) = swallow(self.algorithm, "must_update", self.decode(encoded)) else {
            return false;
        };

        let fewer_iterations = info.iterations < self.iterations;
        let weak_salt = must_update_salt(&info.salt, SALT_ENTROPY);
        if fewer_iterations || weak_salt {
            tracing::debug!(
                algorithm = %info.algorithm,
                fewer_iterations,
                weak_salt,
                "record must be updated"
            );
        }
        fewer_iterations || weak_salt
    }

    /// 把记录的迭代次数提高到当前配置
    ///
    /// 密码必须能通过验证；记录的迭代次数不低于配置时原样返回。
    /// 新记录保留原记录的算法和 salt，用配置的迭代次数从头派生。
    fn harden(&self, password: &str, encoded: &str) -> Result<String> {
        let info = self.decode(encoded)?;

        if !self.verify_inner(password, encoded)? {
            return Err(PasswordHashError::VerifyFailed.into());
        }

        if self.iterations <= info.iterations {
            return Ok(encoded.to_string());
        }

        tracing::debug!(
            algorithm = %info.algorithm,
            from = info.iterations,
            to = self.iterations,
            "hardening record"
        );
        Self::encode_with(info.algorithm, password, &info.salt, self.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher(algorithm: Algorithm, salt: &str, iterations: u32) -> Pbkdf2Hasher {
        Pbkdf2Hasher::new(
            algorithm,
            &HasherOption::new(algorithm).with_salt(salt).with_iterations(iterations),
        )
        .unwrap()
    }

    #[test]
    fn test_known_vectors() {
        let sha1 = hasher(Algorithm::Pbkdf2Sha1, "salt", 1);
        assert_eq!(
            sha1.encode("password").unwrap(),
            "pbkdf2_sha1$1$salt$DGDID5YfDnHzqbUkr2ASBi/gN6Y="
        );

        let sha256 = hasher(Algorithm::Pbkdf2Sha256, "salt", 1);
        assert_eq!(
            sha256.encode("password").unwrap(),
            "pbkdf2_sha256$1$salt$Eg+2z/z4syxD5yJSVsT4N6hlSMkszDVICAWYfLcL4Xs="
        );
    }

    #[test]
    fn test_pbkdf2_sha256() {
        let hasher = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 10000);
        let encoded = hasher.encode("1qasw23ed").unwrap();
        assert_eq!(
            encoded,
            "pbkdf2_sha256$10000$saltsaltsalt$0RA1bdGKhhFtmWDMprqs08xtnfLFzyTwNfsr8NhsGXc="
        );

        assert!(hasher.verify("1qasw23ed", &encoded));
        assert!(!hasher.verify("1qasw23ee", &encoded));

        let wrong = format!("aa{}", encoded);
        assert!(hasher.decode(&wrong).is_err());
        assert!(!hasher.verify("1qasw23ed", &wrong));
    }

    #[test]
    fn test_verify_uses_record_variant() {
        let encoded = hasher(Algorithm::Pbkdf2Sha1, "salt", 100).encode("password").unwrap();
        let other = hasher(Algorithm::Pbkdf2Sha256, "other", 5000);
        assert!(other.verify("password", &encoded));
    }

    #[test]
    fn test_decode() {
        let hasher = hasher(Algorithm::Pbkdf2Sha1, "salt", 10);
        let info = hasher.decode("pbkdf2_sha1$10$salt$DGDID5YfDnHzqbUkr2ASBi/gN6Y=").unwrap();
        assert_eq!(info.algorithm, Algorithm::Pbkdf2Sha1);
        assert_eq!(info.iterations, 10);
        assert_eq!(info.salt, "salt");

        assert!(hasher.decode("pbkdf2_sha1$er$salt$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("pbkdf2_sha1$0$salt$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("pbkdf2_sha1$10$salt$!!").unwrap_err().is_malformed());
        assert!(hasher.decode("pbkdf2_md5$10$salt$AAAA").unwrap_err().is_unknown_algorithm());
        assert!(!hasher.verify("password", "pbkdf2_sha1$er$salt$AAAA"));
    }

    #[test]
    fn test_iteration_ceiling() {
        let hasher = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 10);
        let record = "pbkdf2_sha256$4294967295$saltsaltsalt$AAAA";
        assert!(hasher.decode(record).unwrap_err().is_malformed());
        assert!(!hasher.verify("password", record));
        assert!(!hasher.must_update(record));

        let above = format!("pbkdf2_sha1${}$saltsaltsalt$AAAA", MAX_ITERATIONS + 1);
        assert!(hasher.decode(&above).unwrap_err().is_malformed());
        let at_limit = format!("pbkdf2_sha1${}$saltsaltsalt$AAAA", MAX_ITERATIONS);
        assert_eq!(hasher.decode(&at_limit).unwrap().iterations, MAX_ITERATIONS);

        let option = HasherOption::new(Algorithm::Pbkdf2Sha1).with_iterations(MAX_ITERATIONS + 1);
        let err = Pbkdf2Hasher::new(Algorithm::Pbkdf2Sha1, &option).unwrap_err();
        assert!(matches!(err, Error::IllegalOption(_)));
    }

    #[test]
    fn test_must_update() {
        let encoded = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 100).encode("password").unwrap();

        assert!(!hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 100).must_update(&encoded));
        assert!(!hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 90).must_update(&encoded));
        assert!(hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 101).must_update(&encoded));

        let weak = hasher(Algorithm::Pbkdf2Sha256, "salt", 100).encode("password").unwrap();
        assert!(hasher(Algorithm::Pbkdf2Sha256, "salt", 100).must_update(&weak));
    }

    #[test]
    fn test_harden() {
        let old = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 100);
        let encoded = old.encode("password").unwrap();

        let target = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 250);
        let hardened = target.harden("password", &encoded).unwrap();
        assert!(hardened.starts_with("pbkdf2_sha256$250$saltsaltsalt$"));
        assert!(target.verify("password", &hardened));
        assert!(!target.must_update(&hardened));
        assert_eq!(hardened, target.encode("password").unwrap());
    }

    #[test]
    fn test_harden_keeps_stronger_record() {
        let encoded = hasher(Algorithm::Pbkdf2Sha1, "saltsaltsalt", 300).encode("password").unwrap();
        let target = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 200);
        assert_eq!(target.harden("password", &encoded).unwrap(), encoded);
    }

    #[test]
    fn test_harden_requires_password() {
        let encoded = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 100).encode("password").unwrap();
        let target = hasher(Algorithm::Pbkdf2Sha256, "saltsaltsalt", 200);

        let err = target.harden("wrong", &encoded).unwrap_err();
        assert_eq!(err, Error::PasswordHash(PasswordHashError::VerifyFailed));
        assert!(target.harden("password", "garbage").unwrap_err().is_unknown_algorithm());
    }
}
