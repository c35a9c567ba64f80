//! scrypt 实现
//!
//! 记录格式：`scrypt$workFactor$salt$blockSize$parallelism$hash(base64)`
//!
//! 新记录总是使用固定的 N / r / p；验证时使用记录中的参数。

use ::scrypt::Params;

use super::entropy::{SALT_ENTROPY, must_update_salt};
use super::record::{self, decode_base64, encode_base64, parse_number};
use super::{Algorithm, AlgorithmParams, Hasher, HasherOption, PasswordInfo, ScryptParams, swallow};
use crate::error::{Error, Result};
use crate::random::constant_time_compare_str;

const ACCEPTED: [Algorithm; 1] = [Algorithm::Scrypt];
const FIELDS: usize = 6;

/// N
pub const WORK_FACTOR: u64 = 1 << 14;
/// r
pub const BLOCK_SIZE: u32 = 8;
/// p
pub const PARALLELISM: u32 = 1;
/// 派生密钥长度（字节）
pub const KEY_LENGTH: usize = 64;

/// 记录参数允许的最大内存开销 `128 * r * N`（字节），即 256 MiB
pub const MAX_MEMORY: u64 = 256 << 20;
/// 记录参数允许的最大 p
pub const MAX_PARALLELISM: u32 = 16;

const DEFAULT_PARAMS: ScryptParams = ScryptParams {
    work_factor: WORK_FACTOR,
    block_size: BLOCK_SIZE,
    parallelism: PARALLELISM,
};

/// scrypt hasher
#[derive(Debug, Clone)]
pub struct ScryptHasher {
    salt: String,
}

impl ScryptHasher {
    /// 从选项构造
    ///
    /// scrypt 的调优参数是固定的，传入参数会被拒绝。
    pub fn new(option: &HasherOption) -> Result<Self> {
        if let Some(params) = option.params {
            return Err(Error::invalid_params(format!(
                "scrypt tuning is fixed, got {} params",
                params.family()
            )));
        }

        Ok(Self {
            salt: option.salt.clone(),
        })
    }

    fn derive(password: &str, salt: &str, params: &ScryptParams) -> Result<Vec<u8>> {
        let log_n = params.work_factor.trailing_zeros() as u8;
        let scrypt_params = Params::new(log_n, params.block_size, params.parallelism, KEY_LENGTH)
            .map_err(|e| Error::hash_failed(format!("invalid scrypt params: {}", e)))?;

        let mut key = vec![0u8; KEY_LENGTH];
        ::scrypt::scrypt(password.as_bytes(), salt.as_bytes(), &scrypt_params, &mut key)
            .map_err(|e| Error::hash_failed(format!("scrypt hash failed: {}", e)))?;
        Ok(key)
    }

    fn encode_with(password: &str, salt: &str, params: &ScryptParams) -> Result<String> {
        let key = Self::derive(password, salt, params)?;

        Ok(record::join(&[
            Algorithm::Scrypt.as_str(),
            &params.work_factor.to_string(),
            salt,
            &params.block_size.to_string(),
            &params.parallelism.to_string(),
            &encode_base64(&key),
        ]))
    }

    fn verify_inner(&self, password: &str, encoded: &str) -> Result<bool> {
        let info = self.decode(encoded)?;
        let Some(AlgorithmParams::Scrypt(params)) = info.params else {
            return Err(Error::malformed("scrypt record without params"));
        };
        let recomputed = Self::encode_with(password, &info.salt, &params)?;
        Ok(constant_time_compare_str(&recomputed, encoded))
    }
}

impl Hasher for ScryptHasher {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Scrypt
    }

    fn encode(&self, password: &str) -> Result<String> {
        Self::encode_with(password, &self.salt, &DEFAULT_PARAMS)
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        let (algorithm, fields) = record::split_checked(encoded, FIELDS, &ACCEPTED)?;

        let work_factor: u64 = parse_number(fields[1], "work factor")?;
        if work_factor < 2 || !work_factor.is_power_of_two() {
            return Err(Error::malformed(format!(
                "work factor must be a power of two greater than 1, got {}",
                work_factor
            )));
        }
        let block_size: u32 = parse_number(fields[3], "block size")?;
        let parallelism: u32 = parse_number(fields[4], "parallelism")?;
        if block_size == 0 || parallelism == 0 {
            return Err(Error::malformed("block size and parallelism must be greater than 0"));
        }
        if parallelism > MAX_PARALLELISM {
            return Err(Error::malformed(format!(
                "parallelism {} exceeds {}",
                parallelism, MAX_PARALLELISM
            )));
        }
        let memory = work_factor
            .checked_mul(128 * u64::from(block_size))
            .filter(|memory| *memory <= MAX_MEMORY);
        if memory.is_none() {
            return Err(Error::malformed(format!(
                "work factor {} with block size {} exceeds {} bytes",
                work_factor, block_size, MAX_MEMORY
            )));
        }
        decode_base64(fields[5], "hash")?;

        let params = ScryptParams {
            work_factor,
            block_size,
            parallelism,
        };

        Ok(PasswordInfo::new(algorithm, fields[2], fields[5])
            .with_params(AlgorithmParams::Scrypt(params)))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        swallow(Algorithm::Scrypt, "verify", self.verify_inner(password, encoded)).unwrap_or(false)
    }

    /// salt 熵不足、比当前配置的 salt 短，或者记录的参数弱于固定参数，都需要更新
    fn must_update(&self, encoded: &str) -> bool {
        let Some(info) = swallow(Algorithm::Scrypt, "must_update", self.decode(encoded)) else {
            return false;
        };

        let weaker_params = match info.params {
            Some(AlgorithmParams::Scrypt(params)) => {
                params.work_factor < WORK_FACTOR
                    || params.block_size < BLOCK_SIZE
                    || params.parallelism < PARALLELISM
            }
            _ => false,
        };

        must_update_salt(&info.salt, SALT_ENTROPY)
            || info.salt.len() < self.salt.len()
            || weaker_params
    }

    fn harden(&self, _password: &str, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher(salt: &str) -> ScryptHasher {
        ScryptHasher::new(&HasherOption::new(Algorithm::Scrypt).with_salt(salt)).unwrap()
    }

    #[test]
    fn test_known_vector() {
        let encoded = hasher("salt").encode("password").unwrap();
        assert_eq!(
            encoded,
            "scrypt$16384$salt$8$1$dFcxr0SE8yOWiWntoomu7gBbWQOsVh5kpayhIXl793NO+f1YQi4uIhg7ysup7Ie6DIO3oueI8Dzg2gZGNDPNpg=="
        );
    }

    #[test]
    fn test_scrypt_verify() {
        let hasher = hasher("salt");
        let encoded = hasher.encode("1qasw23ed").unwrap();

        assert!(hasher.verify("1qasw23ed", &encoded));
        assert!(!hasher.verify("1qasw23ee", &encoded));

        let wrong = format!("aa{}", encoded);
        assert!(hasher.decode(&wrong).unwrap_err().is_unknown_algorithm());
        assert!(!hasher.verify("1qasw23ed", &wrong));
    }

    #[test]
    fn test_decode_surfaces_params() {
        let hasher = hasher("saltsaltsaltsalt");
        let encoded = hasher.encode("password").unwrap();
        let info = hasher.decode(&encoded).unwrap();

        assert_eq!(info.salt, "saltsaltsaltsalt");
        assert_eq!(info.params, Some(AlgorithmParams::Scrypt(DEFAULT_PARAMS)));
    }

    #[test]
    fn test_verify_uses_record_params() {
        let cheap = ScryptParams {
            work_factor: 1 << 4,
            block_size: 8,
            parallelism: 1,
        };
        let encoded = ScryptHasher::encode_with("password", "saltsaltsaltsalt", &cheap).unwrap();

        let hasher = hasher("saltsaltsaltsalt");
        assert!(hasher.verify("password", &encoded));
        // 记录参数弱于固定参数
        assert!(hasher.must_update(&encoded));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        let hasher = hasher("salt");
        assert!(hasher.decode("scrypt$er$salt$8$1$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("scrypt$1000$salt$8$1$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("scrypt$16384$salt$x$1$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("scrypt$16384$salt$8$x$AAAA").unwrap_err().is_malformed());
        assert!(hasher.decode("scrypt$16384$salt$8$1$@@@").unwrap_err().is_malformed());
        assert!(hasher.decode("scrypt$16384$salt$8$1").unwrap_err().is_malformed());
    }

    #[test]
    fn test_oversized_record_params_are_malformed() {
        let hasher = hasher("saltsaltsaltsalt");
        let records = [
            "scrypt$1099511627776$saltsaltsaltsalt$8$1$AAAA",
            "scrypt$16384$saltsaltsaltsalt$4294967295$1$AAAA",
            "scrypt$16384$saltsaltsaltsalt$8$4294967295$AAAA",
            "scrypt$16384$saltsaltsaltsalt$0$1$AAAA",
            "scrypt$9223372036854775808$saltsaltsaltsalt$8$1$AAAA",
        ];

        for record in records {
            assert!(hasher.decode(record).unwrap_err().is_malformed(), "{}", record);
            assert!(!hasher.verify("password", record));
            assert!(!hasher.must_update(record));
        }

        // 上限本身可以接受
        let at_limit = format!("scrypt${}$saltsaltsaltsalt$8${}$AAAA", MAX_MEMORY / (128 * 8), MAX_PARALLELISM);
        assert!(hasher.decode(&at_limit).is_ok());
    }

    #[test]
    fn test_must_update() {
        let short = hasher("salt");
        let strong = hasher("saltsaltsaltsalt");
        let longer = hasher("saltsaltsaltsaltsalt");

        let strong_record = strong.encode("password").unwrap();
        assert!(strong.must_update(&short.encode("password").unwrap()));
        assert!(!strong.must_update(&strong_record));
        assert!(longer.must_update(&strong_record));
        assert!(!strong.must_update("scrypt$broken"));
    }

    #[test]
    fn test_params_rejected() {
        let option = HasherOption::new(Algorithm::Scrypt).with_params(AlgorithmParams::Scrypt(DEFAULT_PARAMS));
        assert!(ScryptHasher::new(&option).is_err());
    }
}
