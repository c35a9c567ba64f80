//! Argon2id 实现
//!
//! 记录格式：`argon2id$salt(hex)$iterations$memory$parallelism$keyLength$hash(hex)`

use std::fmt;

use ::argon2::{Algorithm as Argon2Algorithm, Argon2, Params, Version};

use super::record::{self, parse_number};
use super::{Algorithm, AlgorithmParams, Argon2Params, Hasher, HasherOption, PasswordInfo, swallow};
use crate::error::{Error, Result};
use crate::random::{constant_time_compare_str, generate_random_bytes, hex_decode, hex_encode};

const ACCEPTED: [Algorithm; 1] = [Algorithm::Argon2id];
const FIELDS: usize = 7;

/// argon2 要求的最短 salt（字节）
pub const MIN_SALT_LENGTH: usize = 8;
/// 允许的最长 salt（字节）
pub const MAX_SALT_LENGTH: usize = 64;
/// 允许的最大内存开销（KiB），即 1 GiB
pub const MAX_MEMORY: u32 = 1 << 20;
/// 允许的最大迭代次数
pub const MAX_ITERATIONS: u32 = 64;
/// 允许的最大并行度
pub const MAX_PARALLELISM: u32 = 64;
/// 允许的最大输出长度（字节）
pub const MAX_KEY_LENGTH: usize = 1024;

/// 检查参数是否超出上限；记录和配置使用同一组上限
fn exceeded_limit(params: &Argon2Params) -> Option<String> {
    let limits = [
        ("memory", params.memory as usize, MAX_MEMORY as usize),
        ("iterations", params.iterations as usize, MAX_ITERATIONS as usize),
        ("parallelism", params.parallelism as usize, MAX_PARALLELISM as usize),
        ("salt length", params.salt_length, MAX_SALT_LENGTH),
        ("key length", params.key_length, MAX_KEY_LENGTH),
    ];
    limits
        .into_iter()
        .find(|(_, value, max)| value > max)
        .map(|(name, value, max)| format!("argon2 {} {} exceeds {}", name, value, max))
}

/// Argon2id hasher
///
/// 每次编码都会生成新的随机 salt；可选的 secret 作为 argon2 的密钥参与计算但不写入记录。
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Argon2Params,
    secret: Vec<u8>,
}

impl Argon2Hasher {
    /// 从选项构造
    ///
    /// 未提供参数时使用默认值，并以 `iterations` 作为 time cost。
    pub fn new(option: &HasherOption) -> Result<Self> {
        let params = match option.params {
            None => Argon2Params::default().with_iterations(option.iterations),
            Some(AlgorithmParams::Argon2(params)) => params,
            Some(other) => {
                return Err(Error::invalid_params(format!(
                    "argon2id expects argon2 params, got {}",
                    other.family()
                )));
            }
        };

        if params.salt_length < MIN_SALT_LENGTH {
            return Err(Error::invalid_params(format!(
                "argon2 salt length must be at least {} bytes, got {}",
                MIN_SALT_LENGTH, params.salt_length
            )));
        }

        if let Some(message) = exceeded_limit(&params) {
            return Err(Error::invalid_params(message));
        }

        let hasher = Self {
            params,
            secret: option.secret.as_bytes().to_vec(),
        };
        // 提前让 argon2 检查 memory / iterations / parallelism / key length
        hasher
            .context(&params)
            .map_err(|e| Error::invalid_params(e.to_string()))?;

        Ok(hasher)
    }

    /// 当前配置的参数
    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    fn context(&self, params: &Argon2Params) -> std::result::Result<Argon2<'_>, ::argon2::Error> {
        let argon2_params = Params::new(
            params.memory,
            params.iterations,
            params.parallelism,
            Some(params.key_length),
        )?;

        if self.secret.is_empty() {
            Ok(Argon2::new(
                Argon2Algorithm::Argon2id,
                Version::V0x13,
                argon2_params,
            ))
        } else {
            Argon2::new_with_secret(
                &self.secret,
                Argon2Algorithm::Argon2id,
                Version::V0x13,
                argon2_params,
            )
        }
    }

    fn encode_with(&self, password: &str, salt: &[u8], params: &Argon2Params) -> Result<String> {
        let mut hash = vec![0u8; params.key_length];
        self.context(params)
            .and_then(|argon2| argon2.hash_password_into(password.as_bytes(), salt, &mut hash))
            .map_err(|e| Error::hash_failed(format!("Argon2 hash failed: {}", e)))?;

        Ok(record::join(&[
            Algorithm::Argon2id.as_str(),
            &hex_encode(salt),
            &params.iterations.to_string(),
            &params.memory.to_string(),
            &params.parallelism.to_string(),
            &params.key_length.to_string(),
            &hex_encode(&hash),
        ]))
    }

    fn verify_inner(&self, password: &str, encoded: &str) -> Result<bool> {
        let info = self.decode(encoded)?;
        let Some(AlgorithmParams::Argon2(params)) = info.params else {
            return Err(Error::malformed("argon2 record without params"));
        };
        let salt = hex_decode(&info.salt)?;
        let recomputed = self.encode_with(password, &salt, &params)?;
        Ok(constant_time_compare_str(&recomputed, encoded))
    }
}

impl Hasher for Argon2Hasher {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Argon2id
    }

    fn encode(&self, password: &str) -> Result<String> {
        let salt = generate_random_bytes(self.params.salt_length)?;
        self.encode_with(password, &salt, &self.params)
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        let (algorithm, fields) = record::split_checked(encoded, FIELDS, &ACCEPTED)?;

        let salt = hex_decode(fields[1])?;
        let iterations = parse_number(fields[2], "iterations")?;
        let memory = parse_number(fields[3], "memory")?;
        let parallelism = parse_number(fields[4], "parallelism")?;
        let key_length = parse_number(fields[5], "key length")?;

        let hash = hex_decode(fields[6])?;
        if hash.len() != key_length {
            return Err(Error::malformed(format!(
                "hash is {} bytes, record declares {}",
                hash.len(),
                key_length
            )));
        }

        let params = Argon2Params {
            memory,
            iterations,
            parallelism,
            salt_length: salt.len(),
            key_length,
        };
        if let Some(message) = exceeded_limit(&params) {
            return Err(Error::malformed(message));
        }

        Ok(PasswordInfo::new(algorithm, fields[1], fields[6])
            .with_iterations(iterations)
            .with_params(AlgorithmParams::Argon2(params)))
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        swallow(Algorithm::Argon2id, "verify", self.verify_inner(password, encoded))
            .unwrap_or(false)
    }

    /// 记录中的任一参数（含 salt 长度）与当前配置不同即需要更新
    fn must_update(&self, encoded: &str) -> bool {
        let Some(info) = swallow(Algorithm::Argon2id, "must_update", self.decode(encoded)) else {
            return false;
        };

        let outdated = info.params != Some(AlgorithmParams::Argon2(self.params));
        if outdated {
            tracing::debug!(algorithm = "argon2id", "record params differ from configured params");
        }
        outdated
    }

    fn harden(&self, _password: &str, encoded: &str) -> Result<String> {
        Ok(encoded.to_string())
    }
}

impl fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("params", &self.params)
            .field("secret", &!self.secret.is_empty())
            .finish()
    }
}
