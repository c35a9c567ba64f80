//! 密码哈希模块
//!
//! 每种算法族都实现统一的 [`Hasher`] 接口，输出以 `$` 分隔、自描述的文本记录：
//!
//! | 算法 | 标识之后的字段 |
//! |---|---|
//! | argon2id | salt(hex), iterations, memory, parallelism, keyLength, hash(hex) |
//! | bcrypt / bcrypt_sha256 | bcrypt 自带格式的字符串（内含 cost 和 salt） |
//! | md5 / unsalted_md5 | salt, hash(hex) |
//! | sha1 | salt, hash(hex) |
//! | scrypt | workFactor, salt, blockSize, parallelism, hash(base64) |
//! | pbkdf2_sha1 / pbkdf2_sha256 | iterations, salt, hash(base64) |
//!
//! ## 示例
//!
//! ```rust
//! use hashrs::{Algorithm, Hasher, HasherOption};
//!
//! let hasher = HasherOption::new(Algorithm::Pbkdf2Sha256)
//!     .with_salt("saltsaltsalt")
//!     .with_iterations(1000)
//!     .build()
//!     .unwrap();
//!
//! let encoded = hasher.encode("my_password").unwrap();
//! assert!(encoded.starts_with("pbkdf2_sha256$1000$saltsaltsalt$"));
//! assert!(hasher.verify("my_password", &encoded));
//! assert!(!hasher.verify("wrong_password", &encoded));
//! ```

mod algorithm;
mod argon2;
mod bcrypt;
pub mod entropy;
mod info;
mod md5;
mod option;
mod params;
mod pbkdf2;
pub mod record;
mod scrypt;
mod sha1;

pub use self::algorithm::Algorithm;
pub use self::argon2::Argon2Hasher;
pub use self::bcrypt::BcryptHasher;
pub use self::info::PasswordInfo;
pub use self::md5::Md5Hasher;
pub use self::option::HasherOption;
pub use self::params::{AlgorithmParams, Argon2Params, ScryptParams};
pub use self::pbkdf2::Pbkdf2Hasher;
pub use self::scrypt::ScryptHasher;
pub use self::sha1::Sha1Hasher;

use crate::error::Result;

/// 所有算法族共同实现的接口
///
/// 实现不在调用之间保存任何口令或 hash 状态，可以在多个线程中并发调用。
pub trait Hasher: Send + Sync {
    /// 新记录使用的算法标识
    fn algorithm(&self) -> Algorithm;

    /// 使用当前配置编码密码
    fn encode(&self, password: &str) -> Result<String>;

    /// 解码记录
    ///
    /// 标识不属于该 hasher 时返回 `UnknownAlgorithm`，字段数量或格式不对时返回 `MalformedRecord`。
    fn decode(&self, encoded: &str) -> Result<PasswordInfo>;

    /// 验证密码
    ///
    /// 记录无法解码和密码错误一样都返回 false。
    fn verify(&self, password: &str, encoded: &str) -> bool;

    /// 记录是否需要用当前配置重新编码；无法解码时返回 false
    fn must_update(&self, encoded: &str) -> bool;

    /// 在不需要原始参数的情况下加强记录；不支持的算法原样返回
    fn harden(&self, password: &str, encoded: &str) -> Result<String>;
}

/// 按算法族分派的 hasher
///
/// # Example
///
/// ```rust
/// use hashrs::{Algorithm, Hasher, HasherOption, PasswordHasher};
///
/// let option = HasherOption::new(Algorithm::Sha1).with_salt("saltsaltsalt");
/// let hasher = PasswordHasher::new(option).unwrap();
/// assert!(matches!(hasher, PasswordHasher::Sha1(_)));
/// ```
#[derive(Debug, Clone)]
pub enum PasswordHasher {
    /// argon2id
    Argon2(Argon2Hasher),
    /// bcrypt / bcrypt_sha256
    Bcrypt(BcryptHasher),
    /// md5 / unsalted_md5
    Md5(Md5Hasher),
    /// sha1
    Sha1(Sha1Hasher),
    /// scrypt
    Scrypt(ScryptHasher),
    /// pbkdf2_sha1 / pbkdf2_sha256
    Pbkdf2(Pbkdf2Hasher),
}

impl PasswordHasher {
    /// 校验选项并构造对应算法的 hasher
    pub fn new(option: HasherOption) -> Result<Self> {
        let algorithm = option.validate()?;

        if algorithm.is_broken() {
            tracing::warn!(%algorithm, "constructing hasher for a broken algorithm");
        }

        let hasher = match algorithm {
            Algorithm::Argon2id => PasswordHasher::Argon2(Argon2Hasher::new(&option)?),
            Algorithm::Bcrypt | Algorithm::BcryptSha256 => {
                PasswordHasher::Bcrypt(BcryptHasher::new(algorithm, &option)?)
            }
            Algorithm::Md5 | Algorithm::UnsaltedMd5 => {
                PasswordHasher::Md5(Md5Hasher::new(&option))
            }
            Algorithm::Sha1 => PasswordHasher::Sha1(Sha1Hasher::new(&option)?),
            Algorithm::Scrypt => PasswordHasher::Scrypt(ScryptHasher::new(&option)?),
            Algorithm::Pbkdf2Sha1 | Algorithm::Pbkdf2Sha256 => {
                PasswordHasher::Pbkdf2(Pbkdf2Hasher::new(algorithm, &option)?)
            }
        };

        Ok(hasher)
    }

    fn inner(&self) -> &dyn Hasher {
        match self {
            PasswordHasher::Argon2(h) => h,
            PasswordHasher::Bcrypt(h) => h,
            PasswordHasher::Md5(h) => h,
            PasswordHasher::Sha1(h) => h,
            PasswordHasher::Scrypt(h) => h,
            PasswordHasher::Pbkdf2(h) => h,
        }
    }
}

impl Hasher for PasswordHasher {
    fn algorithm(&self) -> Algorithm {
        self.inner().algorithm()
    }

    fn encode(&self, password: &str) -> Result<String> {
        self.inner().encode(password)
    }

    fn decode(&self, encoded: &str) -> Result<PasswordInfo> {
        self.inner().decode(encoded)
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        self.inner().verify(password, encoded)
    }

    fn must_update(&self, encoded: &str) -> bool {
        self.inner().must_update(encoded)
    }

    fn harden(&self, password: &str, encoded: &str) -> Result<String> {
        self.inner().harden(password, encoded)
    }
}

// ============================================================================
// 便捷函数
// ============================================================================

/// 校验选项并构造 hasher，等同于 [`PasswordHasher::new`]
pub fn new_hasher(option: HasherOption) -> Result<PasswordHasher> {
    PasswordHasher::new(option)
}

/// 记录解码失败时的统一日志，返回值用于 `verify` / `must_update`
pub(crate) fn swallow<T>(algorithm: Algorithm, operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(%algorithm, operation, error = %e, "record rejected");
            None
        }
    }
}
