//! 支持的算法标识

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 记录第一个字段允许出现的算法标识
///
/// 集合是封闭的：未知标识一律拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Argon2id - 推荐的默认算法
    Argon2id,
    /// bcrypt
    Bcrypt,
    /// 先做 SHA-256 再 bcrypt，绕过 bcrypt 72 字节截断
    BcryptSha256,
    /// 加盐 MD5（仅用于兼容旧数据）
    Md5,
    /// 不加盐 MD5（仅用于兼容旧数据）
    UnsaltedMd5,
    /// PBKDF2-HMAC-SHA1
    Pbkdf2Sha1,
    /// PBKDF2-HMAC-SHA256
    Pbkdf2Sha256,
    /// scrypt
    Scrypt,
    /// 加盐 SHA1（仅用于兼容旧数据）
    Sha1,
}

impl Algorithm {
    /// 全部支持的算法
    pub const ALL: [Algorithm; 9] = [
        Algorithm::Argon2id,
        Algorithm::Bcrypt,
        Algorithm::BcryptSha256,
        Algorithm::Md5,
        Algorithm::UnsaltedMd5,
        Algorithm::Pbkdf2Sha1,
        Algorithm::Pbkdf2Sha256,
        Algorithm::Scrypt,
        Algorithm::Sha1,
    ];

    /// 记录中使用的标识字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Argon2id => "argon2id",
            Algorithm::Bcrypt => "bcrypt",
            Algorithm::BcryptSha256 => "bcrypt_sha256",
            Algorithm::Md5 => "md5",
            Algorithm::UnsaltedMd5 => "unsalted_md5",
            Algorithm::Pbkdf2Sha1 => "pbkdf2_sha1",
            Algorithm::Pbkdf2Sha256 => "pbkdf2_sha256",
            Algorithm::Scrypt => "scrypt",
            Algorithm::Sha1 => "sha1",
        }
    }

    /// 该算法是否已被认为不安全
    pub fn is_broken(&self) -> bool {
        matches!(
            self,
            Algorithm::Md5 | Algorithm::UnsaltedMd5 | Algorithm::Sha1
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == s)
            .ok_or_else(|| Error::unknown_algorithm(s))
    }
}
