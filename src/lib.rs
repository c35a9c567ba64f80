//! # HashRS
//!
//! 多算法密码哈希库。
//!
//! ## 功能特性
//!
//! - **统一接口**: 所有算法族实现同一个 [`Hasher`] trait（编码、解码、验证、是否需要更新、加强）
//! - **多种算法**: argon2id、bcrypt、bcrypt_sha256、md5、unsalted_md5、pbkdf2_sha1、pbkdf2_sha256、scrypt、sha1
//! - **自描述记录**: 以 `$` 分隔的文本记录，第一个字段为算法标识
//! - **升级判断**: 根据迭代次数、参数和 salt 熵判断旧记录是否需要重新编码
//! - **密码策略**: 明文密码校验和随机密码生成
//!
//! ## 密码哈希示例
//!
//! ```rust
//! use hashrs::{Algorithm, Hasher, HasherOption};
//!
//! let hasher = HasherOption::new(Algorithm::Pbkdf2Sha256)
//!     .with_salt("saltsaltsalt")
//!     .with_iterations(10000)
//!     .build()
//!     .unwrap();
//!
//! let encoded = hasher.encode("1qasw23ed").unwrap();
//! assert!(hasher.verify("1qasw23ed", &encoded));
//! assert!(!hasher.must_update(&encoded));
//! ```
//!
//! ## 从 JSON 配置构造
//!
//! ```rust
//! use hashrs::{Hasher, HasherOption, new_hasher};
//!
//! let option = HasherOption::from_json(
//!     r#"{"algorithm": "sha1", "salt": "saltsaltsalt", "iterations": 1}"#,
//! )
//! .unwrap();
//! let hasher = new_hasher(option).unwrap();
//! assert!(hasher.encode("password").unwrap().starts_with("sha1$saltsaltsalt$"));
//! ```
//!
//! ## 升级旧记录
//!
//! ```rust
//! use hashrs::{Algorithm, Hasher, HasherOption};
//!
//! let old = HasherOption::new(Algorithm::Pbkdf2Sha256)
//!     .with_salt("saltsaltsalt")
//!     .with_iterations(100)
//!     .build()
//!     .unwrap();
//! let current = HasherOption::new(Algorithm::Pbkdf2Sha256)
//!     .with_salt("saltsaltsalt")
//!     .with_iterations(1000)
//!     .build()
//!     .unwrap();
//!
//! let encoded = old.encode("password").unwrap();
//! assert!(current.must_update(&encoded));
//!
//! let hardened = current.harden("password", &encoded).unwrap();
//! assert!(!current.must_update(&hardened));
//! ```
//!
//! ## 密码策略
//!
//! ```rust
//! use hashrs::{Generator, Validator, ValidatorOption};
//!
//! let validator = Validator::new(ValidatorOption::default().with_digit(true)).unwrap();
//! assert!(validator.validate("no digits here").is_err());
//!
//! let password = Generator::default().generate(12, 2, 1, 1).unwrap();
//! assert!(validator.validate(&password).is_ok());
//! ```

pub mod error;
pub mod hasher;
pub mod password;
pub mod random;

pub use error::{Error, Result};

// ============================================================================
// 哈希相关导出
// ============================================================================

pub use hasher::{
    Algorithm, AlgorithmParams, Argon2Hasher, Argon2Params, BcryptHasher, Hasher, HasherOption,
    Md5Hasher, PasswordHasher, PasswordInfo, Pbkdf2Hasher, ScryptHasher, ScryptParams, Sha1Hasher,
    new_hasher,
};

// ============================================================================
// 密码策略导出
// ============================================================================

pub use password::{Generator, GeneratorConfig, Validator, ValidatorOption};

// ============================================================================
// 随机数生成函数导出
// ============================================================================

pub use random::{
    constant_time_compare, constant_time_compare_str, generate_random_bytes, generate_salt,
    hex_decode, hex_encode,
};
