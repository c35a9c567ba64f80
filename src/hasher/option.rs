//! Hasher 构造选项

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::SEPARATOR;
use super::{Algorithm, AlgorithmParams, PasswordHasher};
use crate::error::{OptionError, Result};

/// 构造 hasher 的配置
///
/// 只在构造时校验一次；构造完成后 hasher 不再引用它。
///
/// # Example
///
/// ```rust
/// use hashrs::{Algorithm, Hasher, HasherOption};
///
/// let option = HasherOption::new(Algorithm::Pbkdf2Sha256)
///     .with_salt("saltsaltsalt")
///     .with_iterations(10000);
/// let hasher = option.build().unwrap();
/// assert_eq!(hasher.algorithm(), Algorithm::Pbkdf2Sha256);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HasherOption {
    /// 算法标识，见 [`Algorithm`]
    pub algorithm: String,

    /// 可选的密钥；argon2 用作 secret（pepper），其它算法忽略
    pub secret: String,

    /// salt，不能包含 `$`
    pub salt: String,

    /// 迭代次数 / cost，必须大于 0
    pub iterations: u32,

    /// 算法特有参数，缺省时使用该算法的默认值
    pub params: Option<AlgorithmParams>,
}

impl HasherOption {
    /// 为指定算法创建选项，iterations 默认为 1
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm: algorithm.as_str().to_string(),
            iterations: 1,
            ..Default::default()
        }
    }

    /// 从 JSON 解析选项
    ///
    /// ```rust
    /// use hashrs::HasherOption;
    ///
    /// let option = HasherOption::from_json(
    ///     r#"{"algorithm": "sha1", "salt": "saltsaltsalt", "iterations": 1}"#,
    /// ).unwrap();
    /// assert_eq!(option.salt, "saltsaltsalt");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 设置 salt
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// 设置迭代次数 / cost
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// 设置密钥
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// 设置算法参数
    pub fn with_params(mut self, params: AlgorithmParams) -> Self {
        self.params = Some(params);
        self
    }

    /// 校验选项，返回解析后的算法
    ///
    /// - 算法必须受支持
    /// - salt 不能包含 `$`
    /// - iterations 必须大于 0
    pub fn validate(&self) -> Result<Algorithm> {
        let algorithm = self.algorithm.parse::<Algorithm>()?;

        if self.salt.contains(SEPARATOR) {
            return Err(OptionError::IllegalSalt.into());
        }

        if self.iterations == 0 {
            return Err(OptionError::IllegalIterations.into());
        }

        Ok(algorithm)
    }

    /// 校验并构造 hasher
    pub fn build(self) -> Result<PasswordHasher> {
        PasswordHasher::new(self)
    }
}

impl fmt::Debug for HasherOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasherOption")
            .field("algorithm", &self.algorithm)
            .field("secret", &if self.secret.is_empty() { "" } else { "<redacted>" })
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .field("params", &self.params)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_validate() {
        let mut option = HasherOption {
            algorithm: "non-algo".to_string(),
            ..Default::default()
        };
        assert!(option.validate().unwrap_err().is_unknown_algorithm());

        option.algorithm = "md5".to_string();
        option.salt = "ad$dfd".to_string();
        assert_eq!(
            option.validate().unwrap_err(),
            Error::IllegalOption(OptionError::IllegalSalt)
        );

        option.salt = "adfedfd".to_string();
        assert_eq!(
            option.validate().unwrap_err(),
            Error::IllegalOption(OptionError::IllegalIterations)
        );

        option.iterations = 1;
        assert_eq!(option.validate().unwrap(), Algorithm::Md5);
    }

    #[test]
    fn test_new_defaults() {
        let option = HasherOption::new(Algorithm::Scrypt);
        assert_eq!(option.algorithm, "scrypt");
        assert_eq!(option.iterations, 1);
        assert!(option.salt.is_empty());
        assert!(option.params.is_none());
    }

    #[test]
    fn test_from_json() {
        let option = HasherOption::from_json(
            r#"{
                "algorithm": "argon2id",
                "iterations": 1,
                "params": {"type": "argon2", "memory": 1024, "parallelism": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(option.validate().unwrap(), Algorithm::Argon2id);
        assert!(matches!(option.params, Some(AlgorithmParams::Argon2(p)) if p.memory == 1024));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = HasherOption::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let option = HasherOption::new(Algorithm::Argon2id).with_secret("pepper");
        let debug = format!("{:?}", option);
        assert!(!debug.contains("pepper"));
        assert!(debug.contains("<redacted>"));
    }
}
