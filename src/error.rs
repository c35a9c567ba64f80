//! 统一错误类型模块
//!
//! 提供 hashrs 库中所有操作的错误类型定义。

use std::fmt;

/// hashrs 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// hashrs 库的错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 密码哈希错误（编码、解码、验证）
    PasswordHash(PasswordHashError),

    /// HasherOption 不合法
    IllegalOption(OptionError),

    /// 密码校验未通过
    Validation(ValidationError),

    /// 配置错误
    Config(ConfigError),

    /// 密码生成错误
    Generator(GeneratorError),

    /// 加密原语错误
    Crypto(CryptoError),
}

impl Error {
    /// 创建一个未知算法错误
    pub fn unknown_algorithm(algorithm: impl Into<String>) -> Self {
        Error::PasswordHash(PasswordHashError::UnknownAlgorithm(algorithm.into()))
    }

    /// 创建一个记录格式错误
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::PasswordHash(PasswordHashError::MalformedRecord(msg.into()))
    }

    /// 创建一个哈希失败错误
    pub fn hash_failed(msg: impl Into<String>) -> Self {
        Error::PasswordHash(PasswordHashError::HashFailed(msg.into()))
    }

    /// 创建一个参数错误
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Error::IllegalOption(OptionError::InvalidParams(msg.into()))
    }

    /// 是否为未知算法错误
    pub fn is_unknown_algorithm(&self) -> bool {
        matches!(
            self,
            Error::PasswordHash(PasswordHashError::UnknownAlgorithm(_))
        )
    }

    /// 是否为记录格式错误
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::PasswordHash(PasswordHashError::MalformedRecord(_))
        )
    }
}

/// 密码哈希相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordHashError {
    /// 记录的算法标识不被当前 hasher 支持
    UnknownAlgorithm(String),
    /// 字段数量不对，或者数字 / hex / base64 字段无法解析
    MalformedRecord(String),
    /// 哈希生成失败
    HashFailed(String),
    /// 密码与记录不匹配
    VerifyFailed,
}

/// HasherOption 相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// salt 中包含分隔符 `$`
    IllegalSalt,
    /// iterations 必须大于 0
    IllegalIterations,
    /// 该算法要求必须提供 salt
    BlankSalt,
    /// 算法参数无效
    InvalidParams(String),
}

/// 密码校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 密码太短
    PasswordTooShort { min_length: usize, actual: usize },
    /// 密码太长
    PasswordTooLong { max_length: usize, actual: usize },
    /// 缺少要求的字符类别
    MissingCharacterClasses(String),
    /// 常见弱密码
    CommonPassword,
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 无效的配置值
    InvalidValue { key: String, message: String },
    /// 配置无法解析
    Parse(String),
}

/// 密码生成错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// 数字、符号、大写字母的最小数量之和超过总长度
    ExceedsLength { required: usize, length: usize },
    /// 字符池为空
    EmptyPool(String),
}

/// 加密相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// 随机数生成失败
    RngFailed(String),
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PasswordHash(e) => write!(f, "Password hash error: {}", e),
            Error::IllegalOption(e) => write!(f, "Illegal hasher option: {}", e),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Generator(e) => write!(f, "Generator error: {}", e),
            Error::Crypto(e) => write!(f, "Crypto error: {}", e),
        }
    }
}

impl fmt::Display for PasswordHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordHashError::UnknownAlgorithm(alg) => write!(f, "unknown algorithm: {}", alg),
            PasswordHashError::MalformedRecord(msg) => write!(f, "malformed record: {}", msg),
            PasswordHashError::HashFailed(msg) => write!(f, "hash generation failed: {}", msg),
            PasswordHashError::VerifyFailed => write!(f, "password verification failed"),
        }
    }
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionError::IllegalSalt => write!(f, "salt cannot contain '$'"),
            OptionError::IllegalIterations => write!(f, "iterations should be greater than 0"),
            OptionError::BlankSalt => write!(f, "salt must be provided and cannot contain '$'"),
            OptionError::InvalidParams(msg) => write!(f, "invalid params: {}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::PasswordTooShort { min_length, .. } => write!(
                f,
                "this password is too short. It must contain at least {} characters",
                min_length
            ),
            ValidationError::PasswordTooLong { max_length, .. } => write!(
                f,
                "this password is too long. It must contain at most {} characters",
                max_length
            ),
            ValidationError::MissingCharacterClasses(msg) => write!(f, "{}", msg),
            ValidationError::CommonPassword => write!(f, "this password is too common"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid configuration value for '{}': {}", key, message)
            }
            ConfigError::Parse(msg) => write!(f, "failed to parse configuration: {}", msg),
        }
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::ExceedsLength { required, length } => write!(
                f,
                "number of digits, symbols and upper letters ({}) must not exceed total length ({})",
                required, length
            ),
            GeneratorError::EmptyPool(pool) => write!(f, "character pool '{}' is empty", pool),
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::RngFailed(msg) => write!(f, "random number generation failed: {}", msg),
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::PasswordHash(e) => Some(e),
            Error::IllegalOption(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Generator(e) => Some(e),
            Error::Crypto(e) => Some(e),
        }
    }
}

impl std::error::Error for PasswordHashError {}
impl std::error::Error for OptionError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for GeneratorError {}
impl std::error::Error for CryptoError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<PasswordHashError> for Error {
    fn from(err: PasswordHashError) -> Self {
        Error::PasswordHash(err)
    }
}

impl From<OptionError> for Error {
    fn from(err: OptionError) -> Self {
        Error::IllegalOption(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<GeneratorError> for Error {
    fn from(err: GeneratorError) -> Self {
        Error::Generator(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(ConfigError::Parse(err.to_string()))
    }
}
