//! 密码校验模块
//!
//! 按长度、字符类别和常见密码黑名单检查明文密码。

use std::collections::HashSet;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result, ValidationError};

/// 允许配置的最大密码长度
pub const MAX_PASSWORD_LENGTH: u8 = 32;

/// 校验器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorOption {
    /// 最小长度（字节），必须大于 0 且不大于 `max_length`
    pub min_length: u8,
    /// 最大长度（字节），不能超过 [`MAX_PASSWORD_LENGTH`]
    pub max_length: u8,
    /// 常见密码黑名单，比较时忽略大小写
    pub common_passwords: Vec<String>,
    /// 是否要求数字
    pub require_digit: bool,
    /// 是否要求小写字母
    pub require_lowercase: bool,
    /// 是否要求大写字母
    pub require_uppercase: bool,
    /// 是否要求字母（大小写均可）
    pub require_letter: bool,
    /// 是否要求标点
    pub require_punctuation: bool,
}

impl Default for ValidatorOption {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: MAX_PASSWORD_LENGTH,
            common_passwords: Vec::new(),
            require_digit: false,
            require_lowercase: false,
            require_uppercase: false,
            require_letter: false,
            require_punctuation: false,
        }
    }
}

impl ValidatorOption {
    /// 从 JSON 解析配置
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 设置长度范围
    pub fn with_length(mut self, min_length: u8, max_length: u8) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// 设置是否要求数字
    pub fn with_digit(mut self, required: bool) -> Self {
        self.require_digit = required;
        self
    }

    /// 设置是否要求小写字母
    pub fn with_lowercase(mut self, required: bool) -> Self {
        self.require_lowercase = required;
        self
    }

    /// 设置是否要求大写字母
    pub fn with_uppercase(mut self, required: bool) -> Self {
        self.require_uppercase = required;
        self
    }

    /// 设置是否要求字母
    pub fn with_letter(mut self, required: bool) -> Self {
        self.require_letter = required;
        self
    }

    /// 设置是否要求标点
    pub fn with_punctuation(mut self, required: bool) -> Self {
        self.require_punctuation = required;
        self
    }

    /// 追加黑名单
    pub fn with_common_passwords<I, S>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_passwords
            .extend(passwords.into_iter().map(Into::into));
        self
    }

    /// 从按行分隔的文本中加载黑名单
    ///
    /// # Example
    ///
    /// ```rust
    /// use hashrs::password::ValidatorOption;
    ///
    /// let mut option = ValidatorOption::default();
    /// option.load_common_passwords("password\nqwerty\n".as_bytes()).unwrap();
    /// assert_eq!(option.common_passwords.len(), 2);
    /// ```
    pub fn load_common_passwords<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            let line = line.map_err(|e| {
                Error::Config(ConfigError::InvalidValue {
                    key: "common_passwords".to_string(),
                    message: e.to_string(),
                })
            })?;
            let line = line.trim();
            if !line.is_empty() {
                self.common_passwords.push(line.to_string());
            }
        }
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.min_length == 0 {
            return Err(invalid("min_length", "min_length should be more than 0"));
        }

        if self.max_length > MAX_PASSWORD_LENGTH {
            return Err(invalid(
                "max_length",
                format!("max_length should be less than {}", MAX_PASSWORD_LENGTH),
            ));
        }

        if self.min_length > self.max_length {
            return Err(invalid(
                "min_length",
                "min_length should be less than max_length",
            ));
        }

        Ok(())
    }
}

fn invalid(key: &str, message: impl Into<String>) -> Error {
    Error::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    })
}

/// 密码校验器
///
/// # Example
///
/// ```rust
/// use hashrs::password::{Validator, ValidatorOption};
///
/// let option = ValidatorOption::default()
///     .with_length(8, 32)
///     .with_digit(true)
///     .with_common_passwords(["password1"]);
/// let validator = Validator::new(option).unwrap();
///
/// assert!(validator.validate("correct horse 1").is_ok());
/// assert!(validator.validate("short1").is_err());
/// assert!(validator.validate("Password1").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    option: ValidatorOption,
    common_passwords: HashSet<String>,
}

impl Validator {
    /// 校验配置并创建校验器
    pub fn new(option: ValidatorOption) -> Result<Self> {
        option.check()?;

        let common_passwords = option
            .common_passwords
            .iter()
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            option,
            common_passwords,
        })
    }

    /// 当前配置
    pub fn option(&self) -> &ValidatorOption {
        &self.option
    }

    /// 校验密码
    ///
    /// 依次检查长度、字符类别、黑名单，返回第一个不满足的条件。
    pub fn validate(&self, password: &str) -> Result<()> {
        self.validate_length(password.len())?;

        let features = CharacterClasses::of(password);
        let option = &self.option;
        let missing = (option.require_digit && !features.digit)
            || (option.require_lowercase && !features.lowercase)
            || (option.require_uppercase && !features.uppercase)
            || (option.require_punctuation && !features.punctuation)
            || (option.require_letter && !features.lowercase && !features.uppercase);
        if missing {
            return Err(ValidationError::MissingCharacterClasses(self.requirement_message()).into());
        }

        if self.common_passwords.contains(&password.to_lowercase()) {
            return Err(ValidationError::CommonPassword.into());
        }

        Ok(())
    }

    fn validate_length(&self, length: usize) -> Result<()> {
        let min_length = usize::from(self.option.min_length);
        let max_length = usize::from(self.option.max_length);

        if length < min_length {
            return Err(ValidationError::PasswordTooShort {
                min_length,
                actual: length,
            }
            .into());
        }

        if length > max_length {
            return Err(ValidationError::PasswordTooLong {
                max_length,
                actual: length,
            }
            .into());
        }

        Ok(())
    }

    /// 列出所有要求的字符类别
    fn requirement_message(&self) -> String {
        let option = &self.option;
        let mut parts = Vec::new();

        if option.require_digit {
            parts.push("digits");
        }

        if option.require_lowercase && option.require_uppercase {
            parts.push("upper and lower letters");
        } else if option.require_lowercase {
            parts.push("lower letters");
        } else if option.require_uppercase {
            parts.push("upper letters");
        } else if option.require_letter {
            parts.push("upper or lower letters");
        }

        if option.require_punctuation {
            parts.push("punctuations");
        }

        format!("The password should contain {}", parts.join(", "))
    }
}

/// 密码中出现的字符类别
#[derive(Debug, Default)]
struct CharacterClasses {
    digit: bool,
    lowercase: bool,
    uppercase: bool,
    punctuation: bool,
}

impl CharacterClasses {
    fn of(password: &str) -> Self {
        let mut classes = Self::default();
        for c in password.chars() {
            classes.digit |= c.is_ascii_digit();
            classes.lowercase |= c.is_lowercase();
            classes.uppercase |= c.is_uppercase();
            classes.punctuation |= c.is_ascii_punctuation();
        }
        classes
    }
}
