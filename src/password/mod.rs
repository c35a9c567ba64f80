//! 密码策略模块
//!
//! 与哈希无关的明文密码工具：
//!
//! - **校验**: 长度、字符类别、常见密码黑名单
//! - **生成**: 满足最少数字、符号、大写字母数量的随机密码
//!
//! ## 示例
//!
//! ```rust
//! use hashrs::password::{Generator, Validator, ValidatorOption};
//!
//! let validator = Validator::new(
//!     ValidatorOption::default()
//!         .with_digit(true)
//!         .with_uppercase(true)
//!         .with_punctuation(true),
//! )
//! .unwrap();
//!
//! let password = Generator::default().generate(16, 2, 2, 2).unwrap();
//! assert!(validator.validate(&password).is_ok());
//! ```

pub mod generator;
pub mod validator;

pub use generator::{Generator, GeneratorConfig};
pub use validator::{MAX_PASSWORD_LENGTH, Validator, ValidatorOption};
