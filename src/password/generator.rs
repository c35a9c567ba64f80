//! 随机密码生成模块
//!
//! 从小写字母、大写字母、数字和符号四个字符池中抽取字符，
//! 先满足数字、符号、大写字母的最小数量，其余从全部字符中抽取，最后打乱顺序。

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// 默认小写字母池
pub const LOWER_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
/// 默认大写字母池
pub const UPPER_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// 默认数字池
pub const DIGITS: &str = "0123456789";
/// 默认符号池
pub const SYMBOLS: &str = "~!@#$%^&*()_+`-={}|[]\\:\"<>?,./";

/// 生成器的字符池配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub lower_letters: String,
    pub upper_letters: String,
    pub digits: String,
    pub symbols: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            lower_letters: LOWER_LETTERS.to_string(),
            upper_letters: UPPER_LETTERS.to_string(),
            digits: DIGITS.to_string(),
            symbols: SYMBOLS.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// 从 JSON 解析配置，缺省字段使用默认字符池
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 随机密码生成器
///
/// # Example
///
/// ```rust
/// use hashrs::password::Generator;
///
/// let generator = Generator::default();
/// let password = generator.generate(16, 2, 2, 2).unwrap();
/// assert_eq!(password.chars().count(), 16);
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    upper_letters: Vec<char>,
    digits: Vec<char>,
    symbols: Vec<char>,
    all: Vec<char>,
}

impl Default for Generator {
    fn default() -> Self {
        let config = GeneratorConfig::default();
        Self::from_pools(
            config.lower_letters.chars().collect(),
            config.upper_letters.chars().collect(),
            config.digits.chars().collect(),
            config.symbols.chars().collect(),
        )
    }
}

impl Generator {
    /// 使用给定字符池创建生成器，任何一个池为空都返回 `EmptyPool`
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let pools = [
            ("lower_letters", &config.lower_letters),
            ("upper_letters", &config.upper_letters),
            ("digits", &config.digits),
            ("symbols", &config.symbols),
        ];
        for (name, pool) in pools {
            if pool.is_empty() {
                return Err(GeneratorError::EmptyPool(name.to_string()).into());
            }
        }

        Ok(Self::from_pools(
            config.lower_letters.chars().collect(),
            config.upper_letters.chars().collect(),
            config.digits.chars().collect(),
            config.symbols.chars().collect(),
        ))
    }

    fn from_pools(
        lower_letters: Vec<char>,
        upper_letters: Vec<char>,
        digits: Vec<char>,
        symbols: Vec<char>,
    ) -> Self {
        let all = [&lower_letters, &upper_letters, &digits, &symbols]
            .into_iter()
            .flatten()
            .copied()
            .collect();

        Self {
            upper_letters,
            digits,
            symbols,
            all,
        }
    }

    /// 使用线程本地的安全随机数生成密码
    ///
    /// # Arguments
    ///
    /// * `length` - 密码总字符数
    /// * `min_digits` - 最少数字个数
    /// * `min_symbols` - 最少符号个数
    /// * `min_upper` - 最少大写字母个数
    pub fn generate(
        &self,
        length: usize,
        min_digits: usize,
        min_symbols: usize,
        min_upper: usize,
    ) -> Result<String> {
        self.generate_with_rng(&mut rand::rng(), length, min_digits, min_symbols, min_upper)
    }

    /// 使用指定随机源生成密码
    ///
    /// 其余位置从所有字符池的并集抽取，最后整体打乱。
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
        min_digits: usize,
        min_symbols: usize,
        min_upper: usize,
    ) -> Result<String> {
        let required = min_digits
            .saturating_add(min_symbols)
            .saturating_add(min_upper);
        if required > length {
            return Err(GeneratorError::ExceedsLength { required, length }.into());
        }

        let mut password = Vec::with_capacity(length);
        let draws = [
            (&self.digits, min_digits),
            (&self.symbols, min_symbols),
            (&self.upper_letters, min_upper),
            (&self.all, length - required),
        ];
        for (pool, count) in draws {
            password.extend((0..count).map(|_| pick(rng, pool)));
        }

        password.shuffle(rng);
        Ok(password.into_iter().collect())
    }

    /// 所有字符池的并集
    pub fn alphabet(&self) -> &[char] {
        &self.all
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[char]) -> char {
    pool[rng.random_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn count_in(password: &str, pool: &str) -> usize {
        password.chars().filter(|c| pool.contains(*c)).count()
    }

    #[test]
    fn test_generate_counts() {
        let generator = Generator::default();
        let password = generator.generate(20, 3, 4, 5).unwrap();

        assert_eq!(password.chars().count(), 20);
        assert!(count_in(&password, DIGITS) >= 3);
        assert!(count_in(&password, SYMBOLS) >= 4);
        assert!(count_in(&password, UPPER_LETTERS) >= 5);
    }

    #[test]
    fn test_exact_fill() {
        let generator = Generator::default();
        let password = generator.generate(6, 2, 2, 2).unwrap();
        assert_eq!(count_in(&password, LOWER_LETTERS), 0);
        assert_eq!(count_in(&password, DIGITS), 2);
        assert_eq!(count_in(&password, SYMBOLS), 2);
        assert_eq!(count_in(&password, UPPER_LETTERS), 2);
    }

    #[test]
    fn test_exceeds_length() {
        let generator = Generator::default();
        let err = generator.generate(5, 2, 2, 2).unwrap_err();
        assert_eq!(
            err,
            Error::Generator(GeneratorError::ExceedsLength {
                required: 6,
                length: 5
            })
        );
    }

    #[test]
    fn test_empty_pool() {
        let config = GeneratorConfig {
            symbols: String::new(),
            ..GeneratorConfig::default()
        };
        let err = Generator::new(config).unwrap_err();
        assert_eq!(
            err,
            Error::Generator(GeneratorError::EmptyPool("symbols".to_string()))
        );
    }

    #[test]
    fn test_custom_pools() {
        let config = GeneratorConfig {
            lower_letters: "a".to_string(),
            upper_letters: "B".to_string(),
            digits: "7".to_string(),
            symbols: "#".to_string(),
        };
        let generator = Generator::new(config).unwrap();
        let password = generator.generate(8, 1, 1, 1).unwrap();

        assert_eq!(password.chars().count(), 8);
        assert!(password.chars().all(|c| "aB7#".contains(c)));
        assert!(password.contains('7') && password.contains('#') && password.contains('B'));
        assert_eq!(generator.alphabet(), &['a', 'B', '7', '#']);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let generator = Generator::default();
        let a = generator
            .generate_with_rng(&mut StdRng::seed_from_u64(7), 24, 4, 4, 4)
            .unwrap();
        let b = generator
            .generate_with_rng(&mut StdRng::seed_from_u64(7), 24, 4, 4, 4)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(Generator::default().generate(0, 0, 0, 0).unwrap(), "");
    }

    #[test]
    fn test_from_json() {
        let config = GeneratorConfig::from_json(r#"{"symbols": "!?"}"#).unwrap();
        assert_eq!(config.symbols, "!?");
        assert_eq!(config.digits, DIGITS);
    }
}
