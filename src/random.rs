//! 安全随机数生成模块
//!
//! 提供密码学安全的随机字节与 salt 生成，以及记录编码会用到的 hex 编解码和常量时间比较。

use rand::{Rng, TryRngCore, distr::Alphanumeric, rngs::OsRng};

use crate::error::{CryptoError, Error, Result};

/// 生成指定长度的随机字节数组
///
/// 使用操作系统提供的密码学安全随机数生成器 (CSPRNG)，可以被多个线程同时调用。
///
/// # Arguments
///
/// * `length` - 要生成的字节数
///
/// # Example
///
/// ```rust
/// use hashrs::random::generate_random_bytes;
///
/// let bytes = generate_random_bytes(16).unwrap();
/// assert_eq!(bytes.len(), 16);
/// ```
pub fn generate_random_bytes(length: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::Crypto(CryptoError::RngFailed(format!("{:?}", e))))?;
    Ok(bytes)
}

/// 生成字母数字组成的随机 salt
///
/// 字符取自 a-z, A-Z, 0-9，与 salt 熵估算假设的字符池一致，且永远不会包含 `$`。
///
/// # Example
///
/// ```rust
/// use hashrs::random::generate_salt;
///
/// let salt = generate_salt(22);
/// assert_eq!(salt.len(), 22);
/// assert!(salt.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_salt(length: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

// ============================================================================
// 辅助函数
// ============================================================================

/// 将字节数组编码为小写十六进制字符串
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 解码十六进制字符串
///
/// 大小写均可；长度为奇数或包含非十六进制字符时返回 `MalformedRecord`。
pub fn hex_decode(input: &str) -> Result<Vec<u8>> {
    if input.len() % 2 != 0 {
        return Err(Error::malformed(format!(
            "hex field has odd length {}",
            input.len()
        )));
    }

    input
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0])?;
            let lo = hex_value(pair[1])?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

fn hex_value(c: u8) -> Result<u8> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(Error::malformed(format!(
            "invalid hex character {:?}",
            c as char
        ))),
    }
}

/// 常量时间比较两个字节切片
///
/// 用于防止时序攻击
///
/// # Example
///
/// ```rust
/// use hashrs::random::constant_time_compare;
///
/// assert!(constant_time_compare(b"secret_token", b"secret_token"));
/// assert!(!constant_time_compare(b"secret_token", b"other_token!"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

/// 常量时间比较两个字符串
pub fn constant_time_compare_str(a: &str, b: &str) -> bool {
    constant_time_compare(a.as_bytes(), b.as_bytes())
}
