//! 编码记录语法
//!
//! 记录由 `$` 连接的若干文本字段组成，第 0 个字段总是算法标识，其余字段的数量和顺序由算法决定。
//! 解析时按照算法的字段数做有界切分，最后一个字段（通常是 hash）中出现的 `$` 会被原样保留。

use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};

use super::Algorithm;
use crate::error::{Error, Result};

/// 字段分隔符
pub const SEPARATOR: char = '$';

const SEPARATOR_STR: &str = "$";

/// 按顺序用分隔符连接字段
pub(crate) fn join(fields: &[&str]) -> String {
    fields.join(SEPARATOR_STR)
}

/// 将记录切分为恰好 `count` 个字段
///
/// 至多切分 `count` 次，字段不足时返回 `MalformedRecord`。
pub(crate) fn split(encoded: &str, count: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = encoded.splitn(count, SEPARATOR).collect();
    if fields.len() != count {
        return Err(Error::malformed(format!(
            "expected {} fields, found {}",
            count,
            fields.len()
        )));
    }
    Ok(fields)
}

/// 切分记录并检查算法标识
///
/// 标识不在 `accepted` 中时返回 `UnknownAlgorithm`；标识检查先于字段数检查。
pub(crate) fn split_checked<'a>(
    encoded: &'a str,
    count: usize,
    accepted: &[Algorithm],
) -> Result<(Algorithm, Vec<&'a str>)> {
    let identifier = encoded.split(SEPARATOR).next().unwrap_or_default();
    let algorithm = accepted
        .iter()
        .copied()
        .find(|algorithm| algorithm.as_str() == identifier)
        .ok_or_else(|| Error::unknown_algorithm(identifier))?;

    let fields = split(encoded, count)?;
    Ok((algorithm, fields))
}

/// 解析非负整数字段
pub(crate) fn parse_number<T: FromStr>(field: &str, name: &str) -> Result<T> {
    // FromStr 对无符号整数接受前导 '+'，记录里不允许
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::malformed(format!(
            "{} is not a non-negative integer: {:?}",
            name, field
        )));
    }
    field
        .parse()
        .map_err(|_| Error::malformed(format!("{} is out of range: {:?}", name, field)))
}

/// 标准 base64 编码（带填充）
pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 校验 base64 字段
pub(crate) fn decode_base64(field: &str, name: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(field)
        .map_err(|e| Error::malformed(format!("{} is not valid base64: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join(&["md5", "salt", "abcd"]), "md5$salt$abcd");
        assert_eq!(join(&["unsalted_md5", "", "abcd"]), "unsalted_md5$$abcd");
    }

    #[test]
    fn test_split_keeps_separator_in_last_field() {
        let fields = split("bcrypt$$2b$04$abcdef", 2).unwrap();
        assert_eq!(fields, vec!["bcrypt", "$2b$04$abcdef"]);
    }

    #[test]
    fn test_split_too_few_fields() {
        let err = split("md5$salt", 3).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_split_checked_rejects_unknown_identifier() {
        let err = split_checked("aamd5$salt$abcd", 3, &[Algorithm::Md5]).unwrap_err();
        assert!(err.is_unknown_algorithm());

        // 标识正确但字段不足
        let err = split_checked("md5$salt", 3, &[Algorithm::Md5]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_split_checked_accepts_variants() {
        let accepted = [Algorithm::Md5, Algorithm::UnsaltedMd5];
        let (algorithm, fields) = split_checked("unsalted_md5$$ff", 3, &accepted).unwrap();
        assert_eq!(algorithm, Algorithm::UnsaltedMd5);
        assert_eq!(fields[1], "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>("10000", "iterations").unwrap(), 10000);
        assert!(parse_number::<u32>("er", "iterations").unwrap_err().is_malformed());
        assert!(parse_number::<u32>("-1", "iterations").is_err());
        assert!(parse_number::<u32>("+1", "iterations").is_err());
        assert!(parse_number::<u32>("", "iterations").is_err());
        assert!(parse_number::<u8>("256", "parallelism").is_err());
    }

    #[test]
    fn test_base64() {
        let encoded = encode_base64(b"derived key");
        assert_eq!(decode_base64(&encoded, "hash").unwrap(), b"derived key");
        assert!(decode_base64("not base64!", "hash").unwrap_err().is_malformed());
    }
}
