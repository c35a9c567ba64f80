//! salt 熵估算

/// 假设 salt 取自的字符池（大小写字母 + 数字，共 62 个）
pub const RANDOM_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// salt 的目标熵（bit）
///
/// 从 62 字符池均匀抽取时，至少需要 11 个字符。
pub const SALT_ENTROPY: u32 = 64;

/// 估算 salt 能提供的熵：`len(salt) * log2(62)`
pub fn estimate_salt_entropy(salt: &str) -> f64 {
    let pool = RANDOM_CHARS.len() as f64;
    salt.len() as f64 * pool.log2()
}

/// salt 的估算熵严格小于 `entropy` 时返回 true，即需要升级
///
/// 这是近似值：不管 salt 实际如何生成，都按均匀抽取估算。
pub fn must_update_salt(salt: &str, entropy: u32) -> bool {
    estimate_salt_entropy(salt) < f64::from(entropy)
}
