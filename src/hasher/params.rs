//! 算法参数类型

use serde::{Deserialize, Serialize};

/// Argon2id 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argon2Params {
    /// 内存开销（KiB）
    pub memory: u32,
    /// 迭代次数（time cost）
    pub iterations: u32,
    /// 并行度
    pub parallelism: u32,
    /// 随机 salt 的字节数，至少 8
    pub salt_length: usize,
    /// 输出 hash 的字节数
    pub key_length: usize,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory: 64 * 1024,
            iterations: 1,
            parallelism: 4,
            salt_length: 16,
            key_length: 32,
        }
    }
}

impl Argon2Params {
    /// 设置内存开销（KiB）
    pub fn with_memory(mut self, memory: u32) -> Self {
        self.memory = memory;
        self
    }

    /// 设置迭代次数
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// 设置并行度
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// 设置 salt 字节数
    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    /// 设置输出字节数
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }
}

/// scrypt 参数
///
/// hasher 使用固定值，这里只用于承载从记录中解码出的参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// N，必须是 2 的幂
    pub work_factor: u64,
    /// r
    pub block_size: u32,
    /// p
    pub parallelism: u32,
}

/// 按算法族区分的参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlgorithmParams {
    /// Argon2id 参数
    Argon2(Argon2Params),
    /// scrypt 参数
    Scrypt(ScryptParams),
}

impl AlgorithmParams {
    /// 参数所属的算法族名称
    pub fn family(&self) -> &'static str {
        match self {
            AlgorithmParams::Argon2(_) => "argon2",
            AlgorithmParams::Scrypt(_) => "scrypt",
        }
    }
}
