//! 解码结果

use serde::{Deserialize, Serialize};

use super::{Algorithm, AlgorithmParams};

/// 记录解码后的视图
///
/// 参数全部取自记录本身，而不是解码它的 hasher 的配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordInfo {
    /// 记录中的算法标识
    pub algorithm: Algorithm,
    /// 记录中的 hash 字段（保持编码后的文本形式）
    pub hash: String,
    /// 迭代次数 / cost；没有该概念的算法为 0
    pub iterations: u32,
    /// 记录中的 salt 字段；argon2 为 hex 文本，bcrypt 为空
    pub salt: String,
    /// 算法特有的参数
    pub params: Option<AlgorithmParams>,
}

impl PasswordInfo {
    pub(crate) fn new(algorithm: Algorithm, salt: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            algorithm,
            hash: hash.into(),
            iterations: 0,
            salt: salt.into(),
            params: None,
        }
    }

    pub(crate) fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub(crate) fn with_params(mut self, params: AlgorithmParams) -> Self {
        self.params = Some(params);
        self
    }
}
