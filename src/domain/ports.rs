use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// 第二層變數來源（通常是行程環境變數），以注入方式提供
pub trait VariableSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

impl VariableSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// 複製工具成功執行的輸出
#[derive(Debug, Clone, Default)]
pub struct CopyOutput {
    pub stdout: String,
}

/// 外部映像複製能力；非零結束碼以 `MirrorError::TransferExecution` 回報
#[async_trait]
pub trait CopyTool: Send + Sync {
    async fn copy(&self, source: &str, destination: &str) -> Result<CopyOutput>;
}

pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}
