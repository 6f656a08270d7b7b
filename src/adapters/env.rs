use crate::domain::ports::VariableSource;

/// 行程環境變數
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl VariableSource for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_process_environment() {
        let path = std::env::var("PATH").ok();
        assert_eq!(ProcessEnvironment.get("PATH"), path);
        assert_eq!(ProcessEnvironment.get("COMPOSE_MIRROR_SURELY_UNSET_VAR"), None);
    }
}
