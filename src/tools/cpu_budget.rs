use log::warn;
use sysinfo::System;

/// 以 CPU 數量決定可同時執行的 worker 數
pub struct CpuBudget {
    cpu_count: usize,
}

impl CpuBudget {
    #[must_use]
    pub fn new(cpu_count: usize) -> Self {
        Self {
            cpu_count: cpu_count.max(1),
        }
    }

    /// 讀取目前系統的邏輯 CPU 數量
    #[must_use]
    pub fn detect() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();
        Self::new(system.cpus().len())
    }

    #[must_use]
    pub const fn cpu_count(&self) -> usize {
        self.cpu_count
    }

    /// `None` 或 0 代表自動使用全部 CPU；超過 CPU 數量時會被限制
    #[must_use]
    pub fn worker_count(&self, requested: Option<usize>) -> usize {
        match requested {
            None | Some(0) => self.cpu_count,
            Some(n) if n > self.cpu_count => {
                warn!(
                    "要求 {n} 個 worker 超過 CPU 數量，改用 {} 個",
                    self.cpu_count
                );
                self.cpu_count
            }
            Some(n) => n,
        }
    }
}
