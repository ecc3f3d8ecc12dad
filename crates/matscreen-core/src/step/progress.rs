use chrono::Local;
use log::info;

/// Reporte de progreso `"[HH:MM:SS]: K/N"` cada `every` elementos y al
/// completar el total.
#[derive(Debug, Clone)]
pub struct ProgressTicker {
    total: usize,
    every: usize,
    done: usize,
}

impl ProgressTicker {
    pub fn new(total: usize, every: usize) -> Self {
        Self { total, every: every.max(1), done: 0 }
    }

    pub fn done(&self) -> usize {
        self.done
    }

    /// Cuenta un elemento. Devuelve la línea emitida, si tocaba emitir.
    pub fn tick(&mut self) -> Option<String> {
        self.done += 1;
        if self.done % self.every != 0 && self.done != self.total {
            return None;
        }
        let line = format!("[{}]: {}/{}", Local::now().format("%H:%M:%S"), self.done, self.total);
        info!("{line}");
        Some(line)
    }
}
