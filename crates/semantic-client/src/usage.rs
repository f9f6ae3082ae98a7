use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of accumulated service usage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Usage {
    pub calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    /// Rough spend estimate from per-million-token prices.
    pub fn estimated_cost_usd(&self, input_per_million: f64, output_per_million: f64) -> f64 {
        let input = self.input_tokens as f64 / 1_000_000.0 * input_per_million;
        let output = self.output_tokens as f64 / 1_000_000.0 * output_per_million;
        input + output
    }
}

/// Lock-free accumulation shared by concurrent site workers.
#[derive(Debug, Default)]
pub struct UsageCounters {
    calls: AtomicU64,
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
}

impl UsageCounters {
    pub fn record(&self, input_tokens: u64, output_tokens: u64) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.input_tokens.fetch_add(input_tokens, Ordering::Relaxed);
        self.output_tokens.fetch_add(output_tokens, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Usage {
        Usage {
            calls: self.calls.load(Ordering::Relaxed),
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let counters = UsageCounters::default();
        counters.record(1200, 80);
        counters.record(800, 20);
        let usage = counters.snapshot();
        assert_eq!(usage.calls, 2);
        assert_eq!(usage.input_tokens, 2000);
        assert_eq!(usage.output_tokens, 100);
    }

    #[test]
    fn cost_estimate_scales_per_million() {
        let usage = Usage {
            calls: 1,
            input_tokens: 1_000_000,
            output_tokens: 200_000,
        };
        let cost = usage.estimated_cost_usd(3.0, 15.0);
        assert!((cost - 6.0).abs() < 1e-9);
    }
}
