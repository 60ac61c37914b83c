use super::error::{FireworksError, Result};
use super::types::SearchSpace;
use serde::{Deserialize, Serialize};

/// LoTFWA hyperparameters, validated once and read-only afterwards
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireworksConfig {
    fw_size: usize,  // fireworks kept alive each round
    sp_size: usize,  // explosion sparks per round across all fireworks
    init_amp: f64,   // starting (and restart) amplitude
    gm_ratio: f64,   // fraction of sparks forming each guided-mutation centroid
    max_eval: usize, // evaluation budget charged by rounds
}

impl FireworksConfig {
    /// Defaults: 5 fireworks, 300 sparks, amplitude 200, mutation ratio 0.2
    pub fn new(max_eval: usize) -> Self {
        Self {
            fw_size: 5,
            sp_size: 300,
            init_amp: 200.0,
            gm_ratio: 0.2,
            max_eval,
        }
    }

    /// Defaults scaled to a domain: 10 sparks per dimension and an amplitude
    /// spanning the widest dimension
    pub fn for_space(space: &SearchSpace, max_eval: usize) -> Self {
        Self {
            sp_size: 10 * space.dim(),
            init_amp: space.max_range(),
            ..Self::new(max_eval)
        }
    }

    /// Configure population size (default: 5)
    pub fn with_fw_size(mut self, fw_size: usize) -> Self {
        self.fw_size = fw_size;
        self
    }

    /// Configure total sparks per round (default: 300)
    pub fn with_sp_size(mut self, sp_size: usize) -> Self {
        self.sp_size = sp_size;
        self
    }

    pub fn with_init_amp(mut self, init_amp: f64) -> Self {
        self.init_amp = init_amp;
        self
    }

    pub fn with_gm_ratio(mut self, gm_ratio: f64) -> Self {
        self.gm_ratio = gm_ratio;
        self
    }

    pub fn with_max_eval(mut self, max_eval: usize) -> Self {
        self.max_eval = max_eval;
        self
    }

    pub fn fw_size(&self) -> usize {
        self.fw_size
    }

    pub fn sp_size(&self) -> usize {
        self.sp_size
    }

    pub fn init_amp(&self) -> f64 {
        self.init_amp
    }

    pub fn gm_ratio(&self) -> f64 {
        self.gm_ratio
    }

    pub fn max_eval(&self) -> usize {
        self.max_eval
    }

    /// Equal allocation: every firework gets floor(sp_size / fw_size) sparks.
    /// Empty when fw_size is zero.
    pub fn spark_allocation(&self) -> Vec<usize> {
        let per_firework = self.sp_size.checked_div(self.fw_size).unwrap_or(0);
        vec![per_firework; self.fw_size]
    }

    /// Round budget used by the restart predictor, zero when sp_size is zero
    pub fn max_iter(&self) -> usize {
        self.max_eval.checked_div(self.sp_size).unwrap_or(0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fw_size == 0 {
            return Err(FireworksError::InvalidConfig(
                "fw_size must be at least 1".into(),
            ));
        }
        if self.sp_size < self.fw_size {
            return Err(FireworksError::InvalidConfig(format!(
                "sp_size ({}) must be at least fw_size ({}) so every firework gets a spark",
                self.sp_size, self.fw_size
            )));
        }
        if self.max_eval == 0 {
            return Err(FireworksError::InvalidConfig(
                "max_eval must be at least 1".into(),
            ));
        }
        if !self.init_amp.is_finite() || self.init_amp <= 0.0 {
            return Err(FireworksError::InvalidConfig(format!(
                "init_amp must be finite and positive, got {}",
                self.init_amp
            )));
        }
        if !(self.gm_ratio > 0.0 && self.gm_ratio < 1.0) {
            return Err(FireworksError::InvalidConfig(format!(
                "gm_ratio must lie in (0, 1), got {}",
                self.gm_ratio
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
