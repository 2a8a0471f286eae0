use crate::game::StageTable;
use crate::types::Config;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything the stage machine relies on, including the stage table.
    pub fn validate(&self) -> Result<()> {
        if self.timing.tick_interval_ms == 0 {
            bail!("timing.tick_interval_ms must be positive");
        }
        if !(0.0..=1.0).contains(&self.objects.confidence_threshold) {
            bail!(
                "objects.confidence_threshold must be within [0, 1], got {}",
                self.objects.confidence_threshold
            );
        }
        if self.event_bus.max_pending == 0 {
            bail!("event_bus.max_pending must be positive");
        }
        self.stage_table()?;
        Ok(())
    }

    pub fn stage_table(&self) -> Result<StageTable> {
        StageTable::new(self.stages.clone()).context("Invalid stage table")
    }
}
