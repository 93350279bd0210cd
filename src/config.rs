use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::model::Size;

/// Construction-time configuration for an [`crate::atlas_manager::AtlasManager`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasManagerOptions {
    /// Size of every page in the atlas.
    pub texture_size: Size,
    /// Number of pages to create up front. Must be >= 1.
    pub texture_count: u32,
    /// Spatial index block size (recommended 128x16).
    /// Exposed for tests that want a denser grid on small pages; leave at
    /// the default for production use.
    #[serde(default = "default_block_size")]
    pub spatial_block_size: Size,
}

fn default_block_size() -> Size {
    Size::new(128, 16)
}

impl AtlasManagerOptions {
    /// Validates the configuration.
    ///
    /// Returns an error if `texture_count` is zero or `texture_size` has
    /// zero area — both would make every claim unconditionally fail.
    pub fn validate(&self) -> Result<()> {
        if self.texture_count == 0 {
            return Err(AtlasError::InvalidConfig(
                "texture_count must be at least 1".into(),
            ));
        }
        if self.texture_size.is_zero_area() {
            return Err(AtlasError::InvalidConfig(format!(
                "texture_size must have nonzero area, got {}x{}",
                self.texture_size.width, self.texture_size.height
            )));
        }
        if self.spatial_block_size.is_zero_area() {
            return Err(AtlasError::InvalidConfig(
                "spatial_block_size must have nonzero area".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AtlasManagerOptions {
    fn default() -> Self {
        Self {
            texture_size: Size::new(1024, 1024),
            texture_count: 1,
            spatial_block_size: default_block_size(),
        }
    }
}

/// Builder for [`AtlasManagerOptions`].
#[derive(Debug, Default, Clone)]
pub struct AtlasManagerOptionsBuilder {
    opts: AtlasManagerOptions,
}

impl AtlasManagerOptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: AtlasManagerOptions::default(),
        }
    }

    pub fn texture_size(mut self, size: Size) -> Self {
        self.opts.texture_size = size;
        self
    }

    pub fn texture_count(mut self, count: u32) -> Self {
        self.opts.texture_count = count;
        self
    }

    pub fn spatial_block_size(mut self, size: Size) -> Self {
        self.opts.spatial_block_size = size;
        self
    }

    pub fn build(self) -> AtlasManagerOptions {
        self.opts
    }
}

impl AtlasManagerOptions {
    pub fn builder() -> AtlasManagerOptionsBuilder {
        AtlasManagerOptionsBuilder::new()
    }
}
